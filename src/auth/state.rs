//! Session state machine.
//!
//! All session mutation flows through `transition`, an exhaustive function
//! over (state, event) pairs. Token and user travel together inside
//! `Session`, so a half-written pair is unrepresentable.

use crate::models::User;

/// An established session: the bearer token and the profile it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl Session {
    pub fn new(token: String, user: User) -> Self {
        Self { token, user }
    }
}

/// Current phase of the session lifecycle.
///
/// `Pending` and `Error` retain the session that was authenticated before
/// the attempt began: a failed re-login must not destroy a live session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// No session; nothing in flight.
    Idle,
    /// A login or registration call is in flight.
    Pending { prior: Option<Session> },
    /// Authenticated with a live session.
    Authenticated(Session),
    /// The last attempt failed.
    Error {
        message: String,
        prior: Option<Session>,
    },
}

impl SessionState {
    /// The live session, if any: the authenticated one, or the one that
    /// survived a failed attempt.
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::Idle => None,
            SessionState::Pending { prior } => prior.as_ref(),
            SessionState::Authenticated(session) => Some(session),
            SessionState::Error { prior, .. } => prior.as_ref(),
        }
    }

    /// Bearer token of the live session, if any.
    pub fn token(&self) -> Option<&str> {
        self.session().map(|s| s.token.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, SessionState::Pending { .. })
    }

    /// Message from the last failed attempt, cleared by any new attempt.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            SessionState::Error { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Discrete completions that drive the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A persisted snapshot was found at startup.
    Restored(Session),
    /// A login or registration call was issued.
    AttemptStarted,
    /// The remote call succeeded with a fresh session.
    Succeeded(Session),
    /// The remote call failed with a normalized message.
    Failed(String),
    /// Explicit logout, or an authorization failure observed on any call.
    LoggedOut,
}

/// Compute the next state. Pure; side effects (persistence, notification)
/// belong to the caller.
pub fn transition(state: &SessionState, event: SessionEvent) -> SessionState {
    match event {
        SessionEvent::Restored(session) => SessionState::Authenticated(session),
        SessionEvent::AttemptStarted => SessionState::Pending {
            prior: state.session().cloned(),
        },
        SessionEvent::Succeeded(session) => SessionState::Authenticated(session),
        SessionEvent::Failed(message) => SessionState::Error {
            message,
            prior: match state {
                SessionState::Pending { prior } => prior.clone(),
                other => other.session().cloned(),
            },
        },
        SessionEvent::LoggedOut => SessionState::Idle,
    }
}
