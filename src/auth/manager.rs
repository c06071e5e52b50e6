//! Session lifecycle management.
//!
//! `SessionHandle` is the single shared session slot: every mutation flows
//! through it, and it is the only component that calls the store's
//! `save`/`clear`. `SessionManager` layers the public operations (`login`,
//! `register`, `logout`) on top and owns the remote authentication calls.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::auth::error::AuthError;
use crate::auth::state::{transition, Session, SessionEvent, SessionState};
use crate::auth::store::SessionStore;

/// Registration payload. Names are optional; everything else is required.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

struct SessionInner {
    tx: watch::Sender<SessionState>,
    store: SessionStore,
}

/// Shared, cloneable view over the session slot.
///
/// Clone is cheap (Arc). Readers see a consistent snapshot; writers go
/// through `apply`, which persists side effects before publishing the new
/// state.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<SessionInner>,
}

impl SessionHandle {
    /// Restore from the store: a persisted snapshot enters `Authenticated`
    /// without any network call; otherwise start `Idle`.
    pub fn new(store: SessionStore) -> Self {
        let state = match store.load() {
            Some(session) => {
                info!(username = %session.user.username, "Session restored from storage");
                transition(&SessionState::Idle, SessionEvent::Restored(session))
            }
            None => SessionState::Idle,
        };
        let (tx, _) = watch::channel(state);
        Self {
            inner: Arc::new(SessionInner { tx, store }),
        }
    }

    /// Current state snapshot.
    pub fn current(&self) -> SessionState {
        self.inner.tx.borrow().clone()
    }

    /// Bearer token of the live session, if any.
    pub fn token(&self) -> Option<String> {
        self.inner.tx.borrow().token().map(String::from)
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.tx.borrow().is_authenticated()
    }

    /// Watch the session state. Passive observers (banners, route guards)
    /// receive every transition.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.tx.subscribe()
    }

    /// Drive one transition, persisting its side effect first.
    pub(crate) fn apply(&self, event: SessionEvent) {
        match &event {
            SessionEvent::Succeeded(session) => {
                if let Err(e) = self.inner.store.save(session) {
                    // The in-memory session still works for this run.
                    warn!(error = %e, "Failed to persist session");
                }
            }
            SessionEvent::LoggedOut => self.inner.store.clear(),
            _ => {}
        }
        self.inner
            .tx
            .send_modify(|state| *state = transition(state, event));
    }

    /// Mark an attempt as started unless one is already pending.
    /// Atomic check-and-set on the session slot.
    fn try_begin_attempt(&self) -> bool {
        self.inner.tx.send_if_modified(|state| {
            if state.is_pending() {
                false
            } else {
                *state = transition(state, SessionEvent::AttemptStarted);
                true
            }
        })
    }

    /// Logout triggered by an authorization failure observed on any call.
    /// Idempotent; safe under concurrent triggers.
    pub fn force_logout(&self) {
        warn!("Authorization failure observed; clearing session");
        self.apply(SessionEvent::LoggedOut);
    }
}

/// Public session operations: the only writer of session state.
pub struct SessionManager {
    handle: SessionHandle,
    api: ApiClient,
}

impl SessionManager {
    pub fn new(handle: SessionHandle, api: ApiClient) -> Self {
        Self { handle, api }
    }

    pub fn handle(&self) -> &SessionHandle {
        &self.handle
    }

    pub fn current(&self) -> SessionState {
        self.handle.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.handle.subscribe()
    }

    /// Authenticate with the remote service.
    ///
    /// On success the session is stored and the state becomes
    /// `Authenticated`. On failure the state becomes `Error` with a
    /// normalized message and the same message is returned to the caller.
    /// No retry is attempted.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        if username.trim().is_empty() {
            return Err(AuthError::MissingField("username"));
        }
        if password.is_empty() {
            return Err(AuthError::MissingField("password"));
        }
        if !self.handle.try_begin_attempt() {
            return Err(AuthError::AttemptInFlight);
        }
        self.complete_login(username, password).await
    }

    /// Register a new user, then perform the full login sequence with the
    /// same credentials. Registration itself yields no session.
    pub async fn register(&self, registration: Registration) -> Result<Session, AuthError> {
        if registration.username.trim().is_empty() {
            return Err(AuthError::MissingField("username"));
        }
        if registration.email.trim().is_empty() {
            return Err(AuthError::MissingField("email"));
        }
        if registration.password.is_empty() {
            return Err(AuthError::MissingField("password"));
        }
        if !self.handle.try_begin_attempt() {
            return Err(AuthError::AttemptInFlight);
        }

        if let Err(e) = self.api.register(&registration).await {
            let message = e.auth_message("Registration failed");
            warn!(username = %registration.username, message = %message, "Registration failed");
            self.handle.apply(SessionEvent::Failed(message.clone()));
            return Err(AuthError::Rejected(message));
        }

        info!(username = %registration.username, "Registration succeeded; logging in");
        // Same attempt: the chained login's transitions apply as usual.
        self.complete_login(&registration.username, &registration.password)
            .await
    }

    /// Clear memory and store regardless of current state. Infallible and
    /// idempotent.
    pub fn logout(&self) {
        info!("Logging out");
        self.handle.apply(SessionEvent::LoggedOut);
    }

    /// Issue the remote login call and apply its outcome. The caller has
    /// already moved the machine to `Pending`.
    async fn complete_login(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        match self.api.login(username, password).await {
            Ok(response) => {
                let session = Session::new(response.access_token, response.user);
                self.handle.apply(SessionEvent::Succeeded(session.clone()));
                info!(username, "Login succeeded");
                Ok(session)
            }
            Err(e) => {
                let message = e.auth_message("Login failed");
                warn!(username, message = %message, "Login failed");
                self.handle.apply(SessionEvent::Failed(message.clone()));
                Err(AuthError::Rejected(message))
            }
        }
    }
}
