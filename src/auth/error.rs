use thiserror::Error;

/// Failures surfaced by the session operations.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    /// A required field was empty. Rejected before any network call; the
    /// state machine is not touched.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Another login/registration attempt is already in flight.
    #[error("an authentication attempt is already in progress")]
    AttemptInFlight,

    /// The remote service rejected the attempt. Carries the normalized,
    /// user-displayable message also recorded in the session state.
    #[error("{0}")]
    Rejected(String),
}
