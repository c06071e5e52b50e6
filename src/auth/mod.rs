//! Session and authorization lifecycle.
//!
//! This module provides:
//! - `SessionState`/`transition`: the sum-typed session state machine
//! - `SessionStore`: the persisted `(token, user)` snapshot
//! - `SessionHandle`: the shared session slot and subscription point
//! - `SessionManager`: `login`, `register`, `logout`
//!
//! Sessions restored from storage enter `Authenticated` without a network
//! round-trip. An authorization failure observed on any API call forces
//! `logout` through the same machinery.

pub mod error;
pub mod manager;
pub mod state;
pub mod store;

pub use error::AuthError;
pub use manager::{Registration, SessionHandle, SessionManager};
pub use state::{transition, Session, SessionEvent, SessionState};
pub use store::SessionStore;
