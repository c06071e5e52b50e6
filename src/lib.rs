//! fintrack-core - client-side core for the fintrack personal finance app.
//!
//! This crate owns the session/authorization lifecycle and the authorized
//! API client a UI builds on:
//!
//! - `auth`: session state machine, persisted snapshot, login/register/logout
//! - `api`: REST client plus the request pipeline (bearer attachment,
//!   automatic invalidation on 401)
//! - `storage`: durable key-value capability backing the session store
//! - `models`: wire types for accounts, transactions, categories, budgets
//! - `config`: config file and environment overrides
//! - `app`: `Tracker`, the composition root

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod models;
pub mod storage;

pub use api::{ApiClient, ApiError, Navigator, NoNavigation, Pipeline};
pub use app::Tracker;
pub use auth::{
    AuthError, Registration, Session, SessionEvent, SessionHandle, SessionManager, SessionState,
    SessionStore,
};
pub use config::Config;
pub use models::User;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
