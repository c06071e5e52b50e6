//! REST API client module for the Finance Tracker service.
//!
//! This module provides the `ApiClient` for authentication and domain
//! calls (accounts, transactions, categories, budgets) and the request
//! `Pipeline` that makes the session transparent to every call: bearer
//! token attachment on the way out, forced logout on 401 on the way in.

pub mod client;
pub mod error;
pub mod pipeline;

pub use client::{ApiClient, LoginResponse, RegisterAck};
pub use error::ApiError;
pub use pipeline::{
    AuthFailureWatch, BearerAuth, InboundStage, Navigator, NoNavigation, OutboundStage, Pipeline,
};
