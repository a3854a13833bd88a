//! HTTP client module for the authentication backend.
//!
//! This module provides the `SessionClient` for the three backend
//! operations: login, protected fetch, and logout.
//!
//! Authentication state lives entirely in a backend-issued session cookie
//! held by the client's cookie store; no token is ever handled directly.

pub mod client;
pub mod error;

pub use client::{LoginOutcome, SessionClient, DEFAULT_BASE_URL};
pub use error::ApiError;
