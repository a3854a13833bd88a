//! hallpass - a terminal client for session-cookie protected backends.
//!
//! The crate is split into a library and a thin binary so integration tests
//! can drive the session client and app state machine directly.

pub mod api;
pub mod app;
pub mod config;
pub mod ui;
