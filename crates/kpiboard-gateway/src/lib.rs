//! kpiboard gateway library entry.
//!
//! Wires config, auth, handlers and ops endpoints around the core stores into
//! an axum service. Consumed by the binary (`main.rs`) and by integration
//! tests.

pub mod app_state;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod obs;
pub mod ops;
pub mod router;
