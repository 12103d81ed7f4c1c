//! Web layer - local HTTP surface
//!
//! A small axum app bound to loopback: one server-rendered page plus a JSON API
//! over the same check-in use case the CLI uses.

pub mod page;
pub mod routes;

pub use routes::{app_router, AppState, SharedCheckIn};
