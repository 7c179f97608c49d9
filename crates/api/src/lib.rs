//! Bizdesk API server library.
//!
//! Exposes the building blocks (config, state, error handling, extractors,
//! routes) so integration tests, the server binary and the maintenance CLI
//! share one implementation.

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod populate;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod telemetry;
