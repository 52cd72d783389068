//! Order-management API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes) so
//! the binary entrypoint and tests can both access them.

pub mod config;
pub mod error;
pub mod handlers;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
