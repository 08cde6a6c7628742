//! Contest entry server library.
//!
//! Exposes the building blocks (config, state, error handling, routes, the
//! submission pipeline) so integration tests and the binary entrypoint can
//! both access them.

pub mod audit_log;
pub mod config;
pub mod error;
pub mod form;
pub mod handlers;
pub mod pipeline;
pub mod router;
pub mod routes;
pub mod state;
pub mod views;
