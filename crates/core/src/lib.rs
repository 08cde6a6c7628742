//! Domain building blocks for the contest entry service.
//!
//! Pure logic only: no I/O, no database, no HTTP. The `api`, `db` and
//! `cloud` crates depend on these types.

pub mod audit;
pub mod entry;
pub mod error;
pub mod naming;
pub mod types;
