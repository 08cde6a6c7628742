//! Object storage for uploaded contest images.
//!
//! [`ObjectStore`] is the seam the submission pipeline talks to.
//! [`S3ObjectStore`] is the production backend; [`MemoryObjectStore`] keeps
//! objects in process for local development and tests.

pub mod error;
pub mod memory;
pub mod s3;
pub mod store;

pub use error::StorageError;
pub use memory::MemoryObjectStore;
pub use s3::{S3ObjectStore, S3Settings};
pub use store::ObjectStore;
