//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct matching
//! the database row and a create DTO for inserts. Entries are immutable, so
//! there are no update DTOs.

pub mod entry;
