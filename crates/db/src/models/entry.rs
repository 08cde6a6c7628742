//! Contest entry model and DTOs.

use babycontest_core::entry::EntryFields;
use babycontest_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `entries` table. Immutable once inserted.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Entry {
    pub id: DbId,
    pub baby_name: String,
    pub baby_age: String,
    pub parent_name: String,
    pub contact: String,
    pub s3_image_url: String,
    pub created_at: Timestamp,
}

/// DTO for inserting a new entry once its image is stored.
#[derive(Debug, Clone)]
pub struct CreateEntry {
    pub baby_name: String,
    pub baby_age: String,
    pub parent_name: String,
    pub contact: String,
    pub s3_image_url: String,
}

impl CreateEntry {
    /// Pair submitted form fields with the URL of the uploaded image.
    pub fn new(fields: &EntryFields, image_url: &str) -> Self {
        Self {
            baby_name: fields.baby_name.clone(),
            baby_age: fields.baby_age.clone(),
            parent_name: fields.parent_name.clone(),
            contact: fields.contact.clone(),
            s3_image_url: image_url.to_string(),
        }
    }
}
