//! Contest entry form fields.

use serde::Serialize;

use crate::error::CoreError;

/// Multipart field carrying the contestant's name.
pub const FIELD_BABY_NAME: &str = "baby_name";
/// Multipart field carrying the contestant's age (free text).
pub const FIELD_BABY_AGE: &str = "baby_age";
/// Multipart field carrying the submitter's name.
pub const FIELD_PARENT_NAME: &str = "parent_name";
/// Multipart field carrying the submitter's contact details.
pub const FIELD_CONTACT: &str = "contact";
/// Multipart file field carrying the contestant's image.
pub const FIELD_IMAGE: &str = "baby_image";

/// The four text fields of a submission, all present.
///
/// Values are kept verbatim; the age is not interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryFields {
    pub baby_name: String,
    pub baby_age: String,
    pub parent_name: String,
    pub contact: String,
}

/// Text fields as collected from a form, any of which may be absent.
#[derive(Debug, Clone, Default)]
pub struct PartialEntryFields {
    pub baby_name: Option<String>,
    pub baby_age: Option<String>,
    pub parent_name: Option<String>,
    pub contact: Option<String>,
}

impl PartialEntryFields {
    /// Store a form value by field name. Unknown names are ignored and
    /// reported back as `false`.
    pub fn set(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            FIELD_BABY_NAME => &mut self.baby_name,
            FIELD_BABY_AGE => &mut self.baby_age,
            FIELD_PARENT_NAME => &mut self.parent_name,
            FIELD_CONTACT => &mut self.contact,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// Require every field to be present.
    ///
    /// Fields are checked in form order; the first absent one is reported.
    pub fn complete(self) -> Result<EntryFields, CoreError> {
        Ok(EntryFields {
            baby_name: self
                .baby_name
                .ok_or(CoreError::MissingField(FIELD_BABY_NAME))?,
            baby_age: self.baby_age.ok_or(CoreError::MissingField(FIELD_BABY_AGE))?,
            parent_name: self
                .parent_name
                .ok_or(CoreError::MissingField(FIELD_PARENT_NAME))?,
            contact: self.contact.ok_or(CoreError::MissingField(FIELD_CONTACT))?,
        })
    }
}
