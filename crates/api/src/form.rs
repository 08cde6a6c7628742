//! Reading the entry form out of a multipart request.

use axum::body::Bytes;
use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use babycontest_core::entry::{PartialEntryFields, FIELD_IMAGE};

use crate::error::{AppError, AppResult};

/// The uploaded image as received from the client.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Filename exactly as the client sent it (unsanitised).
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Everything a POST to `/` carried.
#[derive(Debug, Default)]
pub struct SubmissionForm {
    pub fields: PartialEntryFields,
    /// `None` when the file field was absent or had an empty filename.
    pub image: Option<ImageUpload>,
}

impl SubmissionForm {
    /// Drain the multipart stream. Unknown fields are skipped.
    pub async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = SubmissionForm::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or("").to_string();

            if name == FIELD_IMAGE {
                let file_name = field.file_name().unwrap_or("").to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(multipart_error)?;

                form.image = if file_name.is_empty() {
                    None
                } else {
                    Some(ImageUpload {
                        file_name,
                        content_type,
                        data,
                    })
                };
                continue;
            }

            let value = field.text().await.map_err(multipart_error)?;
            if !form.fields.set(&name, value) {
                tracing::debug!(field = %name, "Ignoring unknown form field");
            }
        }

        Ok(form)
    }
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::BadRequest(err.body_text())
    }
}
