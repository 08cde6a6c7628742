//! Handlers for the entry form at `/`.

use axum::extract::{Multipart, State};
use axum::response::{Html, IntoResponse, Response};

use crate::error::AppResult;
use crate::form::SubmissionForm;
use crate::pipeline::{Submission, SubmissionPipeline};
use crate::state::AppState;
use crate::views;

/// GET /
///
/// Render the empty entry form.
pub async fn show_form() -> Html<String> {
    Html(views::render_form())
}

/// POST /
///
/// Accepts the multipart entry form. All four text fields are required
/// (400 otherwise). A missing image, or one with an empty filename, renders
/// the empty form again without side effects. Otherwise the image is
/// uploaded, logged and recorded, and the confirmation page is returned.
pub async fn submit(State(state): State<AppState>, multipart: Multipart) -> AppResult<Response> {
    let form = SubmissionForm::read(multipart).await?;
    let fields = form.fields.complete()?;

    let Some(image) = form.image else {
        tracing::info!("Submission without an image, rendering empty form");
        return Ok(show_form().await.into_response());
    };

    let outcome = SubmissionPipeline::from_state(&state)
        .run(Submission { fields, image })
        .await?;

    if !outcome.is_complete() {
        tracing::warn!(
            key = %outcome.object_key,
            failed_steps = outcome.warnings.len(),
            "Submission stored with incomplete follow-up steps"
        );
    }

    Ok(Html(views::render_confirmation(&outcome)).into_response())
}
