use axum::routing::get;
use axum::Router;

use crate::handlers::submission;
use crate::state::AppState;

/// Mount the entry form at the application root.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(submission::show_form).post(submission::submit))
}
