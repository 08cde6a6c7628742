pub mod health;
pub mod submission;

use axum::Router;

use crate::state::AppState;

/// Build the application route tree.
///
/// ```text
/// /          GET form, POST submission
/// /health    service and database health
/// ```
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .merge(submission::router())
        .merge(health::router())
}
