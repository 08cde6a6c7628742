use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::audit_log::AuditLog;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// The audit log's directory exists, so appends can create the file.
    pub audit_log_ready: bool,
    pub storage_backend: &'static str,
}

/// GET /health
///
/// Always 200; `status` is `degraded` when the database or the audit log
/// directory is unavailable.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = babycontest_db::health_check(&state.pool).await.is_ok();
    let audit_log_ready = audit_dir_present(&state.audit_log).await;

    if !audit_log_ready {
        tracing::warn!(
            path = %state.audit_log.path().display(),
            "Audit log directory is missing"
        );
    }

    Json(HealthResponse {
        status: if db_healthy && audit_log_ready { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        audit_log_ready,
        storage_backend: state.store.backend(),
    })
}

async fn audit_dir_present(log: &AuditLog) -> bool {
    match log.path().parent() {
        Some(dir) if !dir.as_os_str().is_empty() => tokio::fs::metadata(dir)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false),
        // Relative bare filename: lives in the working directory.
        _ => true,
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
