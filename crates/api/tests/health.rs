//! Health endpoint and router-wide behaviour.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, build_test_app_with, get};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Test: healthy service reports every check
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn health_reports_ok_when_dependencies_are_up(pool: PgPool) {
    let app = build_test_app(pool);
    tokio::fs::create_dir_all(app.audit_log_path.parent().unwrap())
        .await
        .unwrap();

    let response = get(app.router, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(json["db_healthy"], true);
    assert_eq!(json["audit_log_ready"], true);
    assert_eq!(json["storage_backend"], "memory");
}

// ---------------------------------------------------------------------------
// Test: missing audit log mount degrades but still answers 200
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_audit_dir_is_degraded(pool: PgPool) {
    let app = build_test_app_with(pool, |config| {
        config.audit_log_path = config
            .upload_dir
            .join("not-mounted")
            .join("upload_log.txt");
    });

    let response = get(app.router, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["db_healthy"], true);
    assert_eq!(json["audit_log_ready"], false);
}

// ---------------------------------------------------------------------------
// Test: closed database pool degrades
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn closed_pool_is_degraded(pool: PgPool) {
    let app = build_test_app(pool.clone());
    tokio::fs::create_dir_all(app.audit_log_path.parent().unwrap())
        .await
        .unwrap();
    pool.close().await;

    let json = body_json(get(app.router, "/health").await).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["db_healthy"], false);
}

// ---------------------------------------------------------------------------
// Test: routing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_path_is_404(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(app.router, "/static/uploads/mia.png").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn responses_carry_generated_request_id(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(app.router, "/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let id = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    // Hyphenated UUID.
    assert_eq!(id.len(), 36, "unexpected x-request-id {id:?}");
}
