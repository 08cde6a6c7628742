#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use babycontest_api::audit_log::AuditLog;
use babycontest_api::config::{DatabaseConfig, ServerConfig, StorageConfig};
use babycontest_api::router::build_app_router;
use babycontest_api::state::AppState;
use babycontest_cloud::MemoryObjectStore;
use babycontest_core::audit::AuditLine;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;

pub const BUCKET: &str = "contest-images";
pub const REGION: &str = "eu-west-1";
const BOUNDARY: &str = "----contest-test-boundary";

/// Everything a test needs to inspect side effects of a request.
pub struct TestApp {
    pub router: Router,
    pub store: MemoryObjectStore,
    pub pool: PgPool,
    pub audit_log_path: PathBuf,
    pub upload_dir: PathBuf,
    /// Keeps the scratch directory alive for the test's duration.
    _scratch: TempDir,
}

/// Build a test `ServerConfig` rooted in `scratch`.
pub fn test_config(scratch: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout_secs: 30,
        max_upload_bytes: 1024 * 1024,
        upload_dir: scratch.join("uploads"),
        audit_log_path: scratch.join("efs").join("upload_log.txt"),
        public_host: "10.0.0.5".to_string(),
        public_port: 5000,
        audit_append_required: false,
        entry_insert_required: false,
        storage: StorageConfig::Memory {
            bucket: BUCKET.to_string(),
            region: REGION.to_string(),
        },
        database: DatabaseConfig::Url("postgres://unused".to_string()),
    }
}

/// Build the full application router with all middleware layers, an
/// in-memory object store and a scratch directory for uploads and the log.
pub fn build_test_app(pool: PgPool) -> TestApp {
    build_test_app_with(pool, |_| {})
}

/// Like [`build_test_app`], with a hook to adjust the configuration.
pub fn build_test_app_with(pool: PgPool, adjust: impl FnOnce(&mut ServerConfig)) -> TestApp {
    let scratch = tempfile::tempdir().unwrap();
    let mut config = test_config(scratch.path());
    adjust(&mut config);

    let store = MemoryObjectStore::new(BUCKET, REGION);
    let audit_log = Arc::new(AuditLog::new(&config.audit_log_path, "test-host"));

    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        store: Arc::new(store.clone()),
        audit_log,
    };

    TestApp {
        router: build_app_router(state, &config),
        store,
        pool,
        audit_log_path: config.audit_log_path.clone(),
        upload_dir: config.upload_dir.clone(),
        _scratch: scratch,
    }
}

/// A file part for [`multipart_body`].
pub struct FilePart<'a> {
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub data: &'a [u8],
}

/// Encode text fields and an optional `baby_image` file as multipart/form-data.
pub fn multipart_body(fields: &[(&str, &str)], file: Option<FilePart<'_>>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(file) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"baby_image\"; \
                 filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                file.file_name, file.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(file.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// The four text fields of the standard scenario.
pub fn mia_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("baby_name", "Mia"),
        ("baby_age", "1"),
        ("parent_name", "Lee"),
        ("contact", "lee@example.com"),
    ]
}

pub fn png(file_name: &str) -> FilePart<'_> {
    FilePart {
        file_name,
        content_type: "image/png",
        data: b"\x89PNG\r\n\x1a\nfake-image-bytes",
    }
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_multipart(app: Router, uri: &str, body: Vec<u8>) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Parsed lines of the audit log; empty if the file was never created.
pub async fn audit_lines(path: &Path) -> Vec<AuditLine> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => text.lines().map(|l| AuditLine::parse(l).unwrap()).collect(),
        Err(_) => Vec::new(),
    }
}

/// Number of entries left behind in the upload staging directory.
pub async fn staged_leftovers(upload_dir: &Path) -> usize {
    let Ok(mut dir) = tokio::fs::read_dir(upload_dir).await else {
        return 0;
    };
    let mut count = 0;
    while dir.next_entry().await.unwrap().is_some() {
        count += 1;
    }
    count
}

pub async fn entry_count(pool: &PgPool) -> i64 {
    babycontest_db::repositories::EntryRepo::count(pool)
        .await
        .unwrap()
}
