use std::sync::Arc;

use babycontest_cloud::ObjectStore;

use crate::audit_log::AuditLog;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Built once in `main` and cheaply cloneable (inner data is behind `Arc` or
/// is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: babycontest_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Where uploaded images are stored.
    pub store: Arc<dyn ObjectStore>,
    /// Upload log with its sequence counter.
    pub audit_log: Arc<AuditLog>,
}
