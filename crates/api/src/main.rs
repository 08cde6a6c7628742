use std::net::SocketAddr;
use std::sync::Arc;

use babycontest_api::audit_log::{local_hostname, AuditLog};
use babycontest_api::config::{DatabaseConfig, ServerConfig, StorageConfig};
use babycontest_api::router::build_app_router;
use babycontest_api::state::AppState;
use babycontest_cloud::{MemoryObjectStore, ObjectStore, S3ObjectStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "babycontest_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env().expect("Invalid configuration");
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let pool = match &config.database {
        DatabaseConfig::Url(url) => babycontest_db::create_pool(url).await,
        DatabaseConfig::Parts {
            host,
            user,
            password,
            name,
        } => {
            let options = babycontest_db::connect_options(host, user, password.as_deref(), name);
            babycontest_db::create_pool_with(options).await
        }
    }
    .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    babycontest_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    babycontest_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Object store ---
    let store: Arc<dyn ObjectStore> = match &config.storage {
        StorageConfig::S3(settings) => Arc::new(S3ObjectStore::new(settings).await),
        StorageConfig::Memory { bucket, region } => {
            tracing::warn!("Using in-memory object store; uploads are lost on restart");
            Arc::new(MemoryObjectStore::new(bucket, region))
        }
    };

    // --- Audit log ---
    let hostname = local_hostname();
    let audit_log = Arc::new(AuditLog::new(&config.audit_log_path, hostname.clone()));
    tracing::info!(
        path = %config.audit_log_path.display(),
        hostname = %hostname,
        "Audit log configured"
    );

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        store,
        audit_log,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
