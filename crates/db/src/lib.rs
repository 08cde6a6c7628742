//! Postgres access for the contest entry service.

pub mod models;
pub mod repositories;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Create a connection pool from discrete connection settings.
pub async fn create_pool_with(options: PgConnectOptions) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect_with(options)
        .await
}

/// Build connection options from host, user, password and database name.
///
/// Used when no `DATABASE_URL` is configured.
pub fn connect_options(
    host: &str,
    user: &str,
    password: Option<&str>,
    database: &str,
) -> PgConnectOptions {
    let options = PgConnectOptions::new()
        .host(host)
        .username(user)
        .database(database);
    match password {
        Some(password) => options.password(password),
        None => options,
    }
}

/// Run a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await
        .map(|_| ())
}

/// Apply all pending migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
