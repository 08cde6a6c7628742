use std::path::PathBuf;
use std::str::FromStr;

use babycontest_cloud::S3Settings;

/// Errors raised while reading configuration. Fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Where uploaded images go.
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// AWS S3 or an S3-compatible endpoint.
    S3(S3Settings),
    /// In-process store, for local development.
    Memory { bucket: String, region: String },
}

/// How to reach Postgres.
#[derive(Debug, Clone)]
pub enum DatabaseConfig {
    Url(String),
    Parts {
        host: String,
        user: String,
        password: Option<String>,
        name: String,
    },
}

/// Server configuration loaded once at startup from environment variables.
///
/// Shared with handlers through `AppState` rather than module globals.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Largest accepted request body in bytes (default: 16 MiB).
    pub max_upload_bytes: usize,
    /// Parent directory for per-request staging directories.
    pub upload_dir: PathBuf,
    /// Append-only upload log.
    pub audit_log_path: PathBuf,
    /// Host written into audit-log URLs.
    pub public_host: String,
    /// Port written into audit-log URLs (default: same as `port`).
    pub public_port: u16,
    /// Fail the request when the audit append fails.
    pub audit_append_required: bool,
    /// Fail the request when the entry insert fails.
    pub entry_insert_required: bool,
    pub storage: StorageConfig,
    pub database: DatabaseConfig,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                 | Default                 |
    /// |-------------------------|-------------------------|
    /// | `HOST`                  | `0.0.0.0`               |
    /// | `PORT`                  | `5000`                  |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                    |
    /// | `MAX_UPLOAD_BYTES`      | `16777216`              |
    /// | `UPLOAD_DIR`            | OS temp dir             |
    /// | `AUDIT_LOG_PATH`        | `/efs/upload_log.txt`   |
    /// | `PUBLIC_HOST`           | `localhost`             |
    /// | `PUBLIC_PORT`           | value of `PORT`         |
    /// | `AUDIT_APPEND_REQUIRED` | `false`                 |
    /// | `ENTRY_INSERT_REQUIRED` | `false`                 |
    /// | `STORAGE_BACKEND`       | `s3`                    |
    /// | `S3_BUCKET_NAME`        | required                |
    /// | `S3_REGION`             | required                |
    /// | `S3_ENDPOINT`           | unset                   |
    /// | `DATABASE_URL`          | built from `DB_*`       |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = get("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = parse_or(&get, "PORT", 5000)?;
        let request_timeout_secs = parse_or(&get, "REQUEST_TIMEOUT_SECS", 30)?;
        let max_upload_bytes = parse_or(&get, "MAX_UPLOAD_BYTES", 16 * 1024 * 1024)?;

        let upload_dir = get("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir);
        let audit_log_path = get("AUDIT_LOG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("/efs/upload_log.txt"));

        let public_host = get("PUBLIC_HOST").unwrap_or_else(|| "localhost".into());
        let public_port = parse_or(&get, "PUBLIC_PORT", port)?;

        let audit_append_required = parse_or(&get, "AUDIT_APPEND_REQUIRED", false)?;
        let entry_insert_required = parse_or(&get, "ENTRY_INSERT_REQUIRED", false)?;

        let storage = match get("STORAGE_BACKEND").as_deref().unwrap_or("s3") {
            "s3" => StorageConfig::S3(S3Settings {
                bucket: get("S3_BUCKET_NAME").ok_or(ConfigError::Missing("S3_BUCKET_NAME"))?,
                region: get("S3_REGION").ok_or(ConfigError::Missing("S3_REGION"))?,
                endpoint: get("S3_ENDPOINT"),
                access_key_id: get("AWS_ACCESS_KEY_ID"),
                secret_access_key: get("AWS_SECRET_ACCESS_KEY"),
            }),
            "memory" => StorageConfig::Memory {
                bucket: get("S3_BUCKET_NAME").unwrap_or_else(|| "local".into()),
                region: get("S3_REGION").unwrap_or_else(|| "us-east-1".into()),
            },
            other => {
                return Err(ConfigError::Invalid {
                    key: "STORAGE_BACKEND",
                    value: other.to_string(),
                })
            }
        };

        let database = match get("DATABASE_URL") {
            Some(url) => DatabaseConfig::Url(url),
            None => DatabaseConfig::Parts {
                host: get("DB_HOST").ok_or(ConfigError::Missing("DATABASE_URL or DB_HOST"))?,
                user: get("DB_USER").ok_or(ConfigError::Missing("DB_USER"))?,
                password: get("DB_PASSWORD"),
                name: get("DB_NAME").unwrap_or_else(|| "babycontest".into()),
            },
        };

        Ok(Self {
            host,
            port,
            request_timeout_secs,
            max_upload_bytes,
            upload_dir,
            audit_log_path,
            public_host,
            public_port,
            audit_append_required,
            entry_insert_required,
            storage,
            database,
        })
    }
}

/// Parse `key` if set, otherwise return `default`.
fn parse_or<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
