use std::path::PathBuf;

use autoriza_core::upload::DEFAULT_MAX_FILE_SIZE;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub jwt: JwtConfig,
    pub upload: UploadConfig,
    pub maintenance: MaintenanceConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    ///
    /// See [`JwtConfig::from_env`], [`UploadConfig::from_env`] and
    /// [`MaintenanceConfig::from_env`] for the rest.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            upload: UploadConfig::from_env(),
            maintenance: MaintenanceConfig::from_env(),
        }
    }
}

/// Where uploaded permission documents live and how big they may be.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub directory: PathBuf,
    /// Largest accepted file, in bytes.
    pub max_file_size: usize,
}

impl UploadConfig {
    /// | Env Var            | Default    |
    /// |--------------------|------------|
    /// | `UPLOAD_DIRECTORY` | `uploads`  |
    /// | `MAX_FILE_SIZE`    | `5242880`  |
    pub fn from_env() -> Self {
        let directory = std::env::var("UPLOAD_DIRECTORY").unwrap_or_else(|_| "uploads".into());
        let max_file_size: usize = std::env::var("MAX_FILE_SIZE")
            .unwrap_or_else(|_| DEFAULT_MAX_FILE_SIZE.to_string())
            .parse()
            .expect("MAX_FILE_SIZE must be a valid usize");
        Self {
            directory: PathBuf::from(directory),
            max_file_size,
        }
    }
}

/// Default retention: two years.
const DEFAULT_RETENTION_DAYS: i64 = 730;
const DEFAULT_ORPHAN_GRACE_MINS: i64 = 60;

/// Settings for the background maintenance jobs.
#[derive(Debug, Clone, Copy)]
pub struct MaintenanceConfig {
    /// Authorizations submitted longer ago than this are deleted.
    pub retention_days: i64,
    /// Unreferenced upload files younger than this are left alone.
    pub orphan_grace_mins: i64,
}

impl MaintenanceConfig {
    /// | Env Var             | Default |
    /// |---------------------|---------|
    /// | `RETENTION_DAYS`    | `730`   |
    /// | `ORPHAN_GRACE_MINS` | `60`    |
    pub fn from_env() -> Self {
        let retention_days: i64 = std::env::var("RETENTION_DAYS")
            .unwrap_or_else(|_| DEFAULT_RETENTION_DAYS.to_string())
            .parse()
            .expect("RETENTION_DAYS must be a valid i64");
        let orphan_grace_mins: i64 = std::env::var("ORPHAN_GRACE_MINS")
            .unwrap_or_else(|_| DEFAULT_ORPHAN_GRACE_MINS.to_string())
            .parse()
            .expect("ORPHAN_GRACE_MINS must be a valid i64");
        Self {
            retention_days,
            orphan_grace_mins,
        }
    }
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            retention_days: DEFAULT_RETENTION_DAYS,
            orphan_grace_mins: DEFAULT_ORPHAN_GRACE_MINS,
        }
    }
}
