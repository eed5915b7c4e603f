//! Service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DATABASE_URL` - `PostgreSQL` connection string
//!
//! ## Optional
//! - `BIND_ADDR` - Listen address (default: 0.0.0.0:8080)
//! - `MAX_BODY_BYTES` - Largest accepted request body (default: 33554432, 32 MiB)
//! - `STORAGE_BACKEND` - `local` or `s3` (default: local)
//! - `UPLOAD_ROOT` - Directory local uploads are written under (default: public)
//! - `UPLOAD_URL_PREFIX` - First path segment of local references (default: uploads)
//! - `MIN_PHOTO_COUNT` - Photos required to register (default: 4)
//! - `DEFAULT_AVATAR` - Avatar reference for users without one (default: /uploads/avatars/default.png)
//!
//! ## Required when `STORAGE_BACKEND=s3`
//! - `AWS_ACCESS_KEY_ID`
//! - `AWS_SECRET_ACCESS_KEY`
//! - `AWS_REGION`
//! - `AWS_S3_BUCKET`

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_UPLOAD_ROOT: &str = "public";
const DEFAULT_UPLOAD_URL_PREFIX: &str = "uploads";
/// Room for several base64 photos in one JSON body
pub const DEFAULT_MAX_BODY_BYTES: usize = 32 * 1024 * 1024;
pub const DEFAULT_MIN_PHOTO_COUNT: usize = 4;
pub const DEFAULT_AVATAR: &str = "/uploads/avatars/default.png";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Bucket and credentials for the S3 backend.
///
/// Implements `Debug` manually to redact the secret key.
#[derive(Clone)]
pub struct S3Settings {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
    pub bucket: String,
}

impl std::fmt::Debug for S3Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Settings")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"[REDACTED]")
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .finish()
    }
}

/// Where uploaded media goes. Chosen once at startup.
#[derive(Debug, Clone)]
pub enum StorageSettings {
    Local { root: PathBuf, url_prefix: String },
    S3(S3Settings),
}

/// Business knobs of the registration workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationSettings {
    pub min_photo_count: usize,
    pub default_avatar: String,
}

impl Default for RegistrationSettings {
    fn default() -> Self {
        Self {
            min_photo_count: DEFAULT_MIN_PHOTO_COUNT,
            default_avatar: DEFAULT_AVATAR.to_string(),
        }
    }
}

/// Application configuration.
#[derive(Clone)]
pub struct AppConfig {
    /// `PostgreSQL` connection URL (contains password)
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub max_body_bytes: usize,
    pub storage: StorageSettings,
    pub registration: RegistrationSettings,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &"[REDACTED]")
            .field("bind_addr", &self.bind_addr)
            .field("max_body_bytes", &self.max_body_bytes)
            .field("storage", &self.storage)
            .field("registration", &self.registration)
            .finish()
    }
}

impl AppConfig {
    /// Load from the process environment, honoring a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    /// Load from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &str| -> Result<String, ConfigError> {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
        };
        let optional = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let database_url = required("DATABASE_URL")?;

        let bind_addr = optional("BIND_ADDR", DEFAULT_BIND_ADDR)
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("BIND_ADDR".to_string(), e.to_string()))?;

        let max_body_bytes = match lookup("MAX_BODY_BYTES") {
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|bytes| *bytes > 0)
                .ok_or_else(|| {
                    ConfigError::InvalidEnvVar(
                        "MAX_BODY_BYTES".to_string(),
                        format!("expected a positive integer, got `{}`", raw),
                    )
                })?,
            None => DEFAULT_MAX_BODY_BYTES,
        };

        let storage = match optional("STORAGE_BACKEND", "local").to_lowercase().as_str() {
            "local" => StorageSettings::Local {
                root: PathBuf::from(optional("UPLOAD_ROOT", DEFAULT_UPLOAD_ROOT)),
                url_prefix: optional("UPLOAD_URL_PREFIX", DEFAULT_UPLOAD_URL_PREFIX),
            },
            "s3" => StorageSettings::S3(S3Settings {
                access_key_id: required("AWS_ACCESS_KEY_ID")?,
                secret_access_key: required("AWS_SECRET_ACCESS_KEY")?,
                region: required("AWS_REGION")?,
                bucket: required("AWS_S3_BUCKET")?,
            }),
            other => {
                return Err(ConfigError::InvalidEnvVar(
                    "STORAGE_BACKEND".to_string(),
                    format!("expected `local` or `s3`, got `{}`", other),
                ));
            }
        };

        let min_photo_count = match lookup("MIN_PHOTO_COUNT") {
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|count| *count >= 1)
                .ok_or_else(|| {
                    ConfigError::InvalidEnvVar(
                        "MIN_PHOTO_COUNT".to_string(),
                        format!("expected a positive integer, got `{}`", raw),
                    )
                })?,
            None => DEFAULT_MIN_PHOTO_COUNT,
        };

        let default_avatar = optional("DEFAULT_AVATAR", DEFAULT_AVATAR);
        if default_avatar.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "DEFAULT_AVATAR".to_string(),
                "must not be empty".to_string(),
            ));
        }

        Ok(Self {
            database_url,
            bind_addr,
            max_body_bytes,
            storage,
            registration: RegistrationSettings {
                min_photo_count,
                default_avatar,
            },
        })
    }
}
