//! Environment-driven configuration.

use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use claimdesk_auth::{
    FileStorage, PermissionTable, PermissionTableError, SessionStorage, SessionToken, StorageError,
};

use crate::keyboard::DEFAULT_CHORD_TIMEOUT_MS;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Assumed lifetime of a token handed in through `CLAIMDESK_AUTH_TOKEN`.
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 8 * 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got '{value}'")]
    InvalidDuration { var: &'static str, value: String },

    #[error("failed to read permission table {path:?}: {source}")]
    PermissionsFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Permissions(#[from] PermissionTableError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Clone)]
pub struct ShellConfig {
    pub api_url: String,
    pub session_path: Option<PathBuf>,
    pub chord_timeout: Duration,
    pub permissions_path: Option<PathBuf>,
    /// Bearer token from `CLAIMDESK_AUTH_TOKEN`.
    pub auth_token: Option<String>,
    pub token_ttl: Duration,
}

impl core::fmt::Debug for ShellConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ShellConfig")
            .field("api_url", &self.api_url)
            .field("session_path", &self.session_path)
            .field("chord_timeout", &self.chord_timeout)
            .field("permissions_path", &self.permissions_path)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            session_path: None,
            chord_timeout: Duration::milliseconds(DEFAULT_CHORD_TIMEOUT_MS),
            permissions_path: None,
            auth_token: None,
            token_ttl: Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES),
        }
    }
}

impl ShellConfig {
    /// Read `CLAIMDESK_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = lookup("CLAIMDESK_API_URL").filter(|v| !v.trim().is_empty()) {
            config.api_url = url.trim().to_string();
        } else {
            tracing::warn!("CLAIMDESK_API_URL not set; using {DEFAULT_API_URL}");
        }

        config.session_path = lookup("CLAIMDESK_SESSION_PATH").map(PathBuf::from);
        config.permissions_path = lookup("CLAIMDESK_PERMISSIONS_PATH").map(PathBuf::from);
        config.auth_token = lookup("CLAIMDESK_AUTH_TOKEN")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        if let Some(ms) = positive(&lookup, "CLAIMDESK_CHORD_TIMEOUT_MS")? {
            config.chord_timeout = Duration::milliseconds(ms);
        }
        if let Some(minutes) = positive(&lookup, "CLAIMDESK_TOKEN_TTL_MINUTES")? {
            config.token_ttl = Duration::minutes(minutes);
        }

        Ok(config)
    }

    /// The configured permission table, or the standard one.
    pub fn permission_table(&self) -> Result<PermissionTable, ConfigError> {
        let Some(path) = &self.permissions_path else {
            return Ok(PermissionTable::standard());
        };
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::PermissionsFile {
            path: path.clone(),
            source,
        })?;
        Ok(PermissionTable::from_json(&json)?)
    }

    /// Token to resume with at startup: the configured one, valid for
    /// `token_ttl` from `now`, or else the token saved with the last session.
    pub fn startup_token(&self, storage: &impl SessionStorage, now: DateTime<Utc>) -> Option<SessionToken> {
        if let Some(value) = &self.auth_token {
            return Some(SessionToken::new(value.clone(), now, now + self.token_ttl));
        }
        match storage.load() {
            Ok(saved) => saved.and_then(|s| s.token),
            Err(err) => {
                tracing::warn!(error = %err, "could not read saved session");
                None
            }
        }
    }

    pub fn session_storage(&self) -> Result<FileStorage, ConfigError> {
        match &self.session_path {
            Some(path) => Ok(FileStorage::new(path.clone())),
            None => Ok(FileStorage::default_location()?),
        }
    }
}

fn positive(lookup: &impl Fn(&str) -> Option<String>, var: &'static str) -> Result<Option<i64>, ConfigError> {
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|n| *n > 0)
        .map(Some)
        .ok_or(ConfigError::InvalidDuration { var, value: raw })
}
