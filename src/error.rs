use std::path::PathBuf;

use crate::game::PlayerError;

/// Errors that can occur reading or writing the user record file.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read user records from {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(
        "failed to parse user records in {path} (expected a JSON list of user objects; \
         back up and fix the file): {source}"
    )]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to write user records to {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from account operations (registration, login, stats updates).
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("username '{0}' is taken")]
    UsernameTaken(String),

    #[error("'{0}' is reserved for guest accounts")]
    ReservedName(String),

    #[error("no account named '{0}'")]
    UnknownUser(String),

    #[error("invalid username or PIN")]
    BadCredentials,

    #[error("'{0}' is already logged in")]
    AlreadyLoggedIn(String),

    #[error("guest accounts cannot be customized")]
    GuestAccount,

    #[error("PIN must be exactly 4 digits")]
    InvalidPin,

    #[error(transparent)]
    Player(#[from] PlayerError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
