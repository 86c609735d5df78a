use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::game::{PieceColor, PieceGlyph};

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub players: PlayersConfig,
    pub log: LogConfig,
}

/// Where user records live.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub users_file: PathBuf,
    /// Rows shown by the leaderboard
    pub leaderboard_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            users_file: PathBuf::from("users.json"),
            leaderboard_size: 5,
        }
    }
}

/// Piece looks for guest players. Registered users bring their own.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayersConfig {
    pub player1_color: PieceColor,
    pub player1_piece: PieceGlyph,
    pub player2_color: PieceColor,
    pub player2_piece: PieceGlyph,
}

impl Default for PlayersConfig {
    fn default() -> Self {
        PlayersConfig {
            player1_color: PieceColor::Red,
            player1_piece: PieceGlyph::new('O').expect("'O' is alphanumeric"),
            player2_color: PieceColor::Yellow,
            player2_piece: PieceGlyph::new('X').expect("'X' is alphanumeric"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Write logs to this file. Without it, the match screen logs nothing
    /// and other commands log to stderr.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Default filter, overridden by `RUST_LOG`
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            file: None,
            level: "warn".to_string(),
        }
    }
}

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::debug!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.users_file.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "store.users_file must not be empty".into(),
            ));
        }
        if self.store.leaderboard_size == 0 {
            return Err(ConfigError::Validation(
                "store.leaderboard_size must be > 0".into(),
            ));
        }
        if self.players.player1_color == self.players.player2_color
            && self.players.player1_piece == self.players.player2_piece
        {
            return Err(ConfigError::Validation(
                "players: guest pieces must differ in color or piece type".into(),
            ));
        }
        if !LOG_LEVELS.contains(&self.log.level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::Validation(format!(
                "log.level must be one of {}",
                LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).expect("default config serializes")
    }
}
