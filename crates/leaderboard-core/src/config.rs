// Configuration loading and parsing (config/leaderboard.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::loader::SourceLocation;

const CONFIG_FILE: &str = "leaderboard.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub sources: SourcesConfig,
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
}

/// Raw deserialization target for leaderboard.toml.
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    sources: RawSources,
    #[serde(default)]
    display: DisplayConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
struct RawSources {
    players: String,
    ranks: String,
    selections: String,
}

/// Where each of the three sheets lives. Relative paths are resolved against
/// the config base directory.
#[derive(Debug, Clone, PartialEq)]
pub struct SourcesConfig {
    pub players: SourceLocation,
    pub ranks: SourceLocation,
    pub selections: SourceLocation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// How many leaderboard users to show.
    pub top_users: usize,
    /// How many players to show per role bucket.
    pub top_per_role: usize,
    pub format: ReportFormat,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            top_users: 5,
            top_per_role: 3,
            format: ReportFormat::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
    /// Log file path. Logs go to stderr when unset.
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "leaderboard=info,leaderboard_core=info,warn".into(),
            file: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/leaderboard.toml` relative to
/// `base_dir`. Does not copy defaults; see [`load_config`].
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let file: ConfigFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    validate(&file)?;

    Ok(Config {
        sources: SourcesConfig {
            players: SourceLocation::parse(&file.sources.players, base_dir),
            ranks: SourceLocation::parse(&file.sources.ranks, base_dir),
            selections: SourceLocation::parse(&file.sources.selections, base_dir),
        },
        display: file.display,
        logging: file.logging,
    })
}

/// Seed `config/leaderboard.toml` from `defaults/leaderboard.toml` when it is
/// missing. Returns the path written, or `None` when a config already exists.
/// An existing config is never overwritten.
pub fn ensure_config_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE);
    if target.exists() {
        return Ok(None);
    }

    let default_file = base_dir.join("defaults").join(CONFIG_FILE);
    if !default_file.is_file() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "no config/{CONFIG_FILE} and no defaults/{CONFIG_FILE} in {}",
                base_dir.display()
            ),
        });
    }
    let copy_err = |e: std::io::Error| ConfigError::DefaultsCopyError {
        message: format!(
            "failed to copy {} to {}: {e}",
            default_file.display(),
            target.display()
        ),
    };

    if let Some(config_dir) = target.parent() {
        std::fs::create_dir_all(config_dir).map_err(copy_err)?;
    }
    let content = std::fs::read(&default_file).map_err(copy_err)?;
    let mut dest = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&target)
        .map_err(copy_err)?;
    std::io::Write::write_all(&mut dest, &content).map_err(copy_err)?;

    Ok(Some(target))
}

/// Seed the config from defaults if needed, then load it relative to
/// `base_dir`.
pub fn load_config(base_dir: &Path) -> Result<Config, ConfigError> {
    ensure_config_file(base_dir)?;
    load_config_from(base_dir)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn validate(file: &ConfigFile) -> Result<(), ConfigError> {
    let sources: &[(&str, &str)] = &[
        ("sources.players", file.sources.players.as_str()),
        ("sources.ranks", file.sources.ranks.as_str()),
        ("sources.selections", file.sources.selections.as_str()),
    ];
    for (name, val) in sources {
        if val.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must not be empty".into(),
            });
        }
    }

    let limits: &[(&str, usize)] = &[
        ("display.top_users", file.display.top_users),
        ("display.top_per_role", file.display.top_per_role),
    ];
    for (name, val) in limits {
        if *val == 0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must be > 0".into(),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
