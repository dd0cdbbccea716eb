//! Runtime configuration.
//!
//! Loaded from TOML; every field has a default so an absent or partial file
//! is fine.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::QuizError;
use crate::protocol::DEFAULT_BIND;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "trivia-quiz.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub quiz: QuizConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_amount")]
    pub amount: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizConfig {
    #[serde(default = "default_duration_secs")]
    pub duration_secs: u64,
    /// Remaining time below which the timer is shown as a warning.
    #[serde(default = "default_warning_secs")]
    pub warning_secs: u64,
    #[serde(default = "default_tick_millis")]
    pub tick_millis: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_session")]
    pub session: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            amount: default_amount(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            duration_secs: default_duration_secs(),
            warning_secs: default_warning_secs(),
            tick_millis: default_tick_millis(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: default_store_dir(),
            session: default_session(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_base_url() -> String {
    "https://opentdb.com/api.php".to_string()
}

fn default_amount() -> usize {
    15
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_duration_secs() -> u64 {
    30 * 60
}

fn default_warning_secs() -> u64 {
    5 * 60
}

fn default_tick_millis() -> u64 {
    1000
}

fn default_session() -> String {
    "default".to_string()
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}


fn default_store_dir() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .unwrap_or_else(std::env::temp_dir)
        .join("trivia-quiz")
}

impl QuizConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }

    pub fn warning(&self) -> Duration {
        Duration::from_secs(self.warning_secs)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_millis.max(1))
    }
}

impl StoreConfig {
    /// Path of the session file for the configured session name.
    pub fn session_file(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.session))
    }
}

impl Config {
    /// Load from `path`, or from [`DEFAULT_CONFIG_FILE`] if it exists, or defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, QuizError> {
        match path {
            Some(p) => {
                let content = fs::read_to_string(p).map_err(|e| {
                    QuizError::Config(format!("Failed to read config from {}: {}", p.display(), e))
                })?;
                Self::from_toml(&content)
            }
            None => match fs::read_to_string(DEFAULT_CONFIG_FILE) {
                Ok(content) => Self::from_toml(&content),
                Err(_) => {
                    debug!("no config file found, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, QuizError> {
        toml::from_str(content)
            .map_err(|e| QuizError::Config(format!("Failed to parse config: {}", e)))
    }
}
