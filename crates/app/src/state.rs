use std::{fs, path::PathBuf, str::FromStr};

use common::store::StorageConfig;
use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "treefs";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DATA_DIR_NAME: &str = "data";
pub const SESSION_FILE_NAME: &str = "session";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Port for the HTTP API
    #[serde(default = "default_api_port")]
    pub api_port: u16,
    /// Directory for log files (stdout only if not set)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    /// Default log level, overridden by RUST_LOG
    #[serde(default)]
    pub log_level: Option<String>,
    /// Where trees, content, accounts and pictures are kept
    #[serde(default)]
    pub storage: StorageConfig,
}

fn default_api_port() -> u16 {
    8000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_port: default_api_port(),
            log_dir: None,
            log_level: None,
            storage: StorageConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn log_level(&self) -> Result<tracing::Level, StateError> {
        match &self.log_level {
            Some(level) => tracing::Level::from_str(level)
                .map_err(|_| StateError::InvalidLogLevel(level.clone())),
            None => Ok(tracing::Level::INFO),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the treefs directory (~/.treefs)
    pub treefs_dir: PathBuf,
    /// Path to the local storage directory
    pub data_path: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the treefs directory path (custom or default ~/.treefs)
    pub fn treefs_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new treefs state directory.
    ///  With `memory` set nothing is persisted by the service; otherwise
    ///  the storage points at the `data/` subdirectory.
    pub fn init(
        custom_path: Option<PathBuf>,
        api_port: Option<u16>,
        memory: bool,
    ) -> Result<Self, StateError> {
        let treefs_dir = Self::treefs_dir(custom_path)?;

        if treefs_dir.exists() {
            return Err(StateError::AlreadyInitialized);
        }

        fs::create_dir_all(&treefs_dir)?;

        let data_path = treefs_dir.join(DATA_DIR_NAME);
        fs::create_dir_all(&data_path)?;

        let storage = if memory {
            StorageConfig::Memory
        } else {
            StorageConfig::Local {
                path: data_path.clone(),
            }
        };
        let config = AppConfig {
            api_port: api_port.unwrap_or_else(default_api_port),
            storage,
            ..AppConfig::default()
        };
        let config_path = treefs_dir.join(CONFIG_FILE_NAME);
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        Ok(Self {
            treefs_dir,
            data_path,
            config_path,
            config,
        })
    }

    /// Load existing state from the treefs directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let treefs_dir = Self::treefs_dir(custom_path)?;

        if !treefs_dir.exists() {
            return Err(StateError::NotInitialized);
        }

        let data_path = treefs_dir.join(DATA_DIR_NAME);
        let config_path = treefs_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            return Err(StateError::MissingFile(CONFIG_FILE_NAME.to_string()));
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        Ok(Self {
            treefs_dir,
            data_path,
            config_path,
            config,
        })
    }

    /// Remember the token of the last sign-in for later CLI calls.
    pub fn save_token(&self, token: &str) -> Result<(), StateError> {
        fs::write(self.treefs_dir.join(SESSION_FILE_NAME), token)?;
        Ok(())
    }

    pub fn load_token(&self) -> Result<Option<String>, StateError> {
        let path = self.treefs_dir.join(SESSION_FILE_NAME);
        if !path.exists() {
            return Ok(None);
        }
        let token = fs::read_to_string(path)?.trim().to_string();
        Ok(Some(token).filter(|t| !t.is_empty()))
    }

    pub fn clear_token(&self) -> Result<(), StateError> {
        let path = self.treefs_dir.join(SESSION_FILE_NAME);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("treefs directory not initialized. Run 'treefs init' first")]
    NotInitialized,

    #[error("treefs directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("invalid log level: {0}")]
    InvalidLogLevel(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}
