use std::path::PathBuf;

use common::store::StorageConfig;

#[derive(Debug, Clone)]
pub struct Config {
    // storage configuration
    /// Backend holding trees, content, accounts and pictures
    pub storage: StorageConfig,

    // http server configuration
    /// Port for the API HTTP server
    pub api_port: u16,

    // logging
    pub log_level: tracing::Level,
    /// Directory for log files (optional, logs to stdout only if not set)
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageConfig::Memory,
            api_port: 8000,
            log_level: tracing::Level::INFO,
            log_dir: None,
        }
    }
}
