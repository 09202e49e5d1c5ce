use clap::Args;

use treefs::state::{AppState, StateError};
use treefs::{spawn_service, ServiceConfig};

#[derive(Args, Debug, Clone)]
pub struct Daemon {
    /// Override the configured API port
    #[arg(long)]
    pub port: Option<u16>,
}

#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    #[error("state error: {0}")]
    StateError(#[from] StateError),

    #[error("daemon failed: {0}")]
    Failed(String),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Daemon {
    type Error = DaemonError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        // Load state from config path (or default ~/.treefs)
        let state = AppState::load(ctx.config_path.clone())?;

        let config = ServiceConfig {
            storage: state.config.storage.clone(),
            api_port: self.port.unwrap_or(state.config.api_port),
            log_level: state.config.log_level()?,
            log_dir: state.config.log_dir.clone(),
        };

        spawn_service(&config)
            .await
            .map_err(|e| DaemonError::Failed(e.to_string()))?;
        Ok("daemon ended".to_string())
    }
}
