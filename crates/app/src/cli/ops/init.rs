use clap::Args;

use treefs::state::{AppState, StateError};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Port for the HTTP API (default: 8000)
    #[arg(long)]
    pub port: Option<u16>,

    /// Keep everything in memory instead of under the data directory
    #[arg(long)]
    pub memory: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = AppState::init(ctx.config_path.clone(), self.port, self.memory)?;

        let storage = if self.memory {
            "memory (lost on exit)".to_string()
        } else {
            state.data_path.display().to_string()
        };

        Ok(format!(
            "Initialized treefs directory at: {}\n\
             - Config: {}\n\
             - Storage: {}\n\
             - API port: {}",
            state.treefs_dir.display(),
            state.config_path.display(),
            storage,
            state.config.api_port,
        ))
    }
}
