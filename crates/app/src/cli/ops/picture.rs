use std::path::PathBuf;

use bytes::Bytes;
use clap::Args;

use treefs::http_server::api::client::ApiError;
use treefs::http_server::api::picture::upload::UploadRequest;

use crate::cli::op::{Op, OpContext, TokenError};

/// Upload a picture and print the URL it is served under
#[derive(Args, Debug, Clone)]
pub struct Picture {
    /// Picture file to upload
    pub file: PathBuf,

    #[arg(long)]
    pub token: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum PictureOpError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait::async_trait]
impl Op for Picture {
    type Error = PictureOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let token = ctx.token(self.token.as_deref())?;
        let data = tokio::fs::read(&self.file).await?;
        let file_name = self
            .file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        let response = ctx
            .client
            .call(UploadRequest {
                file_name,
                data: Bytes::from(data),
                token,
            })
            .await?;
        let url = ctx.client.base_url().join(&response.url).map_err(ApiError::from)?;
        Ok(url.to_string())
    }
}
