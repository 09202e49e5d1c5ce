use std::io::Read as _;

use bytes::Bytes;
use clap::{Args, Subcommand};

use common::prelude::Node;
use treefs::http_server::api::client::ApiError;
use treefs::http_server::api::file::delete::DeleteRequest;
use treefs::http_server::api::file::read::{ReadRequest, ReadResponse};
use treefs::http_server::api::file::rename::RenameRequest;
use treefs::http_server::api::file::write::WriteRequest;
use treefs::http_server::api::Status;

use crate::cli::op::{Op, OpContext, TokenError};

crate::command_enum! {
    (Read, Read),
    (Write, Write),
    (Mv, Mv),
    (Rm, Rm),
}

pub type FileCommand = Command;

#[derive(Args, Debug, Clone)]
pub struct File {
    #[command(subcommand)]
    pub command: FileCommand,
}

#[async_trait::async_trait]
impl Op for File {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FileOpError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("{0}")]
    Refused(String),
}

/// Print a file or list a folder
#[derive(Args, Debug, Clone)]
pub struct Read {
    #[command(flatten)]
    pub request: ReadRequest,

    #[arg(long)]
    pub token: Option<String>,
}

/// Write a text file, creating parent folders as needed
#[derive(Args, Debug, Clone)]
pub struct Write {
    pub path: String,

    /// Content to write, read from stdin when omitted
    pub content: Option<String>,

    #[arg(long)]
    pub token: Option<String>,
}

/// Move or rename a file or folder
#[derive(Args, Debug, Clone)]
pub struct Mv {
    #[command(flatten)]
    pub request: RenameRequest,

    #[arg(long)]
    pub token: Option<String>,
}

/// Delete a file or folder with everything inside it
#[derive(Args, Debug, Clone)]
pub struct Rm {
    #[command(flatten)]
    pub request: DeleteRequest,

    #[arg(long)]
    pub token: Option<String>,
}

/// Indented listing of a folder, folders marked with a trailing slash.
fn render(node: &Node) -> String {
    fn walk(node: &Node, depth: usize, lines: &mut Vec<String>) {
        for child in node.children() {
            let marker = if child.is_folder() { "/" } else { "" };
            lines.push(format!("{}{}{}", "  ".repeat(depth), child.name(), marker));
            walk(child, depth + 1, lines);
        }
    }

    let mut lines = vec![node.path().to_string()];
    walk(node, 1, &mut lines);
    lines.join("\n")
}

#[async_trait::async_trait]
impl Op for Read {
    type Error = FileOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut request = self.request.clone();
        request.token = ctx.token(self.token.as_deref())?;

        let raw = ctx.client.fetch(request).await?;
        if raw.is_json() {
            let listing: ReadResponse = serde_json::from_slice(&raw.body)?;
            Ok(render(&listing.data))
        } else {
            Ok(String::from_utf8_lossy(&raw.body).into_owned())
        }
    }
}

#[async_trait::async_trait]
impl Op for Write {
    type Error = FileOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let token = ctx.token(self.token.as_deref())?;
        let content = match &self.content {
            Some(content) => Bytes::from(content.clone()),
            None => {
                let mut buf = Vec::new();
                std::io::stdin().read_to_end(&mut buf)?;
                Bytes::from(buf)
            }
        };

        let response = ctx
            .client
            .call(WriteRequest {
                path: self.path.clone(),
                content,
                token,
            })
            .await?;
        let verb = if response.created { "Created" } else { "Updated" };
        Ok(format!("{} {}", verb, self.path))
    }
}

#[async_trait::async_trait]
impl Op for Mv {
    type Error = FileOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut request = self.request.clone();
        request.token = ctx.token(self.token.as_deref())?;

        let response = ctx.client.call(request).await?;
        match response.status {
            Status::Succeed => Ok(format!("Moved {} to {}", self.request.from, self.request.to)),
            Status::Failed => Err(FileOpError::Refused(
                response.message.unwrap_or_else(|| "move failed".to_string()),
            )),
        }
    }
}

#[async_trait::async_trait]
impl Op for Rm {
    type Error = FileOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut request = self.request.clone();
        request.token = ctx.token(self.token.as_deref())?;

        let response = ctx.client.call(request).await?;
        match response.status {
            Status::Succeed => Ok(format!(
                "Deleted {} ({} file(s) released)",
                self.request.path, response.released
            )),
            Status::Failed => Err(FileOpError::Refused(
                response.message.unwrap_or_else(|| "delete failed".to_string()),
            )),
        }
    }
}
