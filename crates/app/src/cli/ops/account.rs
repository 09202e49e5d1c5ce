use clap::{Args, Subcommand};

use treefs::http_server::api::account::check::CheckRequest;
use treefs::http_server::api::account::signin::SigninRequest;
use treefs::http_server::api::account::signout::SignoutRequest;
use treefs::http_server::api::account::signup::SignupRequest;
use treefs::http_server::api::account::{Credentials, TokenResponse};
use treefs::http_server::api::client::ApiError;
use treefs::http_server::api::Status;
use treefs::state::{AppState, StateError};

use crate::cli::op::{Op, OpContext, TokenError};

crate::command_enum! {
    (Signup, Signup),
    (Signin, Signin),
    (Signout, Signout),
    (Check, Check),
}

pub type AccountCommand = Command;

#[derive(Args, Debug, Clone)]
pub struct Account {
    #[command(subcommand)]
    pub command: AccountCommand,
}

#[async_trait::async_trait]
impl Op for Account {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AccountOpError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error("state error: {0}")]
    State(#[from] StateError),
    #[error("{0}")]
    Refused(String),
}

/// Create an account and keep its session token
#[derive(Args, Debug, Clone)]
pub struct Signup {
    #[command(flatten)]
    pub credentials: Credentials,
}

/// Sign in and keep the session token
#[derive(Args, Debug, Clone)]
pub struct Signin {
    #[command(flatten)]
    pub credentials: Credentials,
}

/// End the current session
#[derive(Args, Debug, Clone)]
pub struct Signout {
    #[arg(long)]
    pub token: Option<String>,
}

/// Show who the current session belongs to
#[derive(Args, Debug, Clone)]
pub struct Check {
    #[arg(long)]
    pub token: Option<String>,
}

/// Save an issued token when a config directory exists, so later commands
///  can omit `--token`.
fn keep_token(ctx: &OpContext, response: TokenResponse) -> Result<String, AccountOpError> {
    let token = match (response.status, response.token) {
        (Status::Succeed, Some(token)) => token,
        (_, _) => {
            return Err(AccountOpError::Refused(
                response.message.unwrap_or_else(|| "refused".to_string()),
            ))
        }
    };
    match AppState::load(ctx.config_path.clone()) {
        Ok(state) => {
            state.save_token(&token)?;
            Ok(format!("Signed in, session saved ({})", token))
        }
        Err(StateError::NotInitialized) => Ok(token),
        Err(e) => Err(e.into()),
    }
}

#[async_trait::async_trait]
impl Op for Signup {
    type Error = AccountOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let response = ctx
            .client
            .call(SignupRequest(self.credentials.clone()))
            .await?;
        keep_token(ctx, response)
    }
}

#[async_trait::async_trait]
impl Op for Signin {
    type Error = AccountOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let response = ctx
            .client
            .call(SigninRequest(self.credentials.clone()))
            .await?;
        keep_token(ctx, response)
    }
}

#[async_trait::async_trait]
impl Op for Signout {
    type Error = AccountOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let token = ctx.token(self.token.as_deref())?;
        let response = ctx.client.call(SignoutRequest { token }).await?;

        if let Ok(state) = AppState::load(ctx.config_path.clone()) {
            state.clear_token()?;
        }
        match response.status {
            Status::Succeed => Ok("Signed out".to_string()),
            Status::Failed => Ok("Session was already gone".to_string()),
        }
    }
}

#[async_trait::async_trait]
impl Op for Check {
    type Error = AccountOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let token = ctx.token(self.token.as_deref())?;
        let response = ctx.client.call(CheckRequest { token }).await?;
        match (response.status, response.username) {
            (Status::Succeed, Some(username)) => Ok(format!("Signed in as {}", username)),
            _ => Err(AccountOpError::Refused("session is not valid".to_string())),
        }
    }
}
