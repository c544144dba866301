//! Implementation of the `fixflow auth` command.
//!
//! Resolves the token's GitHub account and stores (or overwrites) the
//! credential keyed by that account id. Re-running with a fresh token for the
//! same account replaces the stored one.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::context::AppContext;
use crate::cli::output::{output, CommandOutput};
use crate::domain::ports::GithubClient;
use crate::domain::ports::UserDirectory;

#[derive(Args, Debug)]
pub struct AuthArgs {
    /// GitHub access token to store
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: String,
}

#[derive(Debug, serde::Serialize)]
pub struct AuthOutput {
    pub success: bool,
    pub user_id: i64,
    pub login: String,
    pub created: bool,
}

impl CommandOutput for AuthOutput {
    fn to_human(&self) -> String {
        let verb = if self.created {
            "Registered"
        } else {
            "Refreshed credential for"
        };
        format!("{verb} user {} (id {})", self.login, self.user_id)
    }
}

pub async fn execute(args: AuthArgs, json_mode: bool) -> Result<()> {
    let ctx = AppContext::open().await?;
    let github = ctx.github_client()?;

    let account = github
        .get_user(&args.token)
        .await
        .context("Failed to resolve token against GitHub")?;

    let existing = ctx.users.get(account.id).await?;
    let user = ctx
        .users
        .upsert(account.id, &account.login, &args.token)
        .await?;

    let output_data = AuthOutput {
        success: true,
        user_id: user.id,
        login: user.login,
        created: existing.is_none(),
    };

    ctx.close().await;
    output(&output_data, json_mode);
    Ok(())
}
