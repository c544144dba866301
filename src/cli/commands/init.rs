//! Implementation of the `fixflow init` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tokio::fs;

use crate::cli::output::{output, CommandOutput};
use crate::infrastructure::database::DatabaseConnection;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Force reinitialization even if already initialized
    #[arg(long, short)]
    pub force: bool,

    /// Target directory (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Debug, serde::Serialize)]
pub struct InitOutput {
    pub success: bool,
    pub message: String,
    pub initialized_path: PathBuf,
    pub config_written: bool,
    pub database_initialized: bool,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.message.clone()];
        if self.config_written {
            lines.push("Wrote .fixflow/config.yaml".to_string());
        }
        if self.database_initialized {
            lines.push("Database initialized at .fixflow/fixflow.db".to_string());
        }
        lines.join("\n")
    }
}

const CONFIG_TEMPLATE: &str = "\
# Fixflow configuration. Environment variables with the FIXFLOW_ prefix
# override these values; nested keys use __, e.g. FIXFLOW_LOGGING__LEVEL.
database:
  path: .fixflow/fixflow.db
  max_connections: 10

logging:
  level: info
  format: pretty

github:
  api_base_url: https://api.github.com
  request_timeout_secs: 30

webhook:
  # enforced rejects deliveries without a valid X-Hub-Signature-256 and
  # requires `secret`; disabled skips the check entirely (local dev only).
  auth_mode: enforced
  # secret: replace-with-your-webhook-secret
";

pub async fn execute(args: InitArgs, json_mode: bool) -> Result<()> {
    let target_path = if args.path.is_absolute() {
        args.path.clone()
    } else {
        std::env::current_dir()
            .context("Failed to get current directory")?
            .join(&args.path)
    };

    let fixflow_dir = target_path.join(".fixflow");

    if fixflow_dir.exists() && !args.force {
        let output_data = InitOutput {
            success: false,
            message: "Project already initialized. Use --force to reinitialize.".to_string(),
            initialized_path: target_path,
            config_written: false,
            database_initialized: false,
        };
        output(&output_data, json_mode);
        return Ok(());
    }

    if args.force && fixflow_dir.exists() {
        fs::remove_dir_all(&fixflow_dir)
            .await
            .context("Failed to remove existing .fixflow directory")?;
    }

    fs::create_dir_all(&fixflow_dir)
        .await
        .with_context(|| format!("Failed to create {}", fixflow_dir.display()))?;

    let config_path = fixflow_dir.join("config.yaml");
    fs::write(&config_path, CONFIG_TEMPLATE)
        .await
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    let db_path = fixflow_dir.join("fixflow.db");
    let db_url = format!("sqlite:{}", db_path.display());
    let db = DatabaseConnection::new(&db_url, 1)
        .await
        .context("Failed to initialize database")?;
    db.migrate().await.context("Failed to run migrations")?;
    db.close().await;

    let output_data = InitOutput {
        success: true,
        message: if args.force {
            "Project reinitialized successfully.".to_string()
        } else {
            "Project initialized successfully.".to_string()
        },
        initialized_path: target_path,
        config_written: true,
        database_initialized: true,
    };

    output(&output_data, json_mode);
    Ok(())
}
