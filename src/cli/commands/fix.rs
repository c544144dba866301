//! Implementation of the `fixflow fix` commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use comfy_table::{presets, Attribute, Cell, ContentArrangement, Table};

use crate::cli::context::AppContext;
use crate::cli::output::{output, truncate, CommandOutput};
use crate::domain::models::Fix;

#[derive(Args, Debug)]
pub struct FixArgs {
    #[command(subcommand)]
    pub command: FixCommands,
}

#[derive(Subcommand, Debug)]
pub enum FixCommands {
    /// Generate a templated draft for an AI-fixable issue
    Generate {
        /// Local issue id
        issue_id: i64,

        /// Owning local user
        #[arg(long = "user")]
        user_id: i64,
    },

    /// Store a hand-written fix draft
    Create {
        /// Local issue id
        issue_id: i64,

        /// Owning local user
        #[arg(long = "user")]
        user_id: i64,

        /// Draft content
        #[arg(long)]
        content: String,

        /// Optional submission message to record with the draft
        #[arg(long)]
        message: Option<String>,
    },

    /// List the drafts of an issue
    List {
        /// Local issue id
        issue_id: i64,

        /// Owning local user
        #[arg(long = "user")]
        user_id: i64,
    },

    /// Submit a draft, recording the message and placeholder PR URL
    Submit {
        /// Fix id
        fix_id: i64,

        /// Owning local user
        #[arg(long = "user")]
        user_id: i64,

        /// Submission message
        #[arg(long)]
        message: String,
    },

    /// Delete a draft (the issue is untouched)
    Delete {
        /// Fix id
        fix_id: i64,

        /// Owning local user
        #[arg(long = "user")]
        user_id: i64,
    },
}

#[derive(Debug, serde::Serialize)]
pub struct FixOutput {
    pub success: bool,
    pub message: String,
    pub fix: Option<Fix>,
}

impl CommandOutput for FixOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.message.clone()];
        if let Some(fix) = &self.fix {
            lines.push(format!(
                "  Fix {} (issue {}), status {}",
                fix.id, fix.issue_id, fix.status
            ));
            if let Some(url) = &fix.pr_url {
                lines.push(format!("  PR: {url}"));
            }
        }
        lines.join("\n")
    }
}

#[derive(Debug, serde::Serialize)]
pub struct FixListOutput {
    pub success: bool,
    pub count: usize,
    pub fixes: Vec<Fix>,
}

impl CommandOutput for FixListOutput {
    fn to_human(&self) -> String {
        if self.fixes.is_empty() {
            return "No fixes for this issue".to_string();
        }

        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL_CONDENSED)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("ID").add_attribute(Attribute::Bold),
                Cell::new("Status").add_attribute(Attribute::Bold),
                Cell::new("Content").add_attribute(Attribute::Bold),
                Cell::new("PR").add_attribute(Attribute::Bold),
            ]);

        for fix in &self.fixes {
            table.add_row(vec![
                Cell::new(fix.id),
                Cell::new(fix.status.to_string()),
                Cell::new(truncate(&fix.content, 48)),
                Cell::new(fix.pr_url.as_deref().unwrap_or("-")),
            ]);
        }

        format!("{table}\n{} fix(es)", self.count)
    }
}

pub async fn execute(args: FixArgs, json_mode: bool) -> Result<()> {
    let ctx = AppContext::open().await?;
    let service = ctx.fix_service();

    match args.command {
        FixCommands::Generate { issue_id, user_id } => {
            let fix = service.generate_fix(issue_id, user_id).await?;
            ctx.close().await;
            output(
                &FixOutput {
                    success: true,
                    message: format!("Generated draft for issue {issue_id}"),
                    fix: Some(fix),
                },
                json_mode,
            );
        }
        FixCommands::Create {
            issue_id,
            user_id,
            content,
            message,
        } => {
            let fix = service.create_fix(issue_id, user_id, content, message).await?;
            ctx.close().await;
            output(
                &FixOutput {
                    success: true,
                    message: format!("Created draft for issue {issue_id}"),
                    fix: Some(fix),
                },
                json_mode,
            );
        }
        FixCommands::List { issue_id, user_id } => {
            let fixes = service.list_fixes(issue_id, user_id).await?;
            ctx.close().await;
            output(
                &FixListOutput {
                    success: true,
                    count: fixes.len(),
                    fixes,
                },
                json_mode,
            );
        }
        FixCommands::Submit {
            fix_id,
            user_id,
            message,
        } => {
            let fix = service.submit_fix(fix_id, user_id, message).await?;
            ctx.close().await;
            output(
                &FixOutput {
                    success: true,
                    message: format!("Submitted fix {fix_id}"),
                    fix: Some(fix),
                },
                json_mode,
            );
        }
        FixCommands::Delete { fix_id, user_id } => {
            service.delete_fix(fix_id, user_id).await?;
            ctx.close().await;
            output(
                &FixOutput {
                    success: true,
                    message: format!("Deleted fix {fix_id}"),
                    fix: None,
                },
                json_mode,
            );
        }
    }

    Ok(())
}
