//! Implementation of the `fixflow sync` command.

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{presets, Attribute, Cell, ContentArrangement, Table};

use crate::cli::context::AppContext;
use crate::cli::output::{output, truncate, CommandOutput};
use crate::services::SyncedIssue;

#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Local user whose repositories are synchronized
    #[arg(long = "user")]
    pub user_id: i64,

    /// Also pull issues from the upstream parents of forked repositories
    #[arg(long)]
    pub fork_sources: bool,
}

#[derive(Debug, serde::Serialize)]
pub struct SyncOutput {
    pub success: bool,
    pub user_id: i64,
    pub total: usize,
    pub created: usize,
    pub updated: usize,
    pub issues: Vec<SyncedIssue>,
}

impl CommandOutput for SyncOutput {
    fn to_human(&self) -> String {
        if self.issues.is_empty() {
            return format!("No issues found for user {}", self.user_id);
        }

        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL_CONDENSED)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("Repository").add_attribute(Attribute::Bold),
                Cell::new("Issue").add_attribute(Attribute::Bold),
                Cell::new("Title").add_attribute(Attribute::Bold),
                Cell::new("Fixable").add_attribute(Attribute::Bold),
                Cell::new("Result").add_attribute(Attribute::Bold),
            ]);

        for synced in &self.issues {
            let repo = if synced.is_parent_of_fork {
                format!("{} (fork parent)", synced.repo_full_name)
            } else {
                synced.repo_full_name.clone()
            };
            table.add_row(vec![
                Cell::new(repo),
                Cell::new(synced.issue.github_issue_id),
                Cell::new(truncate(&synced.issue.title, 48)),
                Cell::new(if synced.issue.is_ai_fixable { "yes" } else { "no" }),
                Cell::new(if synced.created { "created" } else { "updated" }),
            ]);
        }

        format!(
            "{table}\n{} issue(s): {} created, {} updated",
            self.total, self.created, self.updated
        )
    }
}

pub async fn execute(args: SyncArgs, json_mode: bool) -> Result<()> {
    let ctx = AppContext::open().await?;
    let bulk = ctx.bulk_sync()?;

    let issues = bulk
        .sync_all_issues_for_user(args.user_id, args.fork_sources)
        .await
        .context("Bulk sync failed")?;

    let created = issues.iter().filter(|s| s.created).count();
    let output_data = SyncOutput {
        success: true,
        user_id: args.user_id,
        total: issues.len(),
        created,
        updated: issues.len() - created,
        issues,
    };

    ctx.close().await;
    output(&output_data, json_mode);
    Ok(())
}
