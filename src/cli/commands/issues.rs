//! Implementation of the `fixflow issues` commands.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use comfy_table::{presets, Attribute, Cell, ContentArrangement, Table};

use crate::cli::context::AppContext;
use crate::cli::output::{output, truncate, CommandOutput};
use crate::domain::models::Issue;
use crate::domain::ports::{IssueFilters, IssueRepository};

#[derive(Args, Debug)]
pub struct IssuesArgs {
    #[command(subcommand)]
    pub command: IssuesCommands,
}

#[derive(Subcommand, Debug)]
pub enum IssuesCommands {
    /// List a user's stored issues
    List {
        /// Owning local user
        #[arg(long = "user")]
        user_id: i64,

        /// Title substring filter
        #[arg(long)]
        title: Option<String>,

        /// Repository full-name substring filter
        #[arg(long)]
        repo: Option<String>,

        /// Label substring filter
        #[arg(long)]
        label: Option<String>,

        /// Only issues with this AI-fixability verdict
        #[arg(long)]
        fixable: Option<bool>,

        /// Maximum number of issues to display
        #[arg(long, default_value = "50")]
        limit: i64,
    },

    /// Show one stored issue by local id
    Show {
        /// Local issue id
        issue_id: i64,

        /// Owning local user
        #[arg(long = "user")]
        user_id: i64,
    },

    /// Recompute fixability verdicts for a user's stored issues
    Refresh {
        /// Owning local user
        #[arg(long = "user")]
        user_id: i64,
    },
}

#[derive(Debug, serde::Serialize)]
pub struct IssueListOutput {
    pub success: bool,
    pub count: usize,
    pub issues: Vec<Issue>,
}

impl CommandOutput for IssueListOutput {
    fn to_human(&self) -> String {
        if self.issues.is_empty() {
            return "No issues match the given filters".to_string();
        }

        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL_CONDENSED)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("ID").add_attribute(Attribute::Bold),
                Cell::new("Repository").add_attribute(Attribute::Bold),
                Cell::new("Title").add_attribute(Attribute::Bold),
                Cell::new("State").add_attribute(Attribute::Bold),
                Cell::new("Labels").add_attribute(Attribute::Bold),
                Cell::new("Fixable").add_attribute(Attribute::Bold),
            ]);

        for issue in &self.issues {
            table.add_row(vec![
                Cell::new(issue.id),
                Cell::new(&issue.repo_full_name),
                Cell::new(truncate(&issue.title, 48)),
                Cell::new(&issue.state),
                Cell::new(truncate(&issue.labels.join(", "), 32)),
                Cell::new(if issue.is_ai_fixable { "yes" } else { "no" }),
            ]);
        }

        format!("{table}\n{} issue(s)", self.count)
    }
}

#[derive(Debug, serde::Serialize)]
pub struct IssueShowOutput {
    pub success: bool,
    pub issue: Issue,
}

impl CommandOutput for IssueShowOutput {
    fn to_human(&self) -> String {
        let issue = &self.issue;
        let mut lines = vec![
            format!("Issue #{} ({})", issue.id, issue.repo_full_name),
            format!("  GitHub id:  {}", issue.github_issue_id),
            format!("  Title:      {}", issue.title),
            format!("  State:      {}", issue.state),
            format!("  Labels:     {}", issue.labels.join(", ")),
            format!(
                "  AI-fixable: {}",
                if issue.is_ai_fixable { "yes" } else { "no" }
            ),
        ];
        if let Some(url) = &issue.html_url {
            lines.push(format!("  URL:        {url}"));
        }
        if let Some(description) = &issue.description {
            lines.push(String::new());
            lines.push(description.clone());
        }
        lines.join("\n")
    }
}

#[derive(Debug, serde::Serialize)]
pub struct IssueRefreshOutput {
    pub success: bool,
    pub checked: usize,
    pub updated: usize,
}

impl CommandOutput for IssueRefreshOutput {
    fn to_human(&self) -> String {
        format!("Updated {} of {} issue(s)", self.updated, self.checked)
    }
}

pub async fn execute(args: IssuesArgs, json_mode: bool) -> Result<()> {
    let ctx = AppContext::open().await?;

    match args.command {
        IssuesCommands::List {
            user_id,
            title,
            repo,
            label,
            fixable,
            limit,
        } => {
            let filters = IssueFilters {
                search: title,
                repo_name: repo,
                label,
                is_ai_fixable: fixable,
                limit: Some(limit),
            };
            let issues = ctx.issues.list(user_id, &filters).await?;
            let output_data = IssueListOutput {
                success: true,
                count: issues.len(),
                issues,
            };
            ctx.close().await;
            output(&output_data, json_mode);
        }
        IssuesCommands::Show { issue_id, user_id } => {
            let issue = ctx.issues.get(issue_id, user_id).await?;
            ctx.close().await;
            match issue {
                Some(issue) => output(
                    &IssueShowOutput {
                        success: true,
                        issue,
                    },
                    json_mode,
                ),
                None => bail!("issue {issue_id} not found for user {user_id}"),
            }
        }
        IssuesCommands::Refresh { user_id } => {
            let summary = ctx.issue_sync().refresh_classifications(user_id).await?;
            ctx.close().await;
            output(
                &IssueRefreshOutput {
                    success: true,
                    checked: summary.checked,
                    updated: summary.updated,
                },
                json_mode,
            );
        }
    }

    Ok(())
}
