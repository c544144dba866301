//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};

use crate::cli::commands::auth::AuthArgs;
use crate::cli::commands::fix::FixArgs;
use crate::cli::commands::init::InitArgs;
use crate::cli::commands::issues::IssuesArgs;
use crate::cli::commands::sync::SyncArgs;

#[derive(Parser)]
#[command(name = "fixflow")]
#[command(about = "GitHub issue ingestion and AI-fixability triage", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize Fixflow configuration and database
    Init(InitArgs),

    /// Store or refresh a user's GitHub credential
    Auth(AuthArgs),

    /// Synchronize all issues reachable from a user's repositories
    Sync(SyncArgs),

    /// Query stored issues
    Issues(IssuesArgs),

    /// Manage fix drafts
    Fix(FixArgs),
}
