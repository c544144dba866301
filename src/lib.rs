//! Fixflow - GitHub Issue Ingestion & AI-Fixability Triage
//!
//! Fixflow mirrors the GitHub issues a user can reach into a local store,
//! classifies each one for AI-fixability, and manages draft fixes for the
//! issues that qualify. Issues arrive through a bulk synchronization pass
//! over the user's repositories or through signed GitHub webhook deliveries.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Models and the ports services depend on
//! - **Service Layer** (`services`): Classification, synchronization, webhook
//!   ingestion, and fix lifecycle logic
//! - **Infrastructure Layer** (`infrastructure`): SQLite repositories, the
//!   GitHub HTTP client, configuration, and signature verification
//! - **CLI Layer** (`cli`): Command-line interface

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    Config, DatabaseConfig, Fix, FixStatus, GithubConfig, Issue, IssuePayload, LoggingConfig,
    User, WebhookAuthMode, WebhookConfig,
};
pub use domain::ports::{
    DatabaseError, FixRepository, GithubApiError, GithubClient, IssueFilters, IssueRepository,
    NewFix, NewIssue, UserDirectory,
};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{
    classify, BulkSync, FixError, FixService, IngestError, IssueSync, RefreshSummary, SyncError,
    SyncedIssue, WebhookAck, WebhookAuth, WebhookIngest,
};
