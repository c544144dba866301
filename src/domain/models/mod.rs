pub mod config;
pub mod fix;
pub mod github;
pub mod issue;
pub mod user;

pub use config::{
    Config, DatabaseConfig, GithubConfig, LoggingConfig, WebhookAuthMode, WebhookConfig,
};
pub use fix::{Fix, FixStatus};
pub use github::{
    GithubUser, IssuesEvent, Label, ParentRepo, RawIssue, RepoDetail, RepoRef, Repository,
};
pub use issue::{Issue, IssuePayload};
pub use user::User;
