//! Port trait definitions (Hexagonal Architecture)
//!
//! Async trait interfaces that infrastructure adapters implement:
//! - `GithubClient`: outbound GitHub REST API calls
//! - `IssueRepository`: issue persistence and upsert semantics
//! - `FixRepository`: fix draft persistence
//! - `UserDirectory`: enumeration and bootstrap of local users
//!
//! Services depend on these traits, not on concrete implementations, which
//! keeps the ingestion pipeline testable against in-memory fakes.

pub mod errors;
pub mod fix_repository;
pub mod github_client;
pub mod issue_repository;
pub mod user_directory;

pub use errors::{DatabaseError, GithubApiError};
pub use fix_repository::{FixRepository, NewFix};
pub use github_client::GithubClient;
pub use issue_repository::{IssueFilters, IssueRepository, NewIssue};
pub use user_directory::UserDirectory;
