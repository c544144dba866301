use crate::domain::models::Issue;
use crate::domain::ports::errors::DatabaseError;
use async_trait::async_trait;

/// Filters for querying a user's stored issues
#[derive(Default, Debug, Clone)]
pub struct IssueFilters {
    /// Title substring match
    pub search: Option<String>,
    /// Repository full-name substring match
    pub repo_name: Option<String>,
    /// Label substring match against the stored label list
    pub label: Option<String>,
    pub is_ai_fixable: Option<bool>,
    pub limit: Option<i64>,
}

/// Fields written on upsert. The fixability verdict is computed by the caller
/// from this same payload, never reused from an earlier record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIssue {
    pub github_issue_id: i64,
    pub title: String,
    pub repo_full_name: String,
    pub description: Option<String>,
    pub state: String,
    pub html_url: Option<String>,
    pub labels: Vec<String>,
    pub is_ai_fixable: bool,
    pub user_id: i64,
}

/// Repository port for issue persistence.
///
/// Upserts are keyed on `(github_issue_id, user_id)`: the same GitHub issue
/// exists independently per local user, and records are never merged across
/// users or deleted by the sync flow.
#[async_trait]
pub trait IssueRepository: Send + Sync {
    /// Insert or overwrite one record. Returns the stored row and whether it
    /// was newly created. One transaction per call.
    async fn upsert(&self, record: &NewIssue) -> Result<(Issue, bool), DatabaseError>;

    /// Upsert a batch inside a single transaction — one commit for a whole
    /// webhook fan-out. Results are in input order.
    async fn upsert_batch(&self, records: &[NewIssue])
        -> Result<Vec<(Issue, bool)>, DatabaseError>;

    /// Get an issue by local id, scoped to its owning user.
    async fn get(&self, id: i64, user_id: i64) -> Result<Option<Issue>, DatabaseError>;

    /// Get an issue by GitHub issue id, scoped to its owning user.
    async fn get_by_source(
        &self,
        github_issue_id: i64,
        user_id: i64,
    ) -> Result<Option<Issue>, DatabaseError>;

    /// List a user's issues with optional filters.
    async fn list(&self, user_id: i64, filters: &IssueFilters)
        -> Result<Vec<Issue>, DatabaseError>;

    /// Overwrite the stored fixability verdict of one issue, scoped to its
    /// owning user. Fails with `IssueNotFound` when the row does not exist
    /// or belongs to another user.
    async fn set_fixability(
        &self,
        id: i64,
        user_id: i64,
        is_ai_fixable: bool,
    ) -> Result<(), DatabaseError>;
}
