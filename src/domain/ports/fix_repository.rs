use crate::domain::models::{Fix, FixStatus};
use crate::domain::ports::errors::DatabaseError;
use async_trait::async_trait;

/// Fields for a freshly created fix draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFix {
    pub issue_id: i64,
    pub content: String,
    pub status: FixStatus,
    pub submission_message: Option<String>,
}

/// Repository port for fix draft persistence.
#[async_trait]
pub trait FixRepository: Send + Sync {
    async fn insert(&self, fix: &NewFix) -> Result<Fix, DatabaseError>;

    async fn get(&self, id: i64) -> Result<Option<Fix>, DatabaseError>;

    async fn list_for_issue(&self, issue_id: i64) -> Result<Vec<Fix>, DatabaseError>;

    /// Overwrite a fix's mutable fields (content, status, submission data).
    async fn update(&self, fix: &Fix) -> Result<(), DatabaseError>;

    /// Delete a fix. Cascade-free: the owning issue is untouched.
    async fn delete(&self, id: i64) -> Result<(), DatabaseError>;
}
