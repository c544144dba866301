//! Fix draft lifecycle.
//!
//! Drafts are created manually or generated from a template for issues the
//! classifier flagged as AI-fixable. Submission flips the record to
//! `submitted` and stores a placeholder PR URL; the real pull-request flow
//! lives outside this crate.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::domain::models::{Fix, FixStatus, Issue};
use crate::domain::ports::{DatabaseError, FixRepository, IssueRepository, NewFix};

/// Errors surfaced by fix operations. Ownership is always checked through
/// the issue: a fix is reachable only by the user owning its issue.
#[derive(Debug, Error)]
pub enum FixError {
    #[error("issue {0} not found or not owned by user")]
    IssueNotFound(i64),

    #[error("fix {0} not found")]
    FixNotFound(i64),

    #[error("issue {0} is not flagged as AI-fixable")]
    NotFixable(i64),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Manages fix drafts attached to a user's issues.
pub struct FixService {
    issues: Arc<dyn IssueRepository>,
    fixes: Arc<dyn FixRepository>,
}

impl FixService {
    pub fn new(issues: Arc<dyn IssueRepository>, fixes: Arc<dyn FixRepository>) -> Self {
        Self { issues, fixes }
    }

    /// Store a user-authored fix draft for an owned issue.
    pub async fn create_fix(
        &self,
        issue_id: i64,
        user_id: i64,
        content: String,
        submission_message: Option<String>,
    ) -> Result<Fix, FixError> {
        let issue = self.owned_issue(issue_id, user_id).await?;

        let fix = self
            .fixes
            .insert(&NewFix {
                issue_id: issue.id,
                content,
                status: FixStatus::Pending,
                submission_message,
            })
            .await?;

        info!(fix_id = fix.id, issue_id, user_id, "created fix draft");
        Ok(fix)
    }

    /// Generate a templated fix draft for an AI-fixable issue.
    ///
    /// The content is a static template: a stand-in for a model call, kept so
    /// the draft lifecycle is exercised end to end.
    pub async fn generate_fix(&self, issue_id: i64, user_id: i64) -> Result<Fix, FixError> {
        let issue = self.owned_issue(issue_id, user_id).await?;

        if !issue.is_ai_fixable {
            return Err(FixError::NotFixable(issue_id));
        }

        let fix = self
            .fixes
            .insert(&NewFix {
                issue_id: issue.id,
                content: draft_template(&issue),
                status: FixStatus::Pending,
                submission_message: None,
            })
            .await?;

        info!(fix_id = fix.id, issue_id, user_id, "generated fix draft");
        Ok(fix)
    }

    /// List the fix drafts of an owned issue.
    pub async fn list_fixes(&self, issue_id: i64, user_id: i64) -> Result<Vec<Fix>, FixError> {
        let issue = self.owned_issue(issue_id, user_id).await?;
        Ok(self.fixes.list_for_issue(issue.id).await?)
    }

    /// Mark a fix as submitted, recording the message and a placeholder PR
    /// URL derived from the issue's repository.
    pub async fn submit_fix(
        &self,
        fix_id: i64,
        user_id: i64,
        submission_message: String,
    ) -> Result<Fix, FixError> {
        let mut fix = self
            .fixes
            .get(fix_id)
            .await?
            .ok_or(FixError::FixNotFound(fix_id))?;
        let issue = self.owned_issue(fix.issue_id, user_id).await?;

        fix.status = FixStatus::Submitted;
        fix.is_submitted = true;
        fix.submission_message = Some(submission_message);
        fix.pr_url = Some(format!(
            "https://github.com/{}/pull/999",
            issue.repo_full_name
        ));

        self.fixes.update(&fix).await?;

        info!(fix_id, user_id, "submitted fix");
        self.fixes
            .get(fix_id)
            .await?
            .ok_or(FixError::FixNotFound(fix_id))
    }

    /// Delete a fix. The owning issue is untouched.
    pub async fn delete_fix(&self, fix_id: i64, user_id: i64) -> Result<(), FixError> {
        let fix = self
            .fixes
            .get(fix_id)
            .await?
            .ok_or(FixError::FixNotFound(fix_id))?;
        self.owned_issue(fix.issue_id, user_id).await?;

        self.fixes.delete(fix_id).await?;
        info!(fix_id, user_id, "deleted fix");
        Ok(())
    }

    async fn owned_issue(&self, issue_id: i64, user_id: i64) -> Result<Issue, FixError> {
        self.issues
            .get(issue_id, user_id)
            .await?
            .ok_or(FixError::IssueNotFound(issue_id))
    }
}

fn draft_template(issue: &Issue) -> String {
    format!(
        "# Draft fix for issue #{github_issue_id}\n\
         \n\
         Placeholder for a generated code fix for \"{title}\".\n\
         \n\
         Suggested approach:\n\
         1. Identify the root cause\n\
         2. Implement a fix that addresses the core issue\n\
         3. Add tests to verify the solution\n",
        github_issue_id = issue.github_issue_id,
        title = issue.title,
    )
}
