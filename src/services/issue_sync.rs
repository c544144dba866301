//! Issue synchronizer.
//!
//! Normalizes one canonical issue payload (webhook or bulk fetch) into a
//! per-user stored record, recomputing the AI-fixability verdict from the
//! incoming payload every time.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::domain::models::{Issue, IssuePayload};
use crate::domain::ports::{DatabaseError, IssueFilters, IssueRepository, NewIssue};
use crate::services::classifier::classify;

/// Counts from a stored-issue reclassification pass.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RefreshSummary {
    /// Stored issues examined.
    pub checked: usize,
    /// Verdicts that changed and were written back.
    pub updated: usize,
}

/// Upserts issue payloads into the per-user store.
#[derive(Clone)]
pub struct IssueSync {
    issues: Arc<dyn IssueRepository>,
}

impl IssueSync {
    pub fn new(issues: Arc<dyn IssueRepository>) -> Self {
        Self { issues }
    }

    /// Insert or overwrite the record for `(payload.github_issue_id, user_id)`.
    ///
    /// Returns the stored issue and whether it was newly created. The verdict
    /// is always recomputed from this payload, never reused from the old row.
    pub async fn upsert(
        &self,
        user_id: i64,
        payload: &IssuePayload,
    ) -> Result<(Issue, bool), DatabaseError> {
        let record = Self::to_record(user_id, payload);
        let (issue, created) = self.issues.upsert(&record).await?;

        debug!(
            github_issue_id = payload.github_issue_id,
            user_id,
            created,
            is_ai_fixable = issue.is_ai_fixable,
            "synchronized issue"
        );

        Ok((issue, created))
    }

    /// Mirror one payload into every given user account, committing once for
    /// the whole batch. Classification happens once; the per-user records
    /// differ only in ownership.
    pub async fn fan_out(
        &self,
        user_ids: &[i64],
        payload: &IssuePayload,
    ) -> Result<Vec<(Issue, bool)>, DatabaseError> {
        let records: Vec<NewIssue> = user_ids
            .iter()
            .map(|&user_id| Self::to_record(user_id, payload))
            .collect();

        self.issues.upsert_batch(&records).await
    }

    /// Re-run the fixability heuristic over every stored issue of one user
    /// and write back the verdicts that changed. Works entirely from the
    /// label and description data already on disk, so it picks up heuristic
    /// changes without refetching from GitHub. A user with no stored issues
    /// gets an empty pass.
    pub async fn refresh_classifications(
        &self,
        user_id: i64,
    ) -> Result<RefreshSummary, DatabaseError> {
        let issues = self
            .issues
            .list(user_id, &IssueFilters::default())
            .await?;
        let checked = issues.len();
        let mut updated = 0;

        for issue in issues {
            let verdict = classify(&issue.labels, issue.description.as_deref());
            if verdict != issue.is_ai_fixable {
                self.issues
                    .set_fixability(issue.id, user_id, verdict)
                    .await?;
                updated += 1;
            }
        }

        debug!(user_id, checked, updated, "refreshed fixability verdicts");
        Ok(RefreshSummary { checked, updated })
    }

    fn to_record(user_id: i64, payload: &IssuePayload) -> NewIssue {
        NewIssue {
            github_issue_id: payload.github_issue_id,
            title: payload.title.clone(),
            repo_full_name: payload.repo_full_name.clone(),
            description: payload.description.clone(),
            state: payload.state.clone(),
            html_url: payload.html_url.clone(),
            labels: payload.labels.clone(),
            is_ai_fixable: classify(&payload.labels, payload.description.as_deref()),
            user_id,
        }
    }
}
