//! Bulk aggregator.
//!
//! Walks every repository visible to a user's credential, funnels each
//! discovered issue through the synchronizer, and follows fork parents once.
//! Failures local to one repository are logged and skipped; only a failure of
//! the top-level repository listing aborts the whole call.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::models::{Issue, IssuePayload, Repository};
use crate::domain::ports::{DatabaseError, GithubApiError, GithubClient, UserDirectory};
use crate::services::issue_sync::IssueSync;

/// Errors that abort a bulk sync call.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("user {0} is not registered")]
    UnknownUser(i64),

    #[error("failed to list repositories: {0}")]
    RepoListing(#[source] GithubApiError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// One synchronized issue plus the repository context it was discovered in.
#[derive(Debug, Clone, Serialize)]
pub struct SyncedIssue {
    pub issue: Issue,
    pub created: bool,
    pub repo_name: String,
    pub repo_full_name: String,
    pub is_fork: bool,
    /// Set when the issue came from the upstream parent of one of the user's
    /// forks rather than from a repository they can see directly.
    pub is_parent_of_fork: bool,
}

/// Orchestrates a full issue sync for one user.
pub struct BulkSync {
    github: Arc<dyn GithubClient>,
    users: Arc<dyn UserDirectory>,
    sync: IssueSync,
}

impl BulkSync {
    pub fn new(
        github: Arc<dyn GithubClient>,
        users: Arc<dyn UserDirectory>,
        sync: IssueSync,
    ) -> Self {
        Self {
            github,
            users,
            sync,
        }
    }

    /// Fetch and synchronize every issue reachable from the user's repos.
    ///
    /// Output order follows the repository listing (most recently updated
    /// first), then GitHub's issue order within each repository; a fork's
    /// parent issues are appended immediately after the fork's own. Each
    /// repository full name is processed at most once, compared
    /// case-insensitively, even when reachable both directly and as a fork
    /// parent.
    pub async fn sync_all_issues_for_user(
        &self,
        user_id: i64,
        include_fork_sources: bool,
    ) -> Result<Vec<SyncedIssue>, SyncError> {
        let user = self
            .users
            .get(user_id)
            .await?
            .ok_or(SyncError::UnknownUser(user_id))?;
        let token = user.access_token;

        let repos = self
            .github
            .list_repos(&token)
            .await
            .map_err(SyncError::RepoListing)?;

        info!(user_id, repo_count = repos.len(), "starting bulk issue sync");

        let mut processed: HashSet<String> = HashSet::new();
        let mut out: Vec<SyncedIssue> = Vec::new();

        for repo in &repos {
            processed.insert(repo.full_name.to_lowercase());

            match self.github.list_issues(&token, &repo.full_name).await {
                Ok(issues) => {
                    self.route_issues(user_id, repo, false, issues, &mut out)
                        .await?;
                }
                Err(err) => {
                    warn!(
                        repo = %repo.full_name,
                        error = %err,
                        "skipping repository: issue fetch failed"
                    );
                    continue;
                }
            }

            if repo.fork && include_fork_sources {
                self.sync_fork_parent(user_id, &token, repo, &mut processed, &mut out)
                    .await?;
            }
        }

        info!(
            user_id,
            synced = out.len(),
            repos_processed = processed.len(),
            "bulk issue sync finished"
        );

        Ok(out)
    }

    /// Follow a fork to its upstream parent and sync the parent's issues,
    /// unless the parent was already processed under another name casing.
    async fn sync_fork_parent(
        &self,
        user_id: i64,
        token: &str,
        repo: &Repository,
        processed: &mut HashSet<String>,
        out: &mut Vec<SyncedIssue>,
    ) -> Result<(), SyncError> {
        let detail = match self.github.get_repo(token, &repo.full_name).await {
            Ok(detail) => detail,
            Err(err) => {
                warn!(
                    repo = %repo.full_name,
                    error = %err,
                    "skipping fork parent: repo detail fetch failed"
                );
                return Ok(());
            }
        };

        let Some(parent) = detail.parent else {
            return Ok(());
        };

        if !processed.insert(parent.full_name.to_lowercase()) {
            return Ok(());
        }

        match self.github.list_issues(token, &parent.full_name).await {
            Ok(issues) => {
                let parent_repo = Repository {
                    name: parent.name,
                    full_name: parent.full_name,
                    fork: false,
                };
                self.route_issues(user_id, &parent_repo, true, issues, out)
                    .await?;
            }
            Err(err) => {
                warn!(
                    parent = %parent.full_name,
                    fork = %repo.full_name,
                    error = %err,
                    "skipping fork parent: issue fetch failed"
                );
            }
        }

        Ok(())
    }

    async fn route_issues(
        &self,
        user_id: i64,
        repo: &Repository,
        is_parent_of_fork: bool,
        issues: Vec<crate::domain::models::RawIssue>,
        out: &mut Vec<SyncedIssue>,
    ) -> Result<(), SyncError> {
        for raw in issues {
            let payload = IssuePayload::from_raw(raw, &repo.full_name);
            let (issue, created) = self.sync.upsert(user_id, &payload).await?;
            out.push(SyncedIssue {
                issue,
                created,
                repo_name: repo.name.clone(),
                repo_full_name: repo.full_name.clone(),
                is_fork: repo.fork,
                is_parent_of_fork,
            });
        }
        Ok(())
    }
}
