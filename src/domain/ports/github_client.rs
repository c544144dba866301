use crate::domain::models::{GithubUser, RawIssue, RepoDetail, Repository};
use crate::domain::ports::errors::GithubApiError;
use async_trait::async_trait;

/// Outbound GitHub REST API port.
///
/// Pure request/response, no state. The access token is passed per call
/// because every local user carries their own credential.
#[async_trait]
pub trait GithubClient: Send + Sync {
    /// `GET /user` — the account behind a token.
    async fn get_user(&self, token: &str) -> Result<GithubUser, GithubApiError>;

    /// `GET /user/repos?type=all&sort=updated` — every repository visible to
    /// the token, most recently updated first.
    async fn list_repos(&self, token: &str) -> Result<Vec<Repository>, GithubApiError>;

    /// `GET /repos/{full_name}` — repo detail, including the fork parent when
    /// there is one.
    async fn get_repo(&self, token: &str, full_name: &str) -> Result<RepoDetail, GithubApiError>;

    /// `GET /repos/{full_name}/issues` — open issues of one repository, in
    /// GitHub's order.
    async fn list_issues(&self, token: &str, full_name: &str)
        -> Result<Vec<RawIssue>, GithubApiError>;
}
