//! GitHub HTTP client.
//!
//! Wraps the GitHub REST API v3, providing the typed reads used by the
//! bulk synchronizer. The caller's stored access token is passed per
//! request so one client instance serves every local user.

use crate::domain::models::{GithubUser, RawIssue, RepoDetail, Repository};
use crate::domain::ports::errors::GithubApiError;
use crate::domain::ports::github_client::GithubClient;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Page size for paginated list endpoints.
const PER_PAGE: usize = 100;

/// HTTP client for the GitHub REST API v3.
#[derive(Debug, Clone)]
pub struct GithubClientImpl {
    http: Client,
    base_url: String,
}

impl GithubClientImpl {
    /// Create a client against the given API base URL.
    ///
    /// `base_url` is "https://api.github.com" in production; tests point
    /// it at a local mock server.
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self, GithubApiError> {
        let http = Client::builder()
            .timeout(request_timeout)
            .user_agent("fixflow")
            .build()
            .map_err(|e| GithubApiError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn map_send_error(err: reqwest::Error) -> GithubApiError {
        if err.is_timeout() {
            GithubApiError::Timeout(err.to_string())
        } else {
            GithubApiError::Transport(err.to_string())
        }
    }

    /// Issue an authorized GET and surface non-2xx responses with their body.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        token: &str,
        path_and_query: &str,
    ) -> Result<T, GithubApiError> {
        let url = format!("{}{}", self.base_url, path_and_query);
        debug!(%url, "GitHub API request");

        let resp = self
            .http
            .get(&url)
            .header("Authorization", format!("Bearer {token}"))
            .header("Accept", "application/vnd.github.v3+json")
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GithubApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        resp.json::<T>()
            .await
            .map_err(|e| GithubApiError::Decode(e.to_string()))
    }

    /// Fetch every page of a list endpoint.
    ///
    /// `path` must already carry its own query parameters; `page` and
    /// `per_page` are appended here.
    async fn get_all_pages<T: serde::de::DeserializeOwned>(
        &self,
        token: &str,
        path: &str,
    ) -> Result<Vec<T>, GithubApiError> {
        let separator = if path.contains('?') { '&' } else { '?' };
        let mut items = Vec::new();
        let mut page = 1usize;

        loop {
            let query = format!("{path}{separator}per_page={PER_PAGE}&page={page}");
            let batch: Vec<T> = self.get_json(token, &query).await?;
            let batch_len = batch.len();
            items.extend(batch);

            if batch_len < PER_PAGE {
                break;
            }
            page += 1;
        }

        Ok(items)
    }
}

#[async_trait]
impl GithubClient for GithubClientImpl {
    async fn get_user(&self, token: &str) -> Result<GithubUser, GithubApiError> {
        self.get_json(token, "/user").await
    }

    async fn list_repos(&self, token: &str) -> Result<Vec<Repository>, GithubApiError> {
        self.get_all_pages(token, "/user/repos?type=all&sort=updated")
            .await
    }

    async fn get_repo(&self, token: &str, full_name: &str) -> Result<RepoDetail, GithubApiError> {
        self.get_json(token, &format!("/repos/{full_name}")).await
    }

    async fn list_issues(
        &self,
        token: &str,
        full_name: &str,
    ) -> Result<Vec<RawIssue>, GithubApiError> {
        self.get_all_pages(token, &format!("/repos/{full_name}/issues"))
            .await
    }
}
