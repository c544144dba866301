//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use std::sync::Mutex;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use fixflow::domain::models::{GithubUser, Label, RawIssue, RepoDetail, Repository};
use fixflow::domain::ports::{GithubApiError, GithubClient, UserDirectory};
use fixflow::infrastructure::database::UserDirectoryImpl;

/// In-memory database with migrations applied.
///
/// A single connection is mandatory: every pooled connection to
/// `sqlite::memory:` would otherwise get its own empty database.
pub async fn setup_test_db() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("valid url")
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("failed to create test database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("failed to run migrations");
    pool
}

pub async fn teardown_test_db(pool: SqlitePool) {
    pool.close().await;
}

pub async fn insert_user(pool: &SqlitePool, id: i64, login: &str, token: &str) {
    UserDirectoryImpl::new(pool.clone())
        .upsert(id, login, token)
        .await
        .expect("failed to insert user");
}

pub fn raw_issue(id: i64, number: i64, title: &str, body: Option<&str>, labels: &[&str]) -> RawIssue {
    RawIssue {
        id,
        number,
        title: title.to_string(),
        state: "open".to_string(),
        html_url: Some(format!("https://github.com/example/repo/issues/{number}")),
        body: body.map(str::to_string),
        labels: labels
            .iter()
            .map(|name| Label {
                name: (*name).to_string(),
            })
            .collect(),
    }
}

pub fn repo(name: &str, full_name: &str, fork: bool) -> Repository {
    Repository {
        name: name.to_string(),
        full_name: full_name.to_string(),
        fork,
    }
}

/// Scripted GitHub API double.
///
/// Responses are keyed by repository full name; failures are injected per
/// repository or for the top-level listing. Every issue/detail fetch is
/// recorded so tests can assert on call order and dedup.
#[derive(Default)]
pub struct MockGithub {
    pub user: Option<GithubUser>,
    pub repos: Vec<Repository>,
    pub fail_repo_listing: bool,
    pub issues: HashMap<String, Vec<RawIssue>>,
    pub failing_issue_repos: HashSet<String>,
    pub details: HashMap<String, RepoDetail>,
    pub failing_detail_repos: HashSet<String>,
    pub calls: Mutex<Vec<String>>,
}

impl MockGithub {
    pub fn with_repos(repos: Vec<Repository>) -> Self {
        Self {
            repos,
            ..Self::default()
        }
    }

    pub fn add_issues(&mut self, full_name: &str, issues: Vec<RawIssue>) {
        self.issues.insert(full_name.to_string(), issues);
    }

    pub fn add_parent(&mut self, fork_full_name: &str, parent_name: &str, parent_full_name: &str) {
        self.details.insert(
            fork_full_name.to_string(),
            RepoDetail {
                full_name: fork_full_name.to_string(),
                fork: true,
                parent: Some(fixflow::domain::models::ParentRepo {
                    name: parent_name.to_string(),
                    full_name: parent_full_name.to_string(),
                }),
            },
        );
    }

    pub fn recorded_calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("calls lock").push(call);
    }

    fn upstream_error() -> GithubApiError {
        GithubApiError::Status {
            status: 500,
            body: "injected failure".to_string(),
        }
    }
}

#[async_trait]
impl GithubClient for MockGithub {
    async fn get_user(&self, _token: &str) -> Result<GithubUser, GithubApiError> {
        self.user.clone().ok_or_else(Self::upstream_error)
    }

    async fn list_repos(&self, _token: &str) -> Result<Vec<Repository>, GithubApiError> {
        self.record("list_repos".to_string());
        if self.fail_repo_listing {
            return Err(Self::upstream_error());
        }
        Ok(self.repos.clone())
    }

    async fn get_repo(&self, _token: &str, full_name: &str) -> Result<RepoDetail, GithubApiError> {
        self.record(format!("get_repo:{full_name}"));
        if self.failing_detail_repos.contains(full_name) {
            return Err(Self::upstream_error());
        }
        self.details
            .get(full_name)
            .cloned()
            .ok_or_else(Self::upstream_error)
    }

    async fn list_issues(
        &self,
        _token: &str,
        full_name: &str,
    ) -> Result<Vec<RawIssue>, GithubApiError> {
        self.record(format!("list_issues:{full_name}"));
        if self.failing_issue_repos.contains(full_name) {
            return Err(Self::upstream_error());
        }
        Ok(self.issues.get(full_name).cloned().unwrap_or_default())
    }
}
