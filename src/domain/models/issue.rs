//! Issue domain model.
//!
//! Issues are mirrored per local user rather than shared globally: the
//! AI-fixable verdict and ownership are user-scoped, so the same GitHub issue
//! may exist once per user. `(github_issue_id, user_id)` is the upsert key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::github::RawIssue;

/// A stored issue record, owned by exactly one local user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Local row id.
    pub id: i64,
    /// GitHub's issue id, unique per (issue, user) pair locally.
    pub github_issue_id: i64,
    pub title: String,
    /// "owner/repo" of the source repository.
    pub repo_full_name: String,
    pub description: Option<String>,
    /// Lifecycle state mirroring GitHub's ("open", "closed", ...).
    pub state: String,
    pub html_url: Option<String>,
    /// Ordered label names as GitHub returned them.
    pub labels: Vec<String>,
    pub is_ai_fixable: bool,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Canonical incoming issue fields, extracted from a webhook event or a bulk
/// API fetch.
///
/// Immutable value object: payloads cross layers by value and are mapped
/// explicitly into persistent rows, never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuePayload {
    pub github_issue_id: i64,
    pub number: i64,
    pub title: String,
    pub repo_full_name: String,
    pub description: Option<String>,
    pub state: String,
    pub html_url: Option<String>,
    pub labels: Vec<String>,
}

impl IssuePayload {
    /// Build a payload from a raw API issue plus the repository it came from.
    pub fn from_raw(raw: RawIssue, repo_full_name: &str) -> Self {
        Self {
            github_issue_id: raw.id,
            number: raw.number,
            title: raw.title,
            repo_full_name: repo_full_name.to_string(),
            description: raw.body,
            state: raw.state,
            html_url: raw.html_url,
            labels: raw.labels.into_iter().map(|l| l.name).collect(),
        }
    }
}

/// Decode a stored labels column into label names.
///
/// Rows written by earlier revisions may hold arbitrary text here; anything
/// that is not a JSON string array decodes as no labels, never an error.
pub fn decode_labels(raw: Option<&str>) -> Vec<String> {
    raw.and_then(|s| serde_json::from_str(s).ok())
        .unwrap_or_default()
}
