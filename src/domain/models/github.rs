//! Wire types for the GitHub REST API and webhook payloads.
//!
//! These mirror only the fields the ingestion pipeline consumes; everything
//! else GitHub sends is ignored during deserialization.

use serde::{Deserialize, Deserializer, Serialize};

/// `GET /user` response subset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubUser {
    pub id: i64,
    pub login: String,
}

/// One entry of `GET /user/repos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub fork: bool,
}

/// `GET /repos/{full_name}` response subset, used to resolve fork parents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoDetail {
    pub full_name: String,
    #[serde(default)]
    pub fork: bool,
    pub parent: Option<ParentRepo>,
}

/// Upstream parent of a fork.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentRepo {
    pub name: String,
    pub full_name: String,
}

/// A label attached to an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
}

/// One entry of `GET /repos/{full_name}/issues`, also embedded in webhook
/// `issues` events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawIssue {
    pub id: i64,
    pub number: i64,
    pub title: String,
    pub state: String,
    pub html_url: Option<String>,
    pub body: Option<String>,
    #[serde(default, deserialize_with = "lenient_labels")]
    pub labels: Vec<Label>,
}

/// Webhook `issues` event payload subset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuesEvent {
    pub action: String,
    pub issue: RawIssue,
    pub repository: RepoRef,
}

/// Repository reference embedded in webhook payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRef {
    pub full_name: String,
}

/// Accept whatever GitHub (or a buggy sender) puts in `labels`.
///
/// Entries that are not objects with a string `name` are dropped; a value
/// that is not an array decodes as no labels. Classification degrades to the
/// body heuristics instead of failing the whole event.
fn lenient_labels<'de, D>(deserializer: D) -> Result<Vec<Label>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let entries = match value {
        serde_json::Value::Array(entries) => entries,
        _ => return Ok(Vec::new()),
    };

    Ok(entries
        .into_iter()
        .filter_map(|entry| match entry {
            serde_json::Value::String(name) => Some(Label { name }),
            serde_json::Value::Object(map) => map.get("name").and_then(|n| n.as_str()).map(|n| {
                Label {
                    name: n.to_string(),
                }
            }),
            _ => None,
        })
        .collect())
}
