use thiserror::Error;

/// Database operation errors
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Query failed: {0}")]
    QueryFailed(#[from] sqlx::Error),

    #[error("Issue not found: {0}")]
    IssueNotFound(i64),

    #[error("Fix not found: {0}")]
    FixNotFound(i64),

    #[error("User not found: {0}")]
    UserNotFound(i64),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(#[from] chrono::ParseError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Connection pool error: {0}")]
    ConnectionPoolError(String),

    #[error("Migration error: {0}")]
    MigrationError(String),
}

/// Errors surfaced by the GitHub client port.
///
/// Non-2xx responses keep the upstream status code and body so callers can
/// report the originating detail. Timeouts are separated from other transport
/// failures because they are retryable by the caller.
#[derive(Debug, Error)]
pub enum GithubApiError {
    #[error("GitHub API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Request to GitHub timed out: {0}")]
    Timeout(String),

    #[error("Transport error talking to GitHub: {0}")]
    Transport(String),

    #[error("Failed to decode GitHub response: {0}")]
    Decode(String),
}
