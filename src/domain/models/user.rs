use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Local account mirroring a GitHub user.
///
/// The id is the GitHub account id, so re-authorization overwrites the stored
/// credential instead of minting a second account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub login: String,
    /// Opaque GitHub access credential. Never logged.
    pub access_token: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
