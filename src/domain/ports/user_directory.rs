use crate::domain::models::User;
use crate::domain::ports::errors::DatabaseError;
use async_trait::async_trait;

/// Directory of known local users.
///
/// The webhook fan-out mirrors every incoming issue event into every account
/// this directory lists; keeping it a port makes that collaborator swappable
/// in tests instead of a store query buried in the handler.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// All currently known local users.
    async fn list_all(&self) -> Result<Vec<User>, DatabaseError>;

    async fn get(&self, id: i64) -> Result<Option<User>, DatabaseError>;

    /// Create the user on first authorization, or overwrite the stored
    /// credential on re-authorization.
    async fn upsert(&self, id: i64, login: &str, access_token: &str)
        -> Result<User, DatabaseError>;
}
