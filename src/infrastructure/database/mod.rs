pub mod connection;
pub mod fix_repo;
pub mod issue_repo;
pub mod user_repo;
pub mod utils;

pub use connection::DatabaseConnection;
pub use fix_repo::FixRepositoryImpl;
pub use issue_repo::IssueRepositoryImpl;
pub use user_repo::UserDirectoryImpl;
