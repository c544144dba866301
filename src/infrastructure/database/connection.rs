use crate::domain::ports::errors::DatabaseError;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use std::str::FromStr;
use std::time::Duration;

/// Database connection pool manager.
///
/// `SQLite` with WAL mode for better concurrency; foreign keys enabled so
/// issue rows cannot outlive their user and fixes cannot outlive their issue.
pub struct DatabaseConnection {
    pool: SqlitePool,
}

impl DatabaseConnection {
    /// Create a new connection pool.
    ///
    /// `database_url` is a `SQLite` URL, e.g. "sqlite:.fixflow/fixflow.db" or
    /// "sqlite::memory:".
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self, DatabaseError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| DatabaseError::ConnectionPoolError(format!("invalid database URL: {e}")))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5))
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await
            .map_err(|e| {
                DatabaseError::ConnectionPoolError(format!("failed to create connection pool: {e}"))
            })?;

        Ok(Self { pool })
    }

    /// Run pending migrations. Safe to call repeatedly.
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| DatabaseError::MigrationError(format!("migration failed: {e}")))?;
        Ok(())
    }

    /// The pool reference handed to repository implementations.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close all connections. Call during shutdown.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
