//! Shared wiring for CLI commands.
//!
//! Loads configuration, opens the database, and hands out the service
//! objects commands operate on.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::domain::models::config::Config;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::database::{
    DatabaseConnection, FixRepositoryImpl, IssueRepositoryImpl, UserDirectoryImpl,
};
use crate::infrastructure::github::GithubClientImpl;
use crate::services::{BulkSync, FixService, IssueSync};

pub struct AppContext {
    pub config: Config,
    db: DatabaseConnection,
    pub users: Arc<UserDirectoryImpl>,
    pub issues: Arc<IssueRepositoryImpl>,
    pub fixes: Arc<FixRepositoryImpl>,
}

impl AppContext {
    /// Load config and open the database, running any pending migrations.
    pub async fn open() -> Result<Self> {
        let config = ConfigLoader::load()?;

        if let Some(parent) = Path::new(&config.database.path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }

        let db_url = format!("sqlite:{}", config.database.path);
        let db = DatabaseConnection::new(&db_url, config.database.max_connections)
            .await
            .context("Failed to open database")?;
        db.migrate().await.context("Failed to run migrations")?;

        let pool = db.pool().clone();
        Ok(Self {
            config,
            db,
            users: Arc::new(UserDirectoryImpl::new(pool.clone())),
            issues: Arc::new(IssueRepositoryImpl::new(pool.clone())),
            fixes: Arc::new(FixRepositoryImpl::new(pool)),
        })
    }

    pub fn github_client(&self) -> Result<GithubClientImpl> {
        GithubClientImpl::new(
            &self.config.github.api_base_url,
            Duration::from_secs(self.config.github.request_timeout_secs),
        )
        .context("Failed to build GitHub client")
    }

    pub fn issue_sync(&self) -> IssueSync {
        IssueSync::new(self.issues.clone())
    }

    pub fn bulk_sync(&self) -> Result<BulkSync> {
        Ok(BulkSync::new(
            Arc::new(self.github_client()?),
            self.users.clone(),
            self.issue_sync(),
        ))
    }

    pub fn fix_service(&self) -> FixService {
        FixService::new(self.issues.clone(), self.fixes.clone())
    }

    pub async fn close(&self) {
        self.db.close().await;
    }
}
