use crate::domain::models::User;
use crate::domain::ports::errors::DatabaseError;
use crate::domain::ports::user_directory::UserDirectory;
use crate::infrastructure::database::utils::parse_datetime;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::info;

/// SQLite implementation of `UserDirectory` using sqlx.
pub struct UserDirectoryImpl {
    pool: SqlitePool,
}

impl UserDirectoryImpl {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &SqliteRow) -> Result<User, DatabaseError> {
        Ok(User {
            id: row.get("id"),
            login: row.get("login"),
            access_token: row.get("access_token"),
            created_at: parse_datetime(row.get::<String, _>("created_at").as_str())?,
            updated_at: parse_datetime(row.get::<String, _>("updated_at").as_str())?,
        })
    }
}

#[async_trait]
impl UserDirectory for UserDirectoryImpl {
    async fn list_all(&self) -> Result<Vec<User>, DatabaseError> {
        let rows = sqlx::query("SELECT * FROM users ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(Self::row_to_user).collect()
    }

    async fn get(&self, id: i64) -> Result<Option<User>, DatabaseError> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(r) => Ok(Some(Self::row_to_user(&r)?)),
            None => Ok(None),
        }
    }

    async fn upsert(
        &self,
        id: i64,
        login: &str,
        access_token: &str,
    ) -> Result<User, DatabaseError> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO users (id, login, access_token, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                login = excluded.login,
                access_token = excluded.access_token,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(id)
        .bind(login)
        .bind(access_token)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        info!(user_id = id, login, "stored user credential");

        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Self::row_to_user(&row)
    }
}
