use crate::domain::models::{Fix, FixStatus};
use crate::domain::ports::errors::DatabaseError;
use crate::domain::ports::fix_repository::{FixRepository, NewFix};
use crate::infrastructure::database::utils::parse_datetime;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

/// SQLite implementation of `FixRepository` using sqlx.
pub struct FixRepositoryImpl {
    pool: SqlitePool,
}

impl FixRepositoryImpl {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_fix(row: &SqliteRow) -> Result<Fix, DatabaseError> {
        let status_str: String = row.get("status");
        Ok(Fix {
            id: row.get("id"),
            issue_id: row.get("issue_id"),
            content: row.get("content"),
            // Unknown status strings degrade to pending rather than failing
            // the whole read.
            status: FixStatus::from_str(&status_str).unwrap_or_default(),
            is_submitted: row.get("is_submitted"),
            submission_message: row.get("submission_message"),
            pr_url: row.get("pr_url"),
            created_at: parse_datetime(row.get::<String, _>("created_at").as_str())?,
            updated_at: parse_datetime(row.get::<String, _>("updated_at").as_str())?,
        })
    }
}

#[async_trait]
impl FixRepository for FixRepositoryImpl {
    async fn insert(&self, fix: &NewFix) -> Result<Fix, DatabaseError> {
        let now = Utc::now().to_rfc3339();
        let status = fix.status.to_string();

        let result = sqlx::query(
            r#"
            INSERT INTO fixes (
                issue_id, content, status, is_submitted, submission_message,
                pr_url, created_at, updated_at
            )
            VALUES (?, ?, ?, 0, ?, NULL, ?, ?)
            "#,
        )
        .bind(fix.issue_id)
        .bind(&fix.content)
        .bind(&status)
        .bind(&fix.submission_message)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        let row = sqlx::query("SELECT * FROM fixes WHERE id = ?")
            .bind(result.last_insert_rowid())
            .fetch_one(&self.pool)
            .await?;
        Self::row_to_fix(&row)
    }

    async fn get(&self, id: i64) -> Result<Option<Fix>, DatabaseError> {
        let row = sqlx::query("SELECT * FROM fixes WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(r) => Ok(Some(Self::row_to_fix(&r)?)),
            None => Ok(None),
        }
    }

    async fn list_for_issue(&self, issue_id: i64) -> Result<Vec<Fix>, DatabaseError> {
        let rows = sqlx::query("SELECT * FROM fixes WHERE issue_id = ? ORDER BY id ASC")
            .bind(issue_id)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(Self::row_to_fix).collect()
    }

    async fn update(&self, fix: &Fix) -> Result<(), DatabaseError> {
        let now = Utc::now().to_rfc3339();
        let status = fix.status.to_string();

        let result = sqlx::query(
            r#"
            UPDATE fixes SET
                content = ?,
                status = ?,
                is_submitted = ?,
                submission_message = ?,
                pr_url = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&fix.content)
        .bind(&status)
        .bind(fix.is_submitted)
        .bind(&fix.submission_message)
        .bind(&fix.pr_url)
        .bind(&now)
        .bind(fix.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::FixNotFound(fix.id));
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM fixes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::FixNotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use std::str::FromStr;

    async fn setup_test_db() -> SqlitePool {
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

    async fn seed_issue(pool: &SqlitePool) -> i64 {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO users (id, login, access_token, created_at, updated_at) VALUES (1, 'u', 't', ?, ?)",
        )
        .bind(&now)
        .bind(&now)
        .execute(pool)
        .await
        .expect("user");

        let result = sqlx::query(
            r#"
            INSERT INTO issues (
                github_issue_id, title, repo_full_name, description, state,
                html_url, labels, is_ai_fixable, user_id, created_at, updated_at
            ) VALUES (100, 'bug', 'acme/widget', NULL, 'open', NULL, '[]', 1, 1, ?, ?)
            "#,
        )
        .bind(&now)
        .bind(&now)
        .execute(pool)
        .await
        .expect("issue");
        result.last_insert_rowid()
    }

    #[tokio::test]
    async fn insert_and_get_fix() {
        let pool = setup_test_db().await;
        let issue_id = seed_issue(&pool).await;
        let repo = FixRepositoryImpl::new(pool.clone());

        let fix = repo
            .insert(&NewFix {
                issue_id,
                content: "patch".to_string(),
                status: FixStatus::Pending,
                submission_message: None,
            })
            .await
            .expect("insert");

        assert_eq!(fix.status, FixStatus::Pending);
        assert!(!fix.is_submitted);
        assert!(fix.pr_url.is_none());

        let fetched = repo.get(fix.id).await.expect("get").expect("exists");
        assert_eq!(fetched, fix);

        pool.close().await;
    }

    #[tokio::test]
    async fn update_records_submission() {
        let pool = setup_test_db().await;
        let issue_id = seed_issue(&pool).await;
        let repo = FixRepositoryImpl::new(pool.clone());

        let mut fix = repo
            .insert(&NewFix {
                issue_id,
                content: "patch".to_string(),
                status: FixStatus::Pending,
                submission_message: None,
            })
            .await
            .expect("insert");

        fix.status = FixStatus::Submitted;
        fix.is_submitted = true;
        fix.submission_message = Some("please merge".to_string());
        fix.pr_url = Some("https://github.com/acme/widget/pull/999".to_string());
        repo.update(&fix).await.expect("update");

        let stored = repo.get(fix.id).await.expect("get").expect("exists");
        assert_eq!(stored.status, FixStatus::Submitted);
        assert!(stored.is_submitted);
        assert_eq!(stored.submission_message.as_deref(), Some("please merge"));

        pool.close().await;
    }

    #[tokio::test]
    async fn delete_removes_fix_but_not_issue() {
        let pool = setup_test_db().await;
        let issue_id = seed_issue(&pool).await;
        let repo = FixRepositoryImpl::new(pool.clone());

        let fix = repo
            .insert(&NewFix {
                issue_id,
                content: "patch".to_string(),
                status: FixStatus::Pending,
                submission_message: None,
            })
            .await
            .expect("insert");

        repo.delete(fix.id).await.expect("delete");
        assert!(repo.get(fix.id).await.expect("get").is_none());

        let issues: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM issues")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(issues, 1);

        pool.close().await;
    }

    #[tokio::test]
    async fn update_unknown_fix_is_not_found() {
        let pool = setup_test_db().await;
        seed_issue(&pool).await;
        let repo = FixRepositoryImpl::new(pool.clone());

        let err = repo.delete(12345).await.expect_err("should fail");
        assert!(matches!(err, DatabaseError::FixNotFound(12345)));

        pool.close().await;
    }
}
