use crate::domain::models::issue::decode_labels;
use crate::domain::models::Issue;
use crate::domain::ports::errors::DatabaseError;
use crate::domain::ports::issue_repository::{IssueFilters, IssueRepository, NewIssue};
use crate::infrastructure::database::utils::parse_datetime;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};

/// SQLite implementation of `IssueRepository` using sqlx.
pub struct IssueRepositoryImpl {
    pool: SqlitePool,
}

impl IssueRepositoryImpl {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_issue(row: &SqliteRow) -> Result<Issue, DatabaseError> {
        Ok(Issue {
            id: row.get("id"),
            github_issue_id: row.get("github_issue_id"),
            title: row.get("title"),
            repo_full_name: row.get("repo_full_name"),
            description: row.get("description"),
            state: row.get("state"),
            html_url: row.get("html_url"),
            // Decode-tolerant: anything that is not a JSON string array reads
            // as no labels.
            labels: decode_labels(row.get::<Option<String>, _>("labels").as_deref()),
            is_ai_fixable: row.get("is_ai_fixable"),
            user_id: row.get("user_id"),
            created_at: parse_datetime(row.get::<String, _>("created_at").as_str())?,
            updated_at: parse_datetime(row.get::<String, _>("updated_at").as_str())?,
        })
    }

    /// Upsert one record on an open connection, so batches can share a
    /// transaction. Only the volatile fields are overwritten on update; the
    /// fixability verdict comes from the incoming record, never the old row.
    async fn upsert_on(
        conn: &mut SqliteConnection,
        record: &NewIssue,
    ) -> Result<(Issue, bool), DatabaseError> {
        let existing: Option<i64> =
            sqlx::query_scalar("SELECT id FROM issues WHERE github_issue_id = ? AND user_id = ?")
                .bind(record.github_issue_id)
                .bind(record.user_id)
                .fetch_optional(&mut *conn)
                .await?;

        let now = Utc::now().to_rfc3339();
        let labels = serde_json::to_string(&record.labels)?;

        let (id, created) = match existing {
            Some(id) => {
                sqlx::query(
                    r#"
                    UPDATE issues SET
                        title = ?,
                        state = ?,
                        description = ?,
                        labels = ?,
                        is_ai_fixable = ?,
                        updated_at = ?
                    WHERE id = ?
                    "#,
                )
                .bind(&record.title)
                .bind(&record.state)
                .bind(&record.description)
                .bind(&labels)
                .bind(record.is_ai_fixable)
                .bind(&now)
                .bind(id)
                .execute(&mut *conn)
                .await?;
                (id, false)
            }
            None => {
                let result = sqlx::query(
                    r#"
                    INSERT INTO issues (
                        github_issue_id, title, repo_full_name, description,
                        state, html_url, labels, is_ai_fixable, user_id,
                        created_at, updated_at
                    )
                    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(record.github_issue_id)
                .bind(&record.title)
                .bind(&record.repo_full_name)
                .bind(&record.description)
                .bind(&record.state)
                .bind(&record.html_url)
                .bind(&labels)
                .bind(record.is_ai_fixable)
                .bind(record.user_id)
                .bind(&now)
                .bind(&now)
                .execute(&mut *conn)
                .await?;
                (result.last_insert_rowid(), true)
            }
        };

        let row = sqlx::query("SELECT * FROM issues WHERE id = ?")
            .bind(id)
            .fetch_one(&mut *conn)
            .await?;

        Ok((Self::row_to_issue(&row)?, created))
    }
}

#[async_trait]
impl IssueRepository for IssueRepositoryImpl {
    async fn upsert(&self, record: &NewIssue) -> Result<(Issue, bool), DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let result = Self::upsert_on(&mut tx, record).await?;
        tx.commit().await?;
        Ok(result)
    }

    async fn upsert_batch(
        &self,
        records: &[NewIssue],
    ) -> Result<Vec<(Issue, bool)>, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let mut results = Vec::with_capacity(records.len());
        for record in records {
            results.push(Self::upsert_on(&mut tx, record).await?);
        }
        tx.commit().await?;
        Ok(results)
    }

    async fn get(&self, id: i64, user_id: i64) -> Result<Option<Issue>, DatabaseError> {
        let row = sqlx::query("SELECT * FROM issues WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(r) => Ok(Some(Self::row_to_issue(&r)?)),
            None => Ok(None),
        }
    }

    async fn get_by_source(
        &self,
        github_issue_id: i64,
        user_id: i64,
    ) -> Result<Option<Issue>, DatabaseError> {
        let row = sqlx::query("SELECT * FROM issues WHERE github_issue_id = ? AND user_id = ?")
            .bind(github_issue_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(r) => Ok(Some(Self::row_to_issue(&r)?)),
            None => Ok(None),
        }
    }

    async fn list(
        &self,
        user_id: i64,
        filters: &IssueFilters,
    ) -> Result<Vec<Issue>, DatabaseError> {
        // Build dynamic query based on filters
        let mut query = String::from("SELECT * FROM issues WHERE user_id = ?");
        let mut bindings: Vec<String> = Vec::new();

        if let Some(search) = &filters.search {
            query.push_str(" AND title LIKE ?");
            bindings.push(format!("%{search}%"));
        }

        if let Some(repo_name) = &filters.repo_name {
            query.push_str(" AND repo_full_name LIKE ?");
            bindings.push(format!("%{repo_name}%"));
        }

        if let Some(label) = &filters.label {
            query.push_str(" AND labels LIKE ?");
            bindings.push(format!("%{label}%"));
        }

        if let Some(fixable) = filters.is_ai_fixable {
            query.push_str(" AND is_ai_fixable = ?");
            bindings.push(i64::from(fixable).to_string());
        }

        query.push_str(" ORDER BY id ASC");

        if let Some(limit) = filters.limit {
            query.push_str(&format!(" LIMIT {limit}"));
        }

        let mut query_builder = sqlx::query(&query).bind(user_id);
        for binding in bindings {
            query_builder = query_builder.bind(binding);
        }

        let rows = query_builder.fetch_all(&self.pool).await?;
        rows.iter().map(Self::row_to_issue).collect()
    }

    async fn set_fixability(
        &self,
        id: i64,
        user_id: i64,
        is_ai_fixable: bool,
    ) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "UPDATE issues SET is_ai_fixable = ?, updated_at = ? WHERE id = ? AND user_id = ?",
        )
        .bind(is_ai_fixable)
        .bind(Utc::now().to_rfc3339())
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::IssueNotFound(id));
        }
        Ok(())
    }
}
