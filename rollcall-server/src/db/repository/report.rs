//! Report metadata repository

use chrono::NaiveDateTime;
use sqlx::SqlitePool;

use crate::db::models::{Report, ReportType};

use super::RepoResult;

#[derive(Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Report>> {
        let rows =
            sqlx::query_as::<_, Report>("SELECT * FROM reports ORDER BY created_at DESC, id DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows)
    }

    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<Report>> {
        let row = sqlx::query_as::<_, Report>("SELECT * FROM reports WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn create(
        &self,
        report_type: ReportType,
        file_path: &str,
        created_at: NaiveDateTime,
        created_by: Option<i64>,
    ) -> RepoResult<Report> {
        let report = sqlx::query_as::<_, Report>(
            r#"
            INSERT INTO reports (report_type, file_path, created_at, created_by)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING *
            "#,
        )
        .bind(report_type)
        .bind(file_path)
        .bind(created_at)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(report)
    }

    pub async fn delete(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM reports WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(&self) -> RepoResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reports")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
