//! Shift repository

use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::db::models::{Shift, ShiftCreate, ShiftUpdate, ShiftWithEmployee};

use super::{RepoError, RepoResult};

#[derive(Clone)]
pub struct ShiftRepository {
    pool: SqlitePool,
}

impl ShiftRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_all_with_employee(&self) -> RepoResult<Vec<ShiftWithEmployee>> {
        let rows = sqlx::query_as::<_, ShiftWithEmployee>(
            r#"
            SELECT s.id, s.employee_id, e.name AS employee_name,
                   s.date, s.start_time, s.end_time, s.is_overtime, s.note
            FROM shifts s
            JOIN employees e ON e.id = s.employee_id
            ORDER BY s.date DESC, s.start_time
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<Shift>> {
        let row = sqlx::query_as::<_, Shift>("SELECT * FROM shifts WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// The shift an employee is expected to work on a given date.
    /// Lateness is judged against its start time.
    pub async fn find_for_employee_on(
        &self,
        employee_id: i64,
        date: NaiveDate,
    ) -> RepoResult<Option<Shift>> {
        let row = sqlx::query_as::<_, Shift>(
            "SELECT * FROM shifts WHERE employee_id = ?1 AND date = ?2 LIMIT 1",
        )
        .bind(employee_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn create(&self, data: ShiftCreate) -> RepoResult<Shift> {
        let shift = sqlx::query_as::<_, Shift>(
            r#"
            INSERT INTO shifts (employee_id, date, start_time, end_time, is_overtime, note)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING *
            "#,
        )
        .bind(data.employee_id)
        .bind(data.date)
        .bind(data.start_time)
        .bind(data.end_time)
        .bind(data.is_overtime)
        .bind(&data.note)
        .fetch_one(&self.pool)
        .await?;
        Ok(shift)
    }

    pub async fn update(&self, id: i64, data: ShiftUpdate) -> RepoResult<Shift> {
        let shift = sqlx::query_as::<_, Shift>(
            r#"
            UPDATE shifts SET
                date = COALESCE(?1, date),
                start_time = COALESCE(?2, start_time),
                end_time = COALESCE(?3, end_time),
                is_overtime = COALESCE(?4, is_overtime),
                note = COALESCE(?5, note)
            WHERE id = ?6
            RETURNING *
            "#,
        )
        .bind(data.date)
        .bind(data.start_time)
        .bind(data.end_time)
        .bind(data.is_overtime)
        .bind(&data.note)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Shift {id} not found")))?;
        Ok(shift)
    }

    pub async fn delete(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM shifts WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
