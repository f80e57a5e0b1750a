//! Attendance record repository
//!
//! All aggregation math lives in [`crate::attendance`]; this module only
//! fetches the row sets the aggregator and the handlers need.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sqlx::SqlitePool;

use crate::db::models::{AttendanceCreate, AttendanceRecord, AttendanceWithEmployee};

use super::RepoResult;

/// Per-day record count (mobile stats summary)
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct DayCount {
    pub day: NaiveDate,
    pub count: i64,
}

#[derive(Clone)]
pub struct AttendanceRepository {
    pool: SqlitePool,
}

impl AttendanceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_all_with_employee(&self) -> RepoResult<Vec<AttendanceWithEmployee>> {
        let rows = sqlx::query_as::<_, AttendanceWithEmployee>(
            r#"
            SELECT r.id, r.employee_id, e.name AS employee_name,
                   r.timestamp_in, r.status, r.photo_path, r.device_id
            FROM attendance_records r
            JOIN employees e ON e.id = r.employee_id
            ORDER BY r.timestamp_in DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id_with_employee(
        &self,
        id: i64,
    ) -> RepoResult<Option<AttendanceWithEmployee>> {
        let row = sqlx::query_as::<_, AttendanceWithEmployee>(
            r#"
            SELECT r.id, r.employee_id, e.name AS employee_name,
                   r.timestamp_in, r.status, r.photo_path, r.device_id
            FROM attendance_records r
            JOIN employees e ON e.id = r.employee_id
            WHERE r.id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Records inside an optional range (`>= start`, `< end`), joined
    /// with the employee name and sorted ascending — the attendance
    /// report contract. A NULL check-in timestamp excludes the record.
    pub async fn find_range_with_employee(
        &self,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> RepoResult<Vec<AttendanceWithEmployee>> {
        let rows = sqlx::query_as::<_, AttendanceWithEmployee>(
            r#"
            SELECT r.id, r.employee_id, e.name AS employee_name,
                   r.timestamp_in, r.status, r.photo_path, r.device_id
            FROM attendance_records r
            JOIN employees e ON e.id = r.employee_id
            WHERE r.timestamp_in IS NOT NULL
              AND (?1 IS NULL OR r.timestamp_in >= ?1)
              AND (?2 IS NULL OR r.timestamp_in < ?2)
            ORDER BY r.timestamp_in
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_employee(&self, employee_id: i64) -> RepoResult<Vec<AttendanceRecord>> {
        let rows = sqlx::query_as::<_, AttendanceRecord>(
            r#"
            SELECT * FROM attendance_records
            WHERE employee_id = ?1
            ORDER BY timestamp_in DESC
            "#,
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// The employee's check-in on a calendar day, if any (one per day rule)
    pub async fn find_for_employee_on(
        &self,
        employee_id: i64,
        date: NaiveDate,
    ) -> RepoResult<Option<AttendanceRecord>> {
        let row = sqlx::query_as::<_, AttendanceRecord>(
            r#"
            SELECT * FROM attendance_records
            WHERE employee_id = ?1 AND date(timestamp_in) = ?2
            LIMIT 1
            "#,
        )
        .bind(employee_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// All records whose check-in falls on the given calendar day
    pub async fn find_on_date(&self, date: NaiveDate) -> RepoResult<Vec<AttendanceRecord>> {
        let rows = sqlx::query_as::<_, AttendanceRecord>(
            "SELECT * FROM attendance_records WHERE date(timestamp_in) = ?1",
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Records between two datetimes (half-open, `< end`), check-in required
    pub async fn find_between(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> RepoResult<Vec<AttendanceRecord>> {
        let rows = sqlx::query_as::<_, AttendanceRecord>(
            r#"
            SELECT * FROM attendance_records
            WHERE timestamp_in >= ?1 AND timestamp_in < ?2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Latest check-ins after the cutoff time-of-day (dashboard late list)
    pub async fn find_latest_after(
        &self,
        cutoff: NaiveTime,
        limit: i64,
    ) -> RepoResult<Vec<AttendanceWithEmployee>> {
        let rows = sqlx::query_as::<_, AttendanceWithEmployee>(
            r#"
            SELECT r.id, r.employee_id, e.name AS employee_name,
                   r.timestamp_in, r.status, r.photo_path, r.device_id
            FROM attendance_records r
            JOIN employees e ON e.id = r.employee_id
            WHERE r.timestamp_in IS NOT NULL AND time(r.timestamp_in) > time(?1)
            ORDER BY r.timestamp_in DESC
            LIMIT ?2
            "#,
        )
        .bind(cutoff)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Per-day counts for an optional inclusive date range (mobile summary)
    pub async fn counts_by_day(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> RepoResult<Vec<DayCount>> {
        let rows = sqlx::query_as::<_, DayCount>(
            r#"
            SELECT date(timestamp_in) AS day, COUNT(*) AS count
            FROM attendance_records
            WHERE timestamp_in IS NOT NULL
              AND (?1 IS NULL OR date(timestamp_in) >= ?1)
              AND (?2 IS NULL OR date(timestamp_in) <= ?2)
            GROUP BY day
            ORDER BY day
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn create(&self, data: AttendanceCreate) -> RepoResult<AttendanceRecord> {
        let record = sqlx::query_as::<_, AttendanceRecord>(
            r#"
            INSERT INTO attendance_records (
                employee_id, timestamp_in, status, photo_path, device_id
            )
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING *
            "#,
        )
        .bind(data.employee_id)
        .bind(data.timestamp_in)
        .bind(&data.status)
        .bind(&data.photo_path)
        .bind(data.device_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(record)
    }

    pub async fn delete(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM attendance_records WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(&self) -> RepoResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM attendance_records")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn count_on_date(&self, date: NaiveDate) -> RepoResult<i64> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM attendance_records WHERE date(timestamp_in) = ?1",
        )
        .bind(date)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
