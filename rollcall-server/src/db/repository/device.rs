//! Device repository

use chrono::NaiveDateTime;
use sqlx::SqlitePool;

use crate::db::models::{Device, DeviceCreate, DeviceUpdate};

use super::{RepoError, RepoResult};

#[derive(Clone)]
pub struct DeviceRepository {
    pool: SqlitePool,
}

impl DeviceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Device>> {
        let rows = sqlx::query_as::<_, Device>("SELECT * FROM devices ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<Device>> {
        let row = sqlx::query_as::<_, Device>("SELECT * FROM devices WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// `api_key` is generated by the caller (fresh UUID per creation)
    pub async fn create(
        &self,
        data: DeviceCreate,
        api_key: &str,
        last_seen: NaiveDateTime,
    ) -> RepoResult<Device> {
        let device = sqlx::query_as::<_, Device>(
            r#"
            INSERT INTO devices (name, location, api_key, last_seen)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.location)
        .bind(api_key)
        .bind(last_seen)
        .fetch_one(&self.pool)
        .await?;
        Ok(device)
    }

    pub async fn update(&self, id: i64, data: DeviceUpdate) -> RepoResult<Device> {
        let device = sqlx::query_as::<_, Device>(
            r#"
            UPDATE devices SET
                name = COALESCE(?1, name),
                location = COALESCE(?2, location)
            WHERE id = ?3
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.location)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Device {id} not found")))?;
        Ok(device)
    }

    /// Stamp `last_seen` when a check-in arrives from this device
    pub async fn touch_last_seen(&self, id: i64, at: NaiveDateTime) -> RepoResult<()> {
        sqlx::query("UPDATE devices SET last_seen = ?1 WHERE id = ?2")
            .bind(at)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM devices WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(&self) -> RepoResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM devices")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
