//! Database Module
//!
//! Handles the SQLite connection pool, migrations and first-run seeding

pub mod models;
pub mod repository;

use crate::db::models::Role;
use crate::db::repository::UserRepository;
use crate::utils::AppError;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::str::FromStr;

/// Database service — owns a SQLite connection pool
#[derive(Clone)]
pub struct DbService {
    pub pool: SqlitePool,
}

impl DbService {
    /// Create a new database service with WAL mode
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        // Build connection options: WAL, foreign keys, normal sync
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))
            .map_err(|e| AppError::database(format!("Invalid database path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .pragma("foreign_keys", "ON")
            .optimize_on_close(true, None);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        // busy_timeout: 写冲突时等待 5s 而非立即失败
        sqlx::query("PRAGMA busy_timeout = 5000;")
            .execute(&pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to set busy_timeout: {e}")))?;

        tracing::info!("Database connection established (SQLite WAL, busy_timeout=5000ms)");

        // Run migrations (ignore previously applied but now removed migrations)
        sqlx::migrate!("./migrations")
            .set_ignore_missing(true)
            .run(&pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply migrations: {e}")))?;
        tracing::info!("Database migrations applied");

        let service = Self { pool };
        service.seed_admin_if_empty().await?;
        Ok(service)
    }

    /// First-run seed: an Admin account so the console is reachable.
    /// Password comes from ADMIN_PASSWORD (dev fallback otherwise).
    async fn seed_admin_if_empty(&self) -> Result<(), AppError> {
        let users = UserRepository::new(self.pool.clone());
        let count = users
            .count()
            .await
            .map_err(|e| AppError::database(e.to_string()))?;
        if count > 0 {
            return Ok(());
        }

        let password =
            std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());
        users
            .create_if_absent("admin", &password, Role::Admin, None)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;
        tracing::info!("Seeded default admin account (username: admin)");
        Ok(())
    }
}
