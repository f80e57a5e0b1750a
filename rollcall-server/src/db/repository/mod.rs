//! Repository Module
//!
//! Per-entity CRUD over the SQLite pool. Handlers never touch SQL
//! directly; all date/time parsing happens before calls land here.

pub mod attendance;
pub mod device;
pub mod employee;
pub mod report;
pub mod shift;
pub mod user;

// Re-exports
pub use attendance::AttendanceRepository;
pub use device::DeviceRepository;
pub use employee::EmployeeRepository;
pub use report::ReportRepository;
pub use shift::ShiftRepository;
pub use user::UserRepository;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err
            && db_err.is_unique_violation()
        {
            return RepoError::Duplicate(db_err.message().to_string());
        }
        RepoError::Database(err.to_string())
    }
}

impl From<argon2::password_hash::Error> for RepoError {
    fn from(err: argon2::password_hash::Error) -> Self {
        RepoError::Database(format!("Password hashing failed: {err}"))
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
