//! Employee repository

use sqlx::SqlitePool;

use crate::db::models::{Employee, EmployeeCreate, EmployeeUpdate};

use super::{RepoError, RepoResult};

/// Per-department headcount row (dashboard widget + report footer)
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct DepartmentCount {
    pub department: Option<String>,
    pub count: i64,
}

#[derive(Clone)]
pub struct EmployeeRepository {
    pool: SqlitePool,
}

impl EmployeeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Employee>> {
        let rows = sqlx::query_as::<_, Employee>("SELECT * FROM employees ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// All employees ordered by department then name — the employee
    /// report contract.
    pub async fn find_all_for_report(&self) -> RepoResult<Vec<Employee>> {
        let rows = sqlx::query_as::<_, Employee>(
            "SELECT * FROM employees ORDER BY department, name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<Employee>> {
        let row = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn create(&self, data: EmployeeCreate) -> RepoResult<Employee> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            INSERT INTO employees (
                name, department, role, phone, email, photo_path, face_embedding
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.department)
        .bind(&data.role)
        .bind(&data.phone)
        .bind(&data.email)
        .bind(&data.photo_path)
        .bind(&data.face_embedding)
        .fetch_one(&self.pool)
        .await?;
        Ok(employee)
    }

    /// Full-form update. Photo path and embedding are only replaced when
    /// a new image was processed (COALESCE keeps the previous values).
    pub async fn update(&self, id: i64, data: EmployeeUpdate) -> RepoResult<Employee> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            UPDATE employees SET
                name = ?1,
                department = ?2,
                role = ?3,
                phone = ?4,
                email = ?5,
                photo_path = COALESCE(?6, photo_path),
                face_embedding = COALESCE(?7, face_embedding)
            WHERE id = ?8
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.department)
        .bind(&data.role)
        .bind(&data.phone)
        .bind(&data.email)
        .bind(&data.photo_path)
        .bind(&data.face_embedding)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Employee {id} not found")))?;
        Ok(employee)
    }

    pub async fn set_locked(&self, id: i64, locked: bool) -> RepoResult<Employee> {
        let employee = sqlx::query_as::<_, Employee>(
            "UPDATE employees SET is_locked = ?1 WHERE id = ?2 RETURNING *",
        )
        .bind(locked)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Employee {id} not found")))?;
        Ok(employee)
    }

    pub async fn delete(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM employees WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(&self) -> RepoResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM employees")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Headcount per department, largest first
    pub async fn department_counts(&self) -> RepoResult<Vec<DepartmentCount>> {
        let rows = sqlx::query_as::<_, DepartmentCount>(
            r#"
            SELECT department, COUNT(*) AS count
            FROM employees
            GROUP BY department
            ORDER BY count DESC, department
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
