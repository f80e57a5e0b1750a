//! User account repository

use sqlx::SqlitePool;

use crate::db::models::{Role, User, UserCreate, UserUpdate};

use super::{RepoError, RepoResult};

#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<User>> {
        let rows = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<User>> {
        let row = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let row = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?1 LIMIT 1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn create(&self, data: UserCreate) -> RepoResult<User> {
        if self.find_by_username(&data.username).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Username {} already exists",
                data.username
            )));
        }

        let hash = User::hash_password(&data.password)?;
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, role, employee_id)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING *
            "#,
        )
        .bind(&data.username)
        .bind(&hash)
        .bind(data.role)
        .bind(data.employee_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    /// Partial update; the password is only rehashed when a new one is given.
    pub async fn update(&self, id: i64, data: UserUpdate) -> RepoResult<User> {
        let hash = match &data.new_password {
            Some(password) => Some(User::hash_password(password)?),
            None => None,
        };

        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                username = COALESCE(?1, username),
                role = COALESCE(?2, role),
                password_hash = COALESCE(?3, password_hash)
            WHERE id = ?4
            RETURNING *
            "#,
        )
        .bind(&data.username)
        .bind(data.role)
        .bind(&hash)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("User {id} not found")))?;
        Ok(user)
    }

    pub async fn update_password(&self, id: i64, new_password: &str) -> RepoResult<()> {
        let hash = User::hash_password(new_password)?;
        let result = sqlx::query("UPDATE users SET password_hash = ?1 WHERE id = ?2")
            .bind(&hash)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound(format!("User {id} not found")));
        }
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove the companion account when an employee is deleted
    pub async fn delete_by_employee(&self, employee_id: i64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE employee_id = ?1")
            .bind(employee_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(&self) -> RepoResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Seed helper: create an account only when the username is free
    pub async fn create_if_absent(
        &self,
        username: &str,
        password: &str,
        role: Role,
        employee_id: Option<i64>,
    ) -> RepoResult<Option<User>> {
        if self.find_by_username(username).await?.is_some() {
            return Ok(None);
        }
        let user = self
            .create(UserCreate {
                username: username.to_string(),
                password: password.to_string(),
                role,
                employee_id,
            })
            .await?;
        Ok(Some(user))
    }
}
