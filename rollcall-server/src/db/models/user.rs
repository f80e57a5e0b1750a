//! User Model (登录账号)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account role — closed set, replaces the free-text role strings
/// of the legacy console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum Role {
    Admin,
    Manager,
    Employee,
}

impl Role {
    /// 管理控制台允许的角色 (Admin / Manager)
    pub fn is_console(&self) -> bool {
        matches!(self, Role::Admin | Role::Manager)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Admin => "Admin",
            Role::Manager => "Manager",
            Role::Employee => "Employee",
        };
        f.write_str(s)
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Role::Admin),
            "Manager" => Ok(Role::Manager),
            "Employee" => Ok(Role::Employee),
            other => Err(format!("Unknown role: {other}")),
        }
    }
}

/// User model matching the `users` table
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub employee_id: Option<i64>,
}

/// Create user payload
#[derive(Debug, Clone, Deserialize)]
pub struct UserCreate {
    pub username: String,
    pub password: String,
    pub role: Role,
    pub employee_id: Option<i64>,
}

/// Update user payload — password is only replaced when a new one is given
#[derive(Debug, Clone, Deserialize)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub role: Option<Role>,
    pub new_password: Option<String>,
}

impl User {
    /// Verify password using argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let parsed_hash = PasswordHash::new(&self.password_hash)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Admin, Role::Manager, Role::Employee] {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
        assert!("admin".parse::<Role>().is_err());
        assert!("Superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_console_roles() {
        assert!(Role::Admin.is_console());
        assert!(Role::Manager.is_console());
        assert!(!Role::Employee.is_console());
    }

    #[test]
    fn test_password_hash_and_verify() {
        let hash = User::hash_password("s3cret").unwrap();
        let user = User {
            id: 1,
            username: "alice".into(),
            password_hash: hash,
            role: Role::Employee,
            employee_id: None,
        };
        assert!(user.verify_password("s3cret").unwrap());
        assert!(!user.verify_password("wrong").unwrap());
    }
}
