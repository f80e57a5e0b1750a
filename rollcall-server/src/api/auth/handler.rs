//! Authentication Handlers
//!
//! Handles login, logout and password changes

use std::time::Duration;

use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::Role;
use crate::db::repository::{EmployeeRepository, UserRepository};
use crate::utils::AppError;

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    pub role: Role,
    pub employee_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Login handler
///
/// Authenticates credentials and returns a JWT token. Both the admin
/// console and the mobile client use this endpoint; console-only role
/// enforcement happens at the admin route gate.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let users = UserRepository::new(state.db.clone());
    let user = users.find_by_username(&req.username).await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Unified error message to prevent username enumeration
    let user = match user {
        Some(u) => {
            let password_valid = u
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;
            if !password_valid {
                tracing::warn!(username = %req.username, "Login failed - invalid credentials");
                return Err(AppError::invalid_credentials());
            }
            u
        }
        None => {
            tracing::warn!(username = %req.username, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    // A locked employee cannot sign in
    if let Some(employee_id) = user.employee_id {
        let employee = EmployeeRepository::new(state.db.clone())
            .find_by_id(employee_id)
            .await?;
        if employee.is_some_and(|e| e.is_locked) {
            return Err(AppError::forbidden("Account has been disabled".to_string()));
        }
    }

    let token = state
        .jwt_service()
        .generate_token(user.id, &user.username, user.role, user.employee_id)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    tracing::info!(
        user_id = user.id,
        username = %user.username,
        role = %user.role,
        "User logged in successfully"
    );

    Ok(Json(LoginResponse {
        token,
        user: UserInfo {
            id: user.id,
            username: user.username,
            role: user.role,
            employee_id: user.employee_id,
        },
    }))
}

/// Get current user info
pub async fn me(Extension(user): Extension<CurrentUser>) -> Json<UserInfo> {
    Json(UserInfo {
        id: user.id,
        username: user.username,
        role: user.role,
        employee_id: user.employee_id,
    })
}

/// Logout handler — JWT is stateless, this only records the event
pub async fn logout(Extension(user): Extension<CurrentUser>) -> Json<()> {
    tracing::info!(
        user_id = user.id,
        username = %user.username,
        "User logged out"
    );
    Json(())
}

/// Change the current user's password
pub async fn change_password(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<()>, AppError> {
    if req.new_password != req.confirm_password {
        return Err(AppError::validation(
            "New password and confirmation do not match".to_string(),
        ));
    }
    if req.new_password.is_empty() {
        return Err(AppError::validation("New password must not be empty".to_string()));
    }

    let users = UserRepository::new(state.db.clone());
    let user = users
        .find_by_id(current.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", current.id)))?;

    let password_valid = user
        .verify_password(&req.current_password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;
    if !password_valid {
        return Err(AppError::invalid("Current password is incorrect".to_string()));
    }

    users.update_password(user.id, &req.new_password).await?;

    tracing::info!(user_id = user.id, username = %user.username, "Password changed");
    Ok(Json(()))
}
