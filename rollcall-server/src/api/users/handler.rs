//! User Account API Handlers

use axum::{
    Json,
    extract::{Extension, Path, State},
};
use serde::Serialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Role, User, UserCreate, UserUpdate};
use crate::db::repository::UserRepository;
use crate::utils::validation::{
    MAX_PASSWORD_LEN, MAX_SHORT_TEXT_LEN, validate_required_text,
};
use crate::utils::{AppError, AppResult};

/// User without the password hash
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub role: Role,
    pub employee_id: Option<i64>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            role: u.role,
            employee_id: u.employee_id,
        }
    }
}

/// List all accounts
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<UserResponse>>> {
    let users = UserRepository::new(state.db.clone()).find_all().await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

/// Get account by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<UserResponse>> {
    let user = UserRepository::new(state.db.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", id)))?;
    Ok(Json(user.into()))
}

/// Create an account
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<UserResponse>> {
    validate_required_text(&payload.username, "username", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.password, "password", MAX_PASSWORD_LEN)?;

    let user = UserRepository::new(state.db.clone()).create(payload).await?;
    tracing::info!(user_id = user.id, username = %user.username, "User account created");
    Ok(Json(user.into()))
}

/// Update an account (role / username / optional password reset)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<UserResponse>> {
    if let Some(username) = &payload.username {
        validate_required_text(username, "username", MAX_SHORT_TEXT_LEN)?;
    }
    if let Some(password) = &payload.new_password {
        validate_required_text(password, "password", MAX_PASSWORD_LEN)?;
    }

    let user = UserRepository::new(state.db.clone()).update(id, payload).await?;
    Ok(Json(user.into()))
}

/// Delete an account — self-deletion is rejected
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    if current.id == id {
        return Err(AppError::validation(
            "Cannot delete the account you are signed in with".to_string(),
        ));
    }

    let deleted = UserRepository::new(state.db.clone()).delete(id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("User {} not found", id)));
    }
    Ok(Json(true))
}
