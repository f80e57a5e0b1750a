//! Shift API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{Shift, ShiftCreate, ShiftUpdate, ShiftWithEmployee};
use crate::db::repository::{EmployeeRepository, ShiftRepository};
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult};

/// List all shifts with employee names
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<ShiftWithEmployee>>> {
    let repo = ShiftRepository::new(state.db.clone());
    let shifts = repo.find_all_with_employee().await?;
    Ok(Json(shifts))
}

/// Get shift by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Shift>> {
    let repo = ShiftRepository::new(state.db.clone());
    let shift = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Shift {} not found", id)))?;
    Ok(Json(shift))
}

/// Create a shift
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ShiftCreate>,
) -> AppResult<Json<Shift>> {
    validate_optional_text(&payload.note, "note", MAX_NOTE_LEN)?;
    if payload.end_time <= payload.start_time {
        return Err(AppError::validation(
            "end_time must be after start_time".to_string(),
        ));
    }

    // The FK is enforced by SQLite, but a clear 404 beats a raw constraint error
    EmployeeRepository::new(state.db.clone())
        .find_by_id(payload.employee_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!("Employee {} not found", payload.employee_id))
        })?;

    let repo = ShiftRepository::new(state.db.clone());
    let shift = repo.create(payload).await?;

    tracing::info!(
        shift_id = shift.id,
        employee_id = shift.employee_id,
        date = %shift.date,
        "Shift created"
    );
    Ok(Json(shift))
}

/// Update a shift
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ShiftUpdate>,
) -> AppResult<Json<Shift>> {
    validate_optional_text(&payload.note, "note", MAX_NOTE_LEN)?;

    let repo = ShiftRepository::new(state.db.clone());
    let existing = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Shift {} not found", id)))?;

    // Validate the effective window before writing
    let start = payload.start_time.unwrap_or(existing.start_time);
    let end = payload.end_time.unwrap_or(existing.end_time);
    if end <= start {
        return Err(AppError::validation(
            "end_time must be after start_time".to_string(),
        ));
    }

    let shift = repo.update(id, payload).await?;
    Ok(Json(shift))
}

/// Delete a shift
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let repo = ShiftRepository::new(state.db.clone());
    let deleted = repo.delete(id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Shift {} not found", id)));
    }
    Ok(Json(true))
}
