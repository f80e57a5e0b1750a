//! Device API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Local;
use uuid::Uuid;

use crate::core::ServerState;
use crate::db::models::{Device, DeviceCreate, DeviceUpdate};
use crate::db::repository::DeviceRepository;
use crate::utils::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text};
use crate::utils::{AppError, AppResult};

/// List all devices
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Device>>> {
    let repo = DeviceRepository::new(state.db.clone());
    let devices = repo.find_all().await?;
    Ok(Json(devices))
}

/// Get device by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Device>> {
    let repo = DeviceRepository::new(state.db.clone());
    let device = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Device {} not found", id)))?;
    Ok(Json(device))
}

/// Register a new device — a fresh api_key is generated per creation
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DeviceCreate>,
) -> AppResult<Json<Device>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.location, "location", MAX_NOTE_LEN)?;

    let api_key = Uuid::new_v4().to_string();
    let repo = DeviceRepository::new(state.db.clone());
    let device = repo
        .create(payload, &api_key, Local::now().naive_local())
        .await?;

    tracing::info!(device_id = device.id, name = %device.name, "Device registered");
    Ok(Json(device))
}

/// Update a device
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<DeviceUpdate>,
) -> AppResult<Json<Device>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.location, "location", MAX_NOTE_LEN)?;

    let repo = DeviceRepository::new(state.db.clone());
    let device = repo.update(id, payload).await?;
    Ok(Json(device))
}

/// Delete a device
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let repo = DeviceRepository::new(state.db.clone());
    let deleted = repo.delete(id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Device {} not found", id)));
    }
    Ok(Json(true))
}
