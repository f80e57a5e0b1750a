//! Attendance API Handlers
//!
//! Mobile check-in and history endpoints plus the console record
//! management. One check-in per employee per calendar day — a second
//! attempt is answered with the original timestamp, not inserted.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Local;
use serde::Deserialize;

use crate::attendance::classify;
use crate::core::ServerState;
use crate::db::models::{
    AttendanceCreate, AttendanceRecord, AttendanceWithEmployee, CheckInRequest, CheckInResponse,
};
use crate::db::repository::attendance::DayCount;
use crate::db::repository::{
    AttendanceRepository, DeviceRepository, EmployeeRepository, ShiftRepository,
};
use crate::utils::time::parse_date;
use crate::utils::{AppError, AppResult};

// ============================================================================
// Mobile endpoints
// ============================================================================

/// POST /api/attendance - record a check-in
///
/// When the device sends no status, it is derived from the employee's
/// shift for the day via the lateness classifier.
pub async fn check_in(
    State(state): State<ServerState>,
    Json(req): Json<CheckInRequest>,
) -> AppResult<Json<CheckInResponse>> {
    let employees = EmployeeRepository::new(state.db.clone());
    let employee = employees
        .find_by_id(req.employee_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Employee {} not found", req.employee_id)))?;

    if employee.is_locked {
        return Err(AppError::forbidden("Account has been disabled".to_string()));
    }

    let now = Local::now().naive_local();
    let today = now.date();

    let records = AttendanceRepository::new(state.db.clone());
    if let Some(existing) = records.find_for_employee_on(req.employee_id, today).await? {
        return Ok(Json(CheckInResponse {
            success: false,
            message: "Already checked in today".to_string(),
            already_checked_in: true,
            timestamp: existing.timestamp_in,
            attendance_id: Some(existing.id),
        }));
    }

    // Derive status from the shift window when the device sent none
    let status = match req.status {
        Some(s) if !s.trim().is_empty() => s,
        _ => {
            let shift = ShiftRepository::new(state.db.clone())
                .find_for_employee_on(req.employee_id, today)
                .await?;
            classify(now.time(), shift.map(|s| s.start_time))
                .as_status()
                .to_string()
        }
    };

    let record = records
        .create(AttendanceCreate {
            employee_id: req.employee_id,
            timestamp_in: Some(now),
            status: Some(status),
            photo_path: req.photo_path,
            device_id: req.device_id,
        })
        .await?;

    if let Some(device_id) = req.device_id {
        DeviceRepository::new(state.db.clone())
            .touch_last_seen(device_id, now)
            .await?;
    }

    tracing::info!(
        employee_id = req.employee_id,
        attendance_id = record.id,
        status = record.status.as_deref().unwrap_or(""),
        "Check-in recorded"
    );

    Ok(Json(CheckInResponse {
        success: true,
        message: "Check-in recorded".to_string(),
        already_checked_in: false,
        timestamp: record.timestamp_in,
        attendance_id: Some(record.id),
    }))
}

/// GET /api/attendance/employee/{id} - attendance history for one employee
pub async fn by_employee(
    State(state): State<ServerState>,
    Path(employee_id): Path<i64>,
) -> AppResult<Json<Vec<AttendanceRecord>>> {
    EmployeeRepository::new(state.db.clone())
        .find_by_id(employee_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Employee {} not found", employee_id)))?;

    let records = AttendanceRepository::new(state.db.clone())
        .find_by_employee(employee_id)
        .await?;
    Ok(Json(records))
}

/// GET /api/attendance/check-today/{id} - has this employee checked in today?
pub async fn check_today(
    State(state): State<ServerState>,
    Path(employee_id): Path<i64>,
) -> AppResult<Json<CheckInResponse>> {
    let today = Local::now().date_naive();
    let existing = AttendanceRepository::new(state.db.clone())
        .find_for_employee_on(employee_id, today)
        .await?;

    let response = match existing {
        Some(record) => CheckInResponse {
            success: true,
            message: "Already checked in today".to_string(),
            already_checked_in: true,
            timestamp: record.timestamp_in,
            attendance_id: Some(record.id),
        },
        None => CheckInResponse {
            success: true,
            message: "Not checked in yet today".to_string(),
            already_checked_in: false,
            timestamp: None,
            attendance_id: None,
        },
    };
    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// GET /api/attendance/stats/summary - per-day check-in counts
pub async fn stats_summary(
    State(state): State<ServerState>,
    Query(query): Query<SummaryQuery>,
) -> AppResult<Json<Vec<DayCount>>> {
    let start = query.start_date.as_deref().map(parse_date).transpose()?;
    let end = query.end_date.as_deref().map(parse_date).transpose()?;

    let counts = AttendanceRepository::new(state.db.clone())
        .counts_by_day(start, end)
        .await?;
    Ok(Json(counts))
}

// ============================================================================
// Console endpoints
// ============================================================================

/// GET /api/admin/attendance - all records with employee names
pub async fn list(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<AttendanceWithEmployee>>> {
    let records = AttendanceRepository::new(state.db.clone())
        .find_all_with_employee()
        .await?;
    Ok(Json(records))
}

/// GET /api/admin/attendance/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AttendanceWithEmployee>> {
    let record = AttendanceRepository::new(state.db.clone())
        .find_by_id_with_employee(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Attendance record {} not found", id)))?;
    Ok(Json(record))
}

/// POST /api/admin/attendance - manual record entry
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<AttendanceCreate>,
) -> AppResult<Json<AttendanceRecord>> {
    EmployeeRepository::new(state.db.clone())
        .find_by_id(payload.employee_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!("Employee {} not found", payload.employee_id))
        })?;

    let record = AttendanceRepository::new(state.db.clone())
        .create(payload)
        .await?;
    Ok(Json(record))
}

/// DELETE /api/admin/attendance/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let deleted = AttendanceRepository::new(state.db.clone()).delete(id).await?;
    if !deleted {
        return Err(AppError::not_found(format!(
            "Attendance record {} not found",
            id
        )));
    }
    Ok(Json(true))
}
