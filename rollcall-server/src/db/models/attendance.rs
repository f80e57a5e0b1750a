//! Attendance Record Model (考勤记录)

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One check-in event. `timestamp_in` is nullable — a record without a
/// check-in time is excluded from all time-based aggregation. Records
/// are never updated after creation in the normal flow.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AttendanceRecord {
    pub id: i64,
    pub employee_id: i64,
    pub timestamp_in: Option<NaiveDateTime>,
    /// Free-text status: "present" / "late" / "absent" / other
    pub status: Option<String>,
    pub photo_path: Option<String>,
    pub device_id: Option<i64>,
}

/// Attendance record joined with the employee name for list views
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AttendanceWithEmployee {
    pub id: i64,
    pub employee_id: i64,
    pub employee_name: String,
    pub timestamp_in: Option<NaiveDateTime>,
    pub status: Option<String>,
    pub photo_path: Option<String>,
    pub device_id: Option<i64>,
}

/// Check-in payload (device or mobile client)
#[derive(Debug, Clone, Deserialize)]
pub struct CheckInRequest {
    pub employee_id: i64,
    /// Explicit status from the device; derived from the shift when absent
    pub status: Option<String>,
    pub photo_path: Option<String>,
    pub device_id: Option<i64>,
}

/// Check-in result. A same-day duplicate is answered, not inserted.
#[derive(Debug, Clone, Serialize)]
pub struct CheckInResponse {
    pub success: bool,
    pub message: String,
    pub already_checked_in: bool,
    pub timestamp: Option<NaiveDateTime>,
    pub attendance_id: Option<i64>,
}

/// Manual record creation (admin console)
#[derive(Debug, Clone, Deserialize)]
pub struct AttendanceCreate {
    pub employee_id: i64,
    pub timestamp_in: Option<NaiveDateTime>,
    pub status: Option<String>,
    pub photo_path: Option<String>,
    pub device_id: Option<i64>,
}
