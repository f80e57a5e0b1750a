//! Shift Model (排班)
//!
//! A shift is the expected work window for one employee on one date;
//! the lateness classifier judges check-ins against its start time.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Shift {
    pub id: i64,
    pub employee_id: i64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_overtime: bool,
    pub note: Option<String>,
}

/// Shift joined with the employee name for list views
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ShiftWithEmployee {
    pub id: i64,
    pub employee_id: i64,
    pub employee_name: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_overtime: bool,
    pub note: Option<String>,
}

/// Create shift payload
#[derive(Debug, Clone, Deserialize)]
pub struct ShiftCreate {
    pub employee_id: i64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default)]
    pub is_overtime: bool,
    pub note: Option<String>,
}

/// Update shift payload
#[derive(Debug, Clone, Deserialize)]
pub struct ShiftUpdate {
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub is_overtime: Option<bool>,
    pub note: Option<String>,
}
