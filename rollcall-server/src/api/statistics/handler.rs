//! Statistics API Handlers
//!
//! Dashboard widgets for the admin console. All aggregation math is in
//! [`crate::attendance`]; handlers fetch the row sets and delegate.

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::attendance::{DailyPoint, StatusBreakdown, daily_status_breakdown, default_cutoff,
    month_series, trailing_series};
use crate::core::ServerState;
use crate::db::repository::employee::DepartmentCount;
use crate::db::repository::{
    AttendanceRepository, DeviceRepository, EmployeeRepository, ReportRepository,
};
use crate::utils::time::{day_end, day_start, parse_date};
use crate::utils::AppResult;

/// Trailing window length for the dashboard series
const TRAILING_DAYS: u32 = 7;

/// Dashboard late list length
const LATE_LIST_LIMIT: i64 = 5;

// ============================================================================
// Response Types
// ============================================================================

/// Entity counters across the system
#[derive(Debug, Clone, Serialize)]
pub struct OverviewCounts {
    pub employees: i64,
    pub attendance_records: i64,
    pub reports: i64,
    pub devices: i64,
}

/// One late check-in for the dashboard list
#[derive(Debug, Clone, Serialize)]
pub struct LateCheckIn {
    pub employee_name: String,
    pub timestamp_in: Option<NaiveDateTime>,
}

/// Full dashboard payload
#[derive(Debug, Clone, Serialize)]
pub struct DashboardResponse {
    pub overview: OverviewCounts,
    pub department_stats: Vec<DepartmentCount>,
    pub today_attendance: i64,
    pub late_check_ins: Vec<LateCheckIn>,
    pub daily_attendance: Vec<DailyPoint>,
}

// ============================================================================
// Query Parameters
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct DailyQuery {
    /// YYYY-MM-DD; defaults to today
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MonthlyQuery {
    pub year: i32,
    pub month: u32,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/admin/statistics/dashboard
pub async fn dashboard(State(state): State<ServerState>) -> AppResult<Json<DashboardResponse>> {
    let employees = EmployeeRepository::new(state.db.clone());
    let attendance = AttendanceRepository::new(state.db.clone());

    let overview = OverviewCounts {
        employees: employees.count().await?,
        attendance_records: attendance.count().await?,
        reports: ReportRepository::new(state.db.clone()).count().await?,
        devices: DeviceRepository::new(state.db.clone()).count().await?,
    };

    let department_stats = employees.department_counts().await?;

    let today = Local::now().date_naive();
    let today_attendance = attendance.count_on_date(today).await?;

    // Latest check-ins past the default cutoff (no-shift baseline)
    let late_check_ins = attendance
        .find_latest_after(default_cutoff(), LATE_LIST_LIMIT)
        .await?
        .into_iter()
        .map(|r| LateCheckIn {
            employee_name: r.employee_name,
            timestamp_in: r.timestamp_in,
        })
        .collect();

    // Trailing window series
    let window_start = today
        .checked_sub_days(chrono::Days::new((TRAILING_DAYS - 1) as u64))
        .unwrap_or(today);
    let records = attendance
        .find_between(day_start(window_start), day_end(today))
        .await?;
    let daily_attendance = trailing_series(&records, today, TRAILING_DAYS);

    Ok(Json(DashboardResponse {
        overview,
        department_stats,
        today_attendance,
        late_check_ins,
        daily_attendance,
    }))
}

/// GET /api/admin/statistics/daily?date=YYYY-MM-DD
///
/// Status breakdown for a single day. Employees with no record at all
/// show up in the computed absent bucket.
pub async fn daily(
    State(state): State<ServerState>,
    Query(query): Query<DailyQuery>,
) -> AppResult<Json<StatusBreakdown>> {
    let date = match query.date.as_deref() {
        Some(s) => parse_date(s)?,
        None => Local::now().date_naive(),
    };

    let records = AttendanceRepository::new(state.db.clone())
        .find_on_date(date)
        .await?;
    let total_employees = EmployeeRepository::new(state.db.clone()).count().await?;

    Ok(Json(daily_status_breakdown(&records, date, total_employees)))
}

/// GET /api/admin/statistics/monthly?year=2026&month=8
///
/// One point per calendar day of the month; future days report 0 so far.
pub async fn monthly(
    State(state): State<ServerState>,
    Query(query): Query<MonthlyQuery>,
) -> AppResult<Json<Vec<DailyPoint>>> {
    let year = query.year;
    let month = query.month.clamp(1, 12);

    let month_start = NaiveDate::from_ymd_opt(year, month, 1);
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };

    let records = match (month_start, next_month) {
        (Some(start), Some(next)) => {
            AttendanceRepository::new(state.db.clone())
                .find_between(day_start(start), day_start(next))
                .await?
        }
        _ => Vec::new(),
    };

    Ok(Json(month_series(&records, year, month)))
}
