//! Report generation and lifecycle
//!
//! Materializes a listing into a CSV artifact under the work dir and
//! records it as a `reports` row. Deleting a report removes the backing
//! file best-effort — a missing artifact never blocks the row deletion.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use sqlx::SqlitePool;

use crate::db::models::{Report, ReportCreate, ReportType};
use crate::db::repository::{AttendanceRepository, EmployeeRepository, ReportRepository};
use crate::utils::time::{day_end, day_start, parse_date};
use crate::utils::{AppError, AppResult};

use super::csv::{render_attendance_csv, render_employee_csv};

/// Resolve a stored `/reports/...` path against the work dir
pub fn resolve_artifact_path(work_dir: &Path, file_path: &str) -> PathBuf {
    work_dir.join(file_path.trim_start_matches('/'))
}

fn parse_optional_date(value: &Option<String>) -> AppResult<Option<NaiveDate>> {
    match value.as_deref() {
        Some(s) if !s.is_empty() => Ok(Some(parse_date(s)?)),
        _ => Ok(None),
    }
}

/// Generate a report artifact and record its metadata.
///
/// The `[start_date, end_date]` range is inclusive on both calendar
/// days; either bound may be absent.
pub async fn generate(
    pool: &SqlitePool,
    work_dir: &Path,
    request: ReportCreate,
    created_by: Option<i64>,
    now: NaiveDateTime,
) -> AppResult<Report> {
    let start = parse_optional_date(&request.start_date)?;
    let end = parse_optional_date(&request.end_date)?;

    let bytes = match request.report_type {
        ReportType::Attendance => {
            let rows = AttendanceRepository::new(pool.clone())
                .find_range_with_employee(start.map(day_start), end.map(day_end))
                .await?;
            render_attendance_csv(
                &rows,
                start.map(|d| d.format("%d/%m/%Y").to_string()).as_deref(),
                end.map(|d| d.format("%d/%m/%Y").to_string()).as_deref(),
                now,
            )?
        }
        ReportType::Employee => {
            let employees = EmployeeRepository::new(pool.clone())
                .find_all_for_report()
                .await?;
            render_employee_csv(&employees, now)?
        }
    };

    let reports_dir = work_dir.join("reports");
    tokio::fs::create_dir_all(&reports_dir)
        .await
        .map_err(|e| AppError::internal(format!("Failed to create reports directory: {e}")))?;

    let file_name = format!(
        "Report_{}_{}.csv",
        request.report_type,
        now.format("%Y%m%d%H%M%S")
    );
    let absolute = reports_dir.join(&file_name);
    tokio::fs::write(&absolute, &bytes)
        .await
        .map_err(|e| AppError::internal(format!("Failed to write report file: {e}")))?;

    let report = ReportRepository::new(pool.clone())
        .create(
            request.report_type,
            &format!("/reports/{file_name}"),
            now,
            created_by,
        )
        .await?;

    tracing::info!(
        report_id = report.id,
        report_type = %report.report_type,
        file = %file_name,
        size = bytes.len(),
        "Report generated"
    );
    Ok(report)
}

/// Delete a report row and its backing artifact.
///
/// The file removal is best-effort: an already-missing artifact still
/// lets the row deletion proceed.
pub async fn delete(pool: &SqlitePool, work_dir: &Path, id: i64) -> AppResult<()> {
    let repo = ReportRepository::new(pool.clone());
    let report = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Report {id} not found")))?;

    let artifact = resolve_artifact_path(work_dir, &report.file_path);
    if artifact.exists() {
        if let Err(e) = tokio::fs::remove_file(&artifact).await {
            tracing::warn!(
                report_id = id,
                path = %artifact.display(),
                error = %e,
                "Failed to remove report artifact, deleting row anyway"
            );
        }
    }

    repo.delete(id).await?;
    Ok(())
}
