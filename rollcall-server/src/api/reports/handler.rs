//! Report API Handlers
//!
//! Generation, listing, download and deletion of CSV report artifacts.

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::Local;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Report, ReportCreate};
use crate::db::repository::ReportRepository;
use crate::reports::generator;
use crate::utils::{AppError, AppResult};

/// GET /api/admin/reports - list generated reports, newest first
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Report>>> {
    let reports = ReportRepository::new(state.db.clone()).find_all().await?;
    Ok(Json(reports))
}

/// POST /api/admin/reports - generate a report artifact
pub async fn create(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<ReportCreate>,
) -> AppResult<Json<Report>> {
    let report = generator::generate(
        &state.db,
        &state.work_dir(),
        payload,
        Some(current.id),
        Local::now().naive_local(),
    )
    .await?;
    Ok(Json(report))
}

/// GET /api/admin/reports/{id}/download
///
/// Serves the artifact as `text/csv; charset=utf-8` with its original
/// filename; 404 when the row or the backing file is missing.
pub async fn download(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    let report = ReportRepository::new(state.db.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Report {id} not found")))?;

    let artifact = generator::resolve_artifact_path(&state.work_dir(), &report.file_path);
    let bytes = tokio::fs::read(&artifact)
        .await
        .map_err(|_| AppError::not_found("Report file does not exist".to_string()))?;

    let file_name = artifact
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("report_{id}.csv"));

    let response = (
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                "text/csv; charset=utf-8".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    )
        .into_response();
    Ok(response)
}

/// DELETE /api/admin/reports/{id}
///
/// Removes the artifact best-effort, then the row — a missing file
/// never blocks the deletion.
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    generator::delete(&state.db, &state.work_dir(), id).await?;
    Ok(Json(true))
}
