//! Attendance API Module
//!
//! Mobile routes under `/api/attendance`, console routes under
//! `/api/admin/attendance`.

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

/// Mobile attendance router (any authenticated user)
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/attendance", mobile_routes())
}

/// Console attendance router (gated to Admin/Manager)
pub fn admin_router() -> Router<ServerState> {
    Router::new().nest("/api/admin/attendance", admin_routes())
}

fn mobile_routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::check_in))
        .route("/employee/{id}", get(handler::by_employee))
        .route("/check-today/{id}", get(handler::check_today))
        .route("/stats/summary", get(handler::stats_summary))
}

fn admin_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id).delete(handler::delete))
}
