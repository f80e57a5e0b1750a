//! Statistics API Module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub use handler::{DashboardResponse, OverviewCounts};

/// Statistics router (console scope)
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/admin/statistics", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/dashboard", get(handler::dashboard))
        .route("/daily", get(handler::daily))
        .route("/monthly", get(handler::monthly))
}
