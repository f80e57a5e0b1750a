//! Report API Module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Report router (console scope)
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/admin/reports", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", axum::routing::delete(handler::delete))
        .route("/{id}/download", get(handler::download))
}
