//! User Account API Module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub use handler::UserResponse;

/// User router (console scope)
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/admin/users", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
}
