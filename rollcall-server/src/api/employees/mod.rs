//! Employee API Module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub use handler::EmployeeWithWarnings;

/// Employee router (console scope)
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/admin/employees", routes())
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
        .route("/{id}/lock", post(handler::lock))
        .route("/{id}/unlock", post(handler::unlock))
}
