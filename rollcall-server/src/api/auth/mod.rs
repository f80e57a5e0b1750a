//! Auth API Module

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

pub use handler::{LoginRequest, LoginResponse, UserInfo};

/// Auth router — login is on the public allowlist, the rest require a token
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/auth", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/login", post(handler::login))
        .route("/me", get(handler::me))
        .route("/logout", post(handler::logout))
        .route("/change-password", post(handler::change_password))
}
