//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查 (公共)
//! - [`auth`] - 认证相关接口
//! - [`attendance`] - 考勤打卡接口 (移动端 + 控制台)
//! - [`employees`] - 员工管理接口 (控制台)
//! - [`devices`] - 设备管理接口 (控制台)
//! - [`shifts`] - 排班管理接口 (控制台)
//! - [`users`] - 账号管理接口 (控制台)
//! - [`statistics`] - 统计看板接口 (控制台)
//! - [`reports`] - 报表接口 (控制台)
//!
//! 控制台路由 (`/api/admin/...`) 统一挂载角色门卫：未认证或角色不是
//! Admin/Manager 的请求静默重定向到登录入口。

pub mod attendance;
pub mod auth;
pub mod devices;
pub mod employees;
pub mod health;
pub mod reports;
pub mod shifts;
pub mod statistics;
pub mod users;

use axum::Router;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth::{require_auth, require_console_role};
use crate::core::ServerState;

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware)
pub fn build_router() -> Router<ServerState> {
    // Console routes: silent-redirect gate for non-Admin/Manager principals
    let console = Router::new()
        .merge(employees::router())
        .merge(devices::router())
        .merge(shifts::router())
        .merge(users::router())
        .merge(statistics::router())
        .merge(reports::router())
        .merge(attendance::admin_router())
        .layer(axum_middleware::from_fn(require_console_role));

    Router::new()
        // Auth API - login is public, the rest authenticated
        .merge(auth::router())
        // Mobile attendance API - authentication required
        .merge(attendance::router())
        // Health API - public route
        .merge(health::router())
        // Admin console API - Admin/Manager only
        .merge(console)
}

/// Build a fully configured application with all middleware and state
pub fn build_app(state: ServerState) -> Router {
    let photos_dir = state.config.photos_dir();

    build_router()
        // Employee photos - static files under the work dir
        .nest_service("/photos", ServeDir::new(photos_dir))
        // ========== Tower HTTP Middleware ==========
        // CORS - Handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Compression - Gzip compress responses
        .layer(CompressionLayer::new())
        // Trace - Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // Request ID - Generate unique ID for each request
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        // Propagate request ID to response
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        // JWT authentication - executes before routes, injects CurrentUser
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ))
        .with_state(state)
}
