//! 认证中间件
//!
//! JWT 认证 + 管理控制台角色检查。

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::AppError;

/// 登录入口 — 控制台角色检查失败时重定向到这里
pub const LOGIN_PATH: &str = "/api/auth/login";

/// 无需认证的公共 API 路由
fn is_public_api_route(path: &str) -> bool {
    path == LOGIN_PATH || path == "/api/health"
}

/// Console routes get the silent-redirect gate instead of a 401
fn is_console_route(path: &str) -> bool {
    path.starts_with("/api/admin/")
}

/// 认证中间件 - 验证 JWT 并注入 [`CurrentUser`]
///
/// 从 `Authorization: Bearer <token>` 头提取并验证 JWT。
/// 验证成功后将 [`CurrentUser`] 注入请求扩展。
///
/// # 跳过认证的路径
///
/// - `OPTIONS *` (CORS 预检)
/// - 非 `/api/` 路径
/// - `/api/auth/login`, `/api/health`
///
/// 控制台路径 (`/api/admin/...`) 上缺失/无效的令牌不在这里拦截 —
/// 请求继续传递，由 [`require_console_role`] 统一静默重定向。
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path().to_string();

    // 允许 CORS 预检的 OPTIONS 请求 (跳过认证)
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // 非 API 路由跳过认证 (让它们正常返回 404)
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    if is_public_api_route(&path) {
        return Ok(next.run(req).await);
    }

    let jwt_service = state.jwt_service();
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header.and_then(JwtService::extract_from_header) {
        Some(token) => token,
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
            if is_console_route(&path) {
                return Ok(next.run(req).await);
            }
            return Err(AppError::unauthorized());
        }
    };

    // 验证令牌
    match jwt_service.validate_token(token) {
        Ok(claims) => {
            let user = CurrentUser::try_from(claims)
                .map_err(|e| AppError::invalid_token(format!("Malformed JWT claims: {}", e)))?;
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", req.uri())
            );

            if is_console_route(&path) {
                return Ok(next.run(req).await);
            }
            match e {
                crate::auth::JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}

/// 管理控制台门卫 - 要求 Admin / Manager 角色
///
/// 未认证或角色不在允许集合内时静默重定向到登录入口，
/// 直接跳过 handler — 不返回错误页。
pub async fn require_console_role(req: Request, next: Next) -> Response {
    match req.extensions().get::<CurrentUser>() {
        Some(user) if user.is_console() => next.run(req).await,
        Some(user) => {
            security_log!(
                "WARN",
                "console_role_denied",
                user_id = user.id,
                username = user.username.clone(),
                user_role = user.role.to_string()
            );
            Redirect::to(LOGIN_PATH).into_response()
        }
        None => Redirect::to(LOGIN_PATH).into_response(),
    }
}
