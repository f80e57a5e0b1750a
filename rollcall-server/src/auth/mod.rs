//! 认证模块 - JWT 认证、控制台角色门卫

pub mod extractor;
pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{LOGIN_PATH, require_auth, require_console_role};
