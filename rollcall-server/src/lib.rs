//! Rollcall Server - 员工考勤管理后端
//!
//! # 架构概述
//!
//! 本模块是考勤服务的主入口，提供以下核心功能：
//!
//! - **数据库** (`db`): 嵌入式 SQLite 存储 (sqlx)
//! - **认证** (`auth`): JWT + Argon2 认证体系，控制台角色门卫
//! - **考勤统计** (`attendance`): 日汇总、趋势序列、迟到判定
//! - **报表** (`reports`): CSV 报表生成与下载
//! - **外部服务** (`services`): 人脸识别客户端、SMTP 邮件
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! rollcall-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、控制台门卫
//! ├── db/            # 数据库层 (models + repository)
//! ├── attendance/    # 考勤聚合 (纯函数)
//! ├── reports/       # CSV 报表
//! ├── services/      # 人脸识别、邮件
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod attendance;
pub mod auth;
pub mod core;
pub mod db;
pub mod reports;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use crate::core::{Config, Server, ServerState};
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
    ____        ____            ____
   / __ \____  / / /________ _/ / /
  / /_/ / __ \/ / / ___/ __ `/ / /
 / _, _/ /_/ / / / /__/ /_/ / / /
/_/ |_|\____/_/_/\___/\__,_/_/_/
    "#
    );
}
