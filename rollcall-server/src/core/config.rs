//! 服务器配置
//!
//! # 环境变量
//!
//! | 环境变量 | 默认值 | 说明 |
//! |----------|--------|------|
//! | WORK_DIR | /var/lib/rollcall | 工作目录 (照片、报表、数据库) |
//! | HTTP_PORT | 3000 | HTTP 服务端口 |
//! | DATABASE_PATH | WORK_DIR/database/rollcall.db | SQLite 路径 |
//! | FACE_API_URL | http://localhost:8000/api/faceid/add_face | 人脸识别服务 |
//! | FACE_API_TIMEOUT_SECS | 10 | 人脸识别请求超时 |
//! | SMTP_HOST / SMTP_PORT | smtp.gmail.com / 587 | SMTP 服务器 |
//! | SMTP_USERNAME / SMTP_PASSWORD | (未配置则跳过邮件) | SMTP 凭证 |
//! | SMTP_FROM | no-reply@rollcall.local | 发件人 |
//! | DEFAULT_PASSWORD | 123456 | 新员工账号初始密码 |
//! | ENVIRONMENT | development | 运行环境 |

use std::path::PathBuf;

use crate::auth::JwtConfig;
use crate::utils::AppError;

/// SMTP settings; credentials absent means the mailer is disabled
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: String,
}

impl SmtpConfig {
    fn from_env() -> Self {
        Self {
            host: std::env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".into()),
            port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(587),
            username: std::env::var("SMTP_USERNAME").ok().filter(|s| !s.is_empty()),
            password: std::env::var("SMTP_PASSWORD").ok().filter(|s| !s.is_empty()),
            from: std::env::var("SMTP_FROM").unwrap_or_else(|_| "no-reply@rollcall.local".into()),
        }
    }
}

/// 服务器配置
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储照片、报表文件和数据库
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 人脸识别服务 add-face 端点
    pub face_api_url: String,
    /// 人脸识别请求超时 (秒)
    pub face_api_timeout_secs: u64,
    /// SMTP 邮件配置
    pub smtp: SmtpConfig,
    /// 新员工账号的初始密码
    pub default_password: String,
}

impl Config {
    /// 从环境变量加载配置，未设置的项使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/rollcall".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            face_api_url: std::env::var("FACE_API_URL")
                .unwrap_or_else(|_| "http://localhost:8000/api/faceid/add_face".into()),
            face_api_timeout_secs: std::env::var("FACE_API_TIMEOUT_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10),
            smtp: SmtpConfig::from_env(),
            default_password: std::env::var("DEFAULT_PASSWORD")
                .unwrap_or_else(|_| "123456".into()),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn work_dir_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir)
    }

    /// 员工照片目录
    pub fn photos_dir(&self) -> PathBuf {
        self.work_dir_path().join("photos")
    }

    /// 报表文件目录
    pub fn reports_dir(&self) -> PathBuf {
        self.work_dir_path().join("reports")
    }

    /// 数据库目录
    pub fn database_dir(&self) -> PathBuf {
        self.work_dir_path().join("database")
    }

    /// SQLite 文件路径 (DATABASE_PATH 可覆盖)
    pub fn database_path(&self) -> String {
        std::env::var("DATABASE_PATH").unwrap_or_else(|_| {
            self.database_dir()
                .join("rollcall.db")
                .to_string_lossy()
                .into_owned()
        })
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> Result<(), AppError> {
        for dir in [
            self.work_dir_path(),
            self.photos_dir(),
            self.reports_dir(),
            self.database_dir(),
        ] {
            std::fs::create_dir_all(&dir).map_err(|e| {
                AppError::internal(format!("Failed to create {}: {e}", dir.display()))
            })?;
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
