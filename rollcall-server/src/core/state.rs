//! 服务器状态

use std::path::PathBuf;
use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::services::{FaceClient, Mailer};
use crate::utils::AppError;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc / pool 浅拷贝，每个请求克隆的成本极低。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | db | SQLite 连接池 |
/// | jwt_service | JWT 认证服务 |
/// | face | 人脸识别服务客户端 |
/// | mailer | SMTP 邮件 (可选配置) |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: SqlitePool,
    pub jwt_service: Arc<JwtService>,
    pub face: FaceClient,
    pub mailer: Mailer,
}

impl ServerState {
    /// 手动构造 (测试场景使用 [`ServerState::initialize`] 之外的池)
    pub fn new(
        config: Config,
        db: SqlitePool,
        jwt_service: Arc<JwtService>,
        face: FaceClient,
        mailer: Mailer,
    ) -> Self {
        Self {
            config,
            db,
            jwt_service,
            face,
            mailer,
        }
    }

    /// 初始化服务器状态
    ///
    /// 1. 工作目录结构 (photos/, reports/, database/)
    /// 2. 数据库 (连接池 + 迁移 + 初始管理员)
    /// 3. JWT / 人脸识别 / 邮件服务
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        config.ensure_work_dir_structure()?;

        let db_service = DbService::new(&config.database_path()).await?;

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let face = FaceClient::new(config.face_api_url.clone(), config.face_api_timeout_secs);
        let mailer = Mailer::from_config(&config.smtp);

        Ok(Self::new(
            config.clone(),
            db_service.pool,
            jwt_service,
            face,
            mailer,
        ))
    }

    /// 获取工作目录
    pub fn work_dir(&self) -> PathBuf {
        self.config.work_dir_path()
    }

    /// 获取 JWT 服务
    pub fn jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
