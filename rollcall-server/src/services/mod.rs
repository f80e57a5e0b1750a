//! 外部服务 - 人脸识别客户端、SMTP 邮件
//!
//! Both services follow the best-effort policy: a single synchronous
//! attempt, bounded by a short timeout, whose failure is captured as a
//! [`Warning`] value returned alongside the primary result instead of
//! aborting the operation.

pub mod face;
pub mod mailer;

pub use face::{FaceClient, FaceError};
pub use mailer::{MailError, Mailer};

use serde::Serialize;

/// Outcome of a failed secondary action, surfaced to the caller next to
/// the successful primary result.
#[derive(Debug, Clone, Serialize)]
pub struct Warning {
    /// Which side effect failed ("face", "email", ...)
    pub source: &'static str,
    pub message: String,
}

impl Warning {
    pub fn new(source: &'static str, message: impl Into<String>) -> Self {
        Self {
            source,
            message: message.into(),
        }
    }
}
