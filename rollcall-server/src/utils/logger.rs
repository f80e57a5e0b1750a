//! Logging Infrastructure
//!
//! Structured logging setup with support for both development and production environments.

use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Initialize the logger
pub fn init_logger() {
    init_logger_with_file(None, None);
}

/// Initialize the logger with optional file output
///
/// 如果 `log_dir` 存在则输出到按天滚动的日志文件，否则输出到 stdout。
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) {
    let default_directive = log_level.unwrap_or("rollcall_server=info,tower_http=info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directive.into());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    // Add file output if log_dir is provided
    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if log_path.exists()
            && let Some(dir_str) = log_path.to_str()
        {
            let file_appender = tracing_appender::rolling::daily(dir_str, "rollcall-server");
            subscriber.with_writer(file_appender).init();
            return;
        }
    }

    subscriber.init();
}
