//! 日志初始化
//!
//! 安装 `tracing-subscriber` fmt 订阅者：默认级别 `info`，可通过 `RUST_LOG` 覆盖。
//! 依赖 `log` crate 的第三方库的日志经由 `tracing-log` 转发。

use tracing_subscriber::EnvFilter;

/// 默认过滤规则
pub const DEFAULT_FILTER: &str = "info";

/// 初始化日志（只有第一次调用生效）
pub fn init() {
    init_with_default(DEFAULT_FILTER);
}

/// 以指定的默认过滤规则初始化日志
///
/// `RUST_LOG` 存在时优先使用环境变量。重复调用会被忽略。
pub fn init_with_default(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // 已经安装过 log 转发或全局订阅者时忽略错误
    let _ = tracing_log::LogTracer::init_with_filter(log::LevelFilter::Trace);
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init();
        init_with_default("debug");
        log::info!("bridged through tracing-log");
        tracing::info!("direct tracing event");
    }
}
