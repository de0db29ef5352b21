//! 日志基础设施

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use super::config::LoggingConfig;

pub struct Logger;

impl Logger {
    /// `RUST_LOG` 存在时优先于配置的级别；重复初始化会被忽略
    pub fn init(config: &LoggingConfig) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("{},tower_http=info", config.level)));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).compact())
            .try_init();
    }
}
