//! GiftChoice Observability
//!
//! 统一的日志初始化：tracing subscriber、可热更新的级别过滤器和 span 辅助函数。

pub mod config;
pub mod error;
pub mod logging;

pub use config::LogSettings;
pub use error::{ObservabilityError, Result};
pub use logging::{create_request_span, create_session_span, LogManager};

/// 便捷导入模块
pub mod prelude {
    //! 常用类型的便捷导入

    pub use crate::{LogManager, LogSettings, Result};

    pub use tracing::{debug, error, info, instrument, trace, warn, Span};
}
