//! 结构化日志模块
//!
//! 基于 tracing 的日志初始化，支持运行时调整日志级别。

use std::collections::BTreeMap;
use std::path::Path;

use parking_lot::RwLock;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, writer::BoxMakeWriter},
    layer::SubscriberExt,
    reload::{self, Handle},
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

use crate::config::LogSettings;
use crate::error::{ObservabilityError, Result};

/// 日志级别重新加载句柄类型
type ReloadHandle = Handle<EnvFilter, Registry>;

/// 日志管理器
///
/// 持有过滤器重新加载句柄；写文件时还持有后台写线程的 guard，
/// 丢弃管理器前会刷新剩余日志。
pub struct LogManager {
    settings: RwLock<LogSettings>,
    reload_handle: ReloadHandle,
    _guard: Option<WorkerGuard>,
}

impl std::fmt::Debug for LogManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogManager")
            .field("settings", &*self.settings.read())
            .finish()
    }
}

impl LogManager {
    /// 安装全局 subscriber；每个进程只能成功一次
    pub fn init(settings: LogSettings) -> Result<Self> {
        let filter = build_filter(&settings.level, &settings.module_levels)?;
        let (filter, reload_handle) = reload::Layer::new(filter);

        let (writer, guard, ansi) = match &settings.file {
            Some(path) => {
                let (writer, guard) = file_writer(path)?;
                (writer, Some(guard), false)
            }
            None => (BoxMakeWriter::new(std::io::stderr), None, settings.ansi_colors),
        };

        let registry = tracing_subscriber::registry().with(filter);
        let installed = if settings.json_format {
            let layer = fmt::layer()
                .json()
                .with_target(settings.include_target)
                .with_ansi(false)
                .with_writer(writer);
            registry.with(layer).try_init()
        } else {
            let layer = fmt::layer()
                .with_target(settings.include_target)
                .with_ansi(ansi)
                .with_writer(writer);
            registry.with(layer).try_init()
        };
        installed.map_err(|e| ObservabilityError::logging(format!("Failed to install subscriber: {}", e)))?;

        tracing::info!(
            target: "giftchoice_observability",
            "Log manager initialized with level: {}",
            settings.level
        );

        Ok(Self {
            settings: RwLock::new(settings),
            reload_handle,
            _guard: guard,
        })
    }

    /// 动态更新日志级别，模块级别保持不变
    pub fn update_level(&self, level: &str) -> Result<()> {
        let mut settings = self.settings.write();
        let new_filter = build_filter(level, &settings.module_levels)?;

        self.reload_handle
            .modify(|filter| *filter = new_filter)
            .map_err(|e| ObservabilityError::logging(format!("Failed to update log level: {}", e)))?;
        settings.level = level.to_string();

        tracing::info!(
            target: "giftchoice_observability",
            "Log level updated to: {}",
            level
        );
        Ok(())
    }

    /// 当前日志级别
    pub fn level(&self) -> String {
        self.settings.read().level.clone()
    }

    /// 当前配置
    pub fn settings(&self) -> LogSettings {
        self.settings.read().clone()
    }
}

/// 构建环境过滤器
pub fn build_filter(level: &str, module_levels: &BTreeMap<String, String>) -> Result<EnvFilter> {
    let mut filter = EnvFilter::try_new(level)
        .map_err(|e| ObservabilityError::logging(format!("Invalid log level: {}", e)))?;

    // 添加模块级别的过滤器
    for (module, level) in module_levels {
        filter = filter.add_directive(
            format!("{}={}", module, level)
                .parse()
                .map_err(|e| ObservabilityError::logging(format!("Invalid directive: {}", e)))?,
        );
    }

    Ok(filter)
}

fn file_writer(path: &Path) -> Result<(BoxMakeWriter, WorkerGuard)> {
    let file_name = path
        .file_name()
        .ok_or_else(|| ObservabilityError::config(format!("Invalid log file path: {:?}", path)))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    Ok((BoxMakeWriter::new(writer), guard))
}

/// 创建带有请求上下文的 span
pub fn create_request_span(method: &str, path: &str) -> tracing::Span {
    tracing::info_span!(
        "request",
        method = %method,
        path = %path,
    )
}

/// 创建带有会话上下文的 span
pub fn create_session_span(session_id: &str, message_id: Option<u64>) -> tracing::Span {
    if let Some(message_id) = message_id {
        tracing::info_span!(
            "session",
            session_id = %session_id,
            message_id = message_id,
        )
    } else {
        tracing::info_span!(
            "session",
            session_id = %session_id,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter() {
        let mut modules = BTreeMap::new();
        modules.insert("hyper".to_string(), "warn".to_string());

        assert!(build_filter("debug", &modules).is_ok());
        assert!(build_filter("giftchoice_server=trace,info", &BTreeMap::new()).is_ok());

        modules.insert("hyper".to_string(), "loud".to_string());
        assert!(build_filter("info", &modules).is_err());
    }

    // The global subscriber can only be installed once per test binary,
    // so everything that needs it lives in this one test.
    #[test]
    fn test_log_manager_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let settings = LogSettings::default()
            .with_level("debug")
            .with_file(dir.path().join("logs").join("test.log"));

        let manager = LogManager::init(settings.clone()).unwrap();
        assert_eq!(manager.level(), "debug");
        assert!(dir.path().join("logs").exists());

        manager.update_level("warn").unwrap();
        assert_eq!(manager.level(), "warn");

        assert!(LogManager::init(settings).is_err());
    }

    #[test]
    fn test_create_spans() {
        let request_span = create_request_span("GET", "/health");
        let session_span = create_session_span("sess-456", Some(3));
        // no subscriber may be installed yet, in which case spans are disabled
        if let Some(meta) = request_span.metadata() {
            assert_eq!(meta.name(), "request");
        }
        if let Some(meta) = session_span.metadata() {
            assert_eq!(meta.name(), "session");
        }
    }
}
