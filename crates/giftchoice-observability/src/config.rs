//! 日志配置

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogSettings {
    /// 日志级别（trace, debug, info, warn, error），也可以是完整的过滤指令
    pub level: String,

    /// 是否使用 JSON 格式
    #[serde(default)]
    pub json_format: bool,

    /// 是否启用 ANSI 颜色；写文件时总是关闭
    #[serde(default = "default_true")]
    pub ansi_colors: bool,

    /// 是否输出 target
    #[serde(default = "default_true")]
    pub include_target: bool,

    /// 日志文件路径；为空时输出到 stderr
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// 模块级别的日志级别
    #[serde(default)]
    pub module_levels: BTreeMap<String, String>,
}

fn default_true() -> bool {
    true
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            ansi_colors: true,
            include_target: true,
            file: None,
            module_levels: BTreeMap::new(),
        }
    }
}

impl LogSettings {
    /// 设置日志级别
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// 设置是否使用 JSON 格式
    pub fn with_json_format(mut self, json: bool) -> Self {
        self.json_format = json;
        self
    }

    /// 设置日志文件路径
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// 添加模块特定的日志级别
    pub fn with_module_level(mut self, module: impl Into<String>, level: impl Into<String>) -> Self {
        self.module_levels.insert(module.into(), level.into());
        self
    }
}

impl From<&giftchoice_config::LoggingConfig> for LogSettings {
    fn from(config: &giftchoice_config::LoggingConfig) -> Self {
        Self {
            level: config.level.to_string(),
            json_format: config.json_format,
            file: config
                .file
                .as_deref()
                .and_then(giftchoice_config::expand_tilde),
            ..Self::default()
        }
        // 第三方 HTTP 栈太吵
        .with_module_level("hyper", "warn")
        .with_module_level("reqwest", "warn")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use giftchoice_config::{LogLevel, LoggingConfig};

    #[test]
    fn test_from_app_config() {
        let config = LoggingConfig {
            level: LogLevel::Debug,
            json_format: true,
            file: Some("/tmp/giftchoice.log".to_string()),
        };

        let settings = LogSettings::from(&config);
        assert_eq!(settings.level, "debug");
        assert!(settings.json_format);
        assert_eq!(settings.file, Some(PathBuf::from("/tmp/giftchoice.log")));
        assert_eq!(settings.module_levels.get("hyper").map(String::as_str), Some("warn"));
    }
}
