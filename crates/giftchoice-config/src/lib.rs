pub mod config;
pub mod manager;

pub use config::{
    CatalogConfig, Config, ConfigError, ConfigResult, ContactConfig, LogLevel, LoggingConfig,
    ServerConfig, SessionConfig,
};
pub use manager::ConfigManager;

use std::path::PathBuf;

/// 获取 GiftChoice 配置目录路径
pub fn giftchoice_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".giftchoice"))
}

/// 获取默认配置文件路径
pub fn default_config_path() -> Option<PathBuf> {
    giftchoice_dir().map(|dir| dir.join("config.json"))
}

/// 展开路径中的 ~ 为用户主目录
pub fn expand_tilde(path: &str) -> Option<PathBuf> {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir().map(|home| home.join(rest)),
        None => Some(PathBuf::from(path)),
    }
}
