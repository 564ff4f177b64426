use crate::config::{Config, ConfigError, ConfigResult};
use regex::{Captures, Regex};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// 配置管理器
#[derive(Clone)]
pub struct ConfigManager {
    path: PathBuf,
    config: Arc<RwLock<Config>>,
}

impl ConfigManager {
    /// 加载配置文件，不存在时写入默认配置
    pub async fn load(path: &Path) -> ConfigResult<Self> {
        let config = if path.exists() {
            info!("Loading config from {:?}", path);
            Self::read_file(path).await?
        } else {
            info!("Config file not found, creating default config at {:?}", path);
            let default_config = Config::default();
            // 确保父目录存在
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            let content = serde_json::to_string_pretty(&default_config)?;
            tokio::fs::write(path, &content).await?;
            default_config
        };

        Ok(Self {
            path: path.to_path_buf(),
            config: Arc::new(RwLock::new(config)),
        })
    }

    /// 从默认位置加载配置
    pub async fn load_default() -> ConfigResult<Self> {
        let config_path = Self::default_config_path()?;
        Self::load(&config_path).await
    }

    /// 获取默认配置路径 (~/.giftchoice/config.json)
    pub fn default_config_path() -> ConfigResult<PathBuf> {
        crate::default_config_path()
            .ok_or_else(|| ConfigError::InvalidPath("Could not find home directory".to_string()))
    }

    /// 创建一个新的配置管理器（用于测试）
    pub fn new(config: Config, path: PathBuf) -> Self {
        Self {
            path,
            config: Arc::new(RwLock::new(config)),
        }
    }

    /// 获取配置的共享引用
    pub fn get(&self) -> Arc<RwLock<Config>> {
        Arc::clone(&self.config)
    }

    /// 当前配置的副本
    pub async fn snapshot(&self) -> Config {
        self.config.read().await.clone()
    }

    /// 保存配置到文件
    pub async fn save(&self) -> ConfigResult<()> {
        self.save_to(&self.path).await?;
        info!("Config saved to {:?}", self.path);
        Ok(())
    }

    /// 保存配置到指定路径
    pub async fn save_to(&self, path: &Path) -> ConfigResult<()> {
        let config = self.config.read().await.clone();
        Self::write_file(path, &config).await
    }

    /// 重新加载配置
    pub async fn reload(&self) -> ConfigResult<()> {
        if !self.path.exists() {
            return Err(ConfigError::InvalidPath(format!(
                "Config file not found: {:?}",
                self.path
            )));
        }

        let new_config = Self::read_file(&self.path).await?;
        *self.config.write().await = new_config;

        info!("Config reloaded from {:?}", self.path);
        Ok(())
    }

    /// 更新配置并保存；验证或写入失败时内存中的配置不变
    pub async fn update<F>(&self, f: F) -> ConfigResult<()>
    where
        F: FnOnce(&mut Config) -> ConfigResult<()>,
    {
        let mut config = self.config.write().await;
        let mut candidate = config.clone();
        f(&mut candidate)?;
        Self::validate(&candidate)?;

        Self::write_file(&self.path, &candidate).await?;
        *config = candidate;
        info!("Config saved to {:?}", self.path);
        Ok(())
    }

    async fn write_file(path: &Path, config: &Config) -> ConfigResult<()> {
        let content = serde_json::to_string_pretty(config)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, content).await?;
        Ok(())
    }

    async fn read_file(path: &Path) -> ConfigResult<Config> {
        let content = tokio::fs::read_to_string(path).await?;
        let content = Self::expand_env_vars(&content)?;
        let config: Config = serde_json::from_str(&content)?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// 验证配置
    pub fn validate(config: &Config) -> ConfigResult<()> {
        if config.server.port == 0 {
            return Err(ConfigError::Validation(
                "Server port cannot be 0".to_string(),
            ));
        }

        let base_url = config.catalog.api_base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigError::Validation(
                "Catalog api_base_url cannot be empty".to_string(),
            ));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::Validation(format!(
                "Catalog api_base_url must be an http(s) URL: {}",
                base_url
            )));
        }

        if config.catalog.timeout_seconds == 0 {
            return Err(ConfigError::Validation(
                "Catalog timeout_seconds must be greater than 0".to_string(),
            ));
        }

        let number = &config.contact.whatsapp_number;
        if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::Validation(format!(
                "WhatsApp number must contain digits only: {}",
                number
            )));
        }

        if config.session.max_sessions == 0 {
            return Err(ConfigError::Validation(
                "Session max_sessions must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// 展开环境变量 ${VAR} 或 ${VAR:-default}
    pub fn expand_env_vars(content: &str) -> ConfigResult<String> {
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| ConfigError::Validation(format!("Invalid env pattern: {}", e)))?;

        let mut missing = None;
        let expanded = re.replace_all(content, |cap: &Captures| {
            let var_expr = &cap[1];

            // 处理 ${VAR:-default} 语法
            let (var_name, default_value) = match var_expr.split_once(":-") {
                Some((name, default)) => (name, Some(default)),
                None => (var_expr, None),
            };

            match (std::env::var(var_name), default_value) {
                (Ok(val), _) => val,
                (Err(_), Some(default)) => default.to_string(),
                (Err(_), None) => {
                    missing.get_or_insert_with(|| var_name.to_string());
                    String::new()
                }
            }
        });

        match missing {
            Some(var) => Err(ConfigError::EnvVarNotFound(var)),
            None => Ok(expanded.into_owned()),
        }
    }

    /// 获取配置文件路径
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_default_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.json");

        let manager = ConfigManager::load(&config_path).await.unwrap();
        let config = manager.snapshot().await;

        assert!(config_path.exists());
        assert_eq!(config.server.port, 8085);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[tokio::test]
    async fn test_load_expands_env_vars() {
        std::env::set_var("GIFTCHOICE_TEST_API", "https://shop.example/api");

        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let content = r#"{
            "version": "0.1.0",
            "catalog": {
                "api_base_url": "${GIFTCHOICE_TEST_API}",
                "timeout_seconds": ${GIFTCHOICE_TEST_TIMEOUT:-7},
                "fetch_on_start": false
            }
        }"#;
        tokio::fs::write(&config_path, content).await.unwrap();

        let config = ConfigManager::load(&config_path).await.unwrap().snapshot().await;
        assert_eq!(config.catalog.api_base_url, "https://shop.example/api");
        assert_eq!(config.catalog.timeout_seconds, 7);
        assert!(!config.catalog.fetch_on_start);
    }

    #[test]
    fn test_missing_env_var() {
        let err = ConfigManager::expand_env_vars(r#"{"key": "${GIFTCHOICE_SURELY_UNSET_VAR}"}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::EnvVarNotFound(name) if name == "GIFTCHOICE_SURELY_UNSET_VAR"));
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(ConfigManager::validate(&config).is_ok());

        config.server.port = 0;
        assert!(ConfigManager::validate(&config).is_err());
        config.server.port = 8080;

        config.catalog.api_base_url = "ftp://shop".to_string();
        assert!(ConfigManager::validate(&config).is_err());
        config.catalog.api_base_url = "https://shop.example/api".to_string();

        config.contact.whatsapp_number = "+91 79769".to_string();
        assert!(ConfigManager::validate(&config).is_err());
    }

    #[tokio::test]
    async fn test_update_persists_and_reloads() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let manager = ConfigManager::load(&config_path).await.unwrap();

        manager
            .update(|config| config.set_value("server.port", "9090"))
            .await
            .unwrap();

        let reloaded = ConfigManager::load(&config_path).await.unwrap();
        assert_eq!(reloaded.snapshot().await.server.port, 9090);
    }

    #[tokio::test]
    async fn test_invalid_update_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let manager = ConfigManager::load(&config_path).await.unwrap();

        let result = manager
            .update(|config| config.set_value("catalog.timeout_seconds", "0"))
            .await;

        assert!(result.is_err());
        assert_eq!(manager.snapshot().await.catalog.timeout_seconds, 10);
    }

    #[tokio::test]
    async fn test_failed_save_keeps_memory_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        // parent "directory" is a regular file, so the write must fail
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, "not a dir").unwrap();
        let manager = ConfigManager::new(Config::default(), blocker.join("config.json"));

        let result = manager
            .update(|config| config.set_value("server.port", "9090"))
            .await;

        assert!(matches!(result, Err(ConfigError::Io(_))));
        assert_eq!(manager.snapshot().await.server.port, 8085);
    }

    #[tokio::test]
    async fn test_reload_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::new(Config::default(), temp_dir.path().join("gone.json"));
        assert!(matches!(manager.reload().await, Err(ConfigError::InvalidPath(_))));
    }
}
