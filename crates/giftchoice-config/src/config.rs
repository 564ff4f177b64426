use giftchoice_core::StoreContact;
use serde::{Deserialize, Serialize};

/// 主配置结构体
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub version: String,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub contact: ContactConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            server: ServerConfig::default(),
            catalog: CatalogConfig::default(),
            contact: ContactConfig::default(),
            session: SessionConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// 获取配置值的快捷方法
    pub fn get_value(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();
        match parts.as_slice() {
            ["version"] => Some(self.version.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),
            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "cors"] => Some(self.server.cors.to_string()),
            ["catalog", "api_base_url"] => Some(self.catalog.api_base_url.clone()),
            ["catalog", "timeout_seconds"] => Some(self.catalog.timeout_seconds.to_string()),
            ["catalog", "fetch_on_start"] => Some(self.catalog.fetch_on_start.to_string()),
            ["contact", "whatsapp_number"] => Some(self.contact.whatsapp_number.clone()),
            ["contact", "phone"] => Some(self.contact.phone.clone()),
            ["contact", "address"] => Some(self.contact.address.clone()),
            ["session", "max_sessions"] => Some(self.session.max_sessions.to_string()),
            ["session", "idle_timeout_secs"] => Some(self.session.idle_timeout_secs.to_string()),
            ["logging", "level"] => Some(self.logging.level.to_string()),
            ["logging", "json_format"] => Some(self.logging.json_format.to_string()),
            ["logging", "file"] => self.logging.file.clone(),
            _ => None,
        }
    }

    /// 设置配置值
    pub fn set_value(&mut self, key: &str, value: &str) -> ConfigResult<()> {
        let parts: Vec<&str> = key.split('.').collect();
        match parts.as_slice() {
            ["server", "port"] => {
                self.server.port = value.parse().map_err(|_| {
                    ConfigError::Validation(format!("Invalid port number: {}", value))
                })?;
            }
            ["server", "host"] => {
                self.server.host = value.to_string();
            }
            ["server", "cors"] => {
                self.server.cors = parse_bool(value)?;
            }
            ["catalog", "api_base_url"] => {
                self.catalog.api_base_url = value.to_string();
            }
            ["catalog", "timeout_seconds"] => {
                self.catalog.timeout_seconds = parse_number(value)?;
            }
            ["catalog", "fetch_on_start"] => {
                self.catalog.fetch_on_start = parse_bool(value)?;
            }
            ["contact", "whatsapp_number"] => {
                self.contact.whatsapp_number = value.to_string();
            }
            ["contact", "phone"] => {
                self.contact.phone = value.to_string();
            }
            ["contact", "address"] => {
                self.contact.address = value.to_string();
            }
            ["session", "max_sessions"] => {
                self.session.max_sessions = parse_number(value)?;
            }
            ["session", "idle_timeout_secs"] => {
                self.session.idle_timeout_secs = parse_number(value)?;
            }
            ["logging", "level"] => {
                self.logging.level = value.parse()?;
            }
            ["logging", "json_format"] => {
                self.logging.json_format = parse_bool(value)?;
            }
            ["logging", "file"] => {
                self.logging.file = Some(value.to_string());
            }
            _ => return Err(ConfigError::KeyNotFound(key.to_string())),
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> ConfigResult<bool> {
    value
        .parse()
        .map_err(|_| ConfigError::Validation(format!("Invalid boolean: {}", value)))
}

fn parse_number<T: std::str::FromStr>(value: &str) -> ConfigResult<T> {
    value
        .parse()
        .map_err(|_| ConfigError::Validation(format!("Invalid number: {}", value)))
}

/// Server 配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8085,
            host: "127.0.0.1".to_string(),
            cors: true,
        }
    }
}

/// 商品目录配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogConfig {
    /// 商城后端 API 地址，商品列表为 `{api_base_url}/products`
    pub api_base_url: String,
    /// 请求超时（秒）
    pub timeout_seconds: u64,
    /// 启动时拉取一次商品
    pub fetch_on_start: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000/api".to_string(),
            timeout_seconds: 10,
            fetch_on_start: true,
        }
    }
}

/// 店铺联系方式
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContactConfig {
    /// WhatsApp 号码，仅数字，含国家代码
    pub whatsapp_number: String,
    pub phone: String,
    pub address: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        let contact = StoreContact::default();
        Self {
            whatsapp_number: contact.whatsapp_number,
            phone: contact.phone,
            address: contact.address,
        }
    }
}

impl From<&ContactConfig> for StoreContact {
    fn from(config: &ContactConfig) -> Self {
        StoreContact {
            whatsapp_number: config.whatsapp_number.clone(),
            phone: config.phone.clone(),
            address: config.address.clone(),
        }
    }
}

/// 会话配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionConfig {
    pub max_sessions: usize,
    pub idle_timeout_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_sessions: 1000,
            idle_timeout_secs: 1800,
        }
    }
}

/// 日志级别
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> ConfigResult<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::Validation(format!("Invalid log level: {}", s))),
        }
    }
}

/// Logging 配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    pub level: LogLevel,
    #[serde(default)]
    pub json_format: bool,
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            json_format: false,
            file: None,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 8085);
        assert_eq!(config.contact.whatsapp_number, "917976948872");
        assert!(config.catalog.fetch_on_start);
    }

    #[test]
    fn test_get_and_set_value() {
        let mut config = Config::default();

        config.set_value("server.port", "9000").unwrap();
        config.set_value("catalog.api_base_url", "https://shop.example/api").unwrap();
        config.set_value("logging.level", "WARNING").unwrap();

        assert_eq!(config.get_value("server.port").as_deref(), Some("9000"));
        assert_eq!(
            config.get_value("catalog.api_base_url").as_deref(),
            Some("https://shop.example/api")
        );
        assert_eq!(config.get_value("logging.level").as_deref(), Some("warn"));
        assert_eq!(config.get_value("logging.file"), None);
    }

    #[test]
    fn test_set_value_errors() {
        let mut config = Config::default();
        assert!(matches!(
            config.set_value("server.port", "not-a-port"),
            Err(ConfigError::Validation(_))
        ));
        assert!(matches!(
            config.set_value("server.nope", "1"),
            Err(ConfigError::KeyNotFound(_))
        ));
    }

    #[test]
    fn test_partial_file_uses_section_defaults() {
        let config: Config = serde_json::from_str(r#"{"version": "0.1.0"}"#).unwrap();
        assert_eq!(config.server, ServerConfig::default());
        assert_eq!(config.contact, ContactConfig::default());
    }

    #[test]
    fn test_contact_conversion() {
        let mut config = ContactConfig::default();
        config.phone = "+1 555 0100".to_string();

        let contact = StoreContact::from(&config);
        assert_eq!(contact.phone, "+1 555 0100");
        assert_eq!(contact.whatsapp_number, "917976948872");
    }
}
