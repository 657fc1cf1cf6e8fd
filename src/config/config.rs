use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// 存储后端类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// 进程内存储，重启后数据丢失
    #[default]
    Memory,
    /// SurrealDB 远程存储
    SurrealDb,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Memory => write!(f, "memory"),
            StorageBackend::SurrealDb => write!(f, "surrealdb"),
        }
    }
}

/// 存储配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// 后端类型
    pub backend: StorageBackend,
    /// SurrealDB 连接地址
    pub url: String,
    /// 命名空间
    pub namespace: String,
    /// 数据库名称
    pub database: String,
    /// 用户名
    pub username: String,
    /// 密码
    pub password: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            url: "http://localhost:8000".into(),
            namespace: "shop".into(),
            database: "products".into(),
            username: "root".into(),
            password: "root".into(),
        }
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 服务地址
    pub host: String,
    /// 服务端口
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: String,
    /// 结构化日志格式
    pub structured: bool,
    /// 日志文件路径，为空时输出到标准输出
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            structured: false,
            log_dir: None,
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 服务器配置
    pub server: ServerConfig,
    /// 存储配置
    pub storage: StorageConfig,
    /// 日志配置
    pub logging: LoggingConfig,
    /// 应用名称
    pub app_name: String,
    /// 环境
    pub environment: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::development()
    }
}

impl AppConfig {
    /// 创建开发环境配置
    pub fn development() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            logging: LoggingConfig {
                level: "debug".into(),
                structured: false,
                log_dir: None,
            },
            app_name: "product-service".into(),
            environment: "development".into(),
        }
    }

    /// 创建生产环境配置
    pub fn production() -> Self {
        let mut config = Self::development();
        config.environment = "production".into();
        config.storage.backend = StorageBackend::SurrealDb;
        config.logging.level = "info".into();
        config.logging.structured = true;
        config.logging.log_dir = Some(PathBuf::from("./logs"));
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_overrides_development() {
        let dev = AppConfig::development();
        let prod = AppConfig::production();

        assert_eq!(dev.storage.backend, StorageBackend::Memory);
        assert_eq!(prod.storage.backend, StorageBackend::SurrealDb);
        assert_eq!(prod.logging.level, "info");
        assert!(prod.logging.structured);
        assert_eq!(prod.server.port, dev.server.port);
    }

    #[test]
    fn test_storage_backend_names() {
        assert_eq!(StorageBackend::SurrealDb.to_string(), "surrealdb");
        let parsed: StorageBackend = serde_json::from_str("\"surrealdb\"").unwrap();
        assert_eq!(parsed, StorageBackend::SurrealDb);
    }
}
