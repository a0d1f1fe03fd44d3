use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{LinkshelfError, Result};
use crate::i18n::Locale;

/// 应用配置（从 TOML + 环境变量加载，启动时使用）
///
/// 包含：
/// - locale: 面向用户的消息语言
/// - server: 服务器地址、端口、CPU 数量
/// - database: 数据库连接与重试配置
/// - logging: 日志配置
/// - media: 图片服务商（Cloudinary）与上传限制
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub locale: Locale,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub media: MediaConfig,
}

impl AppConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config.toml > 默认值
    /// ENV 前缀：LS，分隔符：__
    /// 示例：LS__MEDIA__CLOUD_NAME=demo
    ///
    /// 加载后立即校验，缺失的必填项直接返回错误，不存在任何内置的回退凭据。
    pub fn load(path: &str) -> Result<Self> {
        use config::{Config, Environment, File};

        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("LS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        if Path::new(path).exists() {
            eprintln!("[INFO] Configuration loaded from: {}", path);
        }

        config.validate()?;
        Ok(config)
    }

    /// 校验必填项与取值范围
    pub fn validate(&self) -> Result<()> {
        self.media.validate()?;

        if self.database.database_url.trim().is_empty() {
            return Err(LinkshelfError::config("database.database_url is required"));
        }
        if self.server.cpu_count == 0 {
            return Err(LinkshelfError::config("server.cpu_count must be at least 1"));
        }

        Ok(())
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let mut sample_config = Self::default();
        sample_config.media.cloud_name = "your-cloud-name".to_string();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
}

/// 数据库连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_database_pool_size")]
    pub pool_size: u32,
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
    #[serde(default = "default_retry_max_delay_ms")]
    pub retry_max_delay_ms: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

/// 图片服务商配置
///
/// `cloud_name` 必填。`api_key` / `api_secret` 要么同时配置，要么都不配置；
/// 都不配置时上传不可用，删除为空操作。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    #[serde(default)]
    pub cloud_name: String,
    #[serde(default = "default_cdn_host")]
    pub cdn_host: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_secret: Option<String>,
    #[serde(default = "default_max_files")]
    pub max_files: usize,
    #[serde(default = "default_max_concurrent_uploads")]
    pub max_concurrent_uploads: usize,
    #[serde(default = "default_upload_timeout_secs")]
    pub upload_timeout_secs: u64,
    /// 单个文件大小上限（字节）
    #[serde(default = "default_max_file_size")]
    pub max_file_size: usize,
}

impl MediaConfig {
    pub fn validate(&self) -> Result<()> {
        if self.cloud_name.trim().is_empty() {
            return Err(LinkshelfError::config(
                "media.cloud_name is required (set LS__MEDIA__CLOUD_NAME or [media] cloud_name)",
            ));
        }
        if self.cdn_host.trim().is_empty() {
            return Err(LinkshelfError::config("media.cdn_host must not be empty"));
        }

        let has_key = self.api_key.as_deref().is_some_and(|k| !k.is_empty());
        let has_secret = self.api_secret.as_deref().is_some_and(|s| !s.is_empty());
        if has_key != has_secret {
            return Err(LinkshelfError::config(
                "media.api_key and media.api_secret must be configured together",
            ));
        }

        if self.max_files == 0 || self.max_concurrent_uploads == 0 {
            return Err(LinkshelfError::config(
                "media.max_files and media.max_concurrent_uploads must be at least 1",
            ));
        }
        if self.upload_timeout_secs == 0 {
            return Err(LinkshelfError::config(
                "media.upload_timeout_secs must be at least 1",
            ));
        }

        Ok(())
    }

    /// 返回已配置的凭据（二者都存在时）
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.api_key.as_deref(), self.api_secret.as_deref()) {
            (Some(key), Some(secret)) if !key.is_empty() && !secret.is_empty() => {
                Some((key, secret))
            }
            _ => None,
        }
    }
}

// ============================================================
// Default value functions
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_database_url() -> String {
    "sqlite://linkshelf.db?mode=rwc".to_string()
}

fn default_database_pool_size() -> u32 {
    10
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    100
}

fn default_retry_max_delay_ms() -> u64 {
    2000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

fn default_cdn_host() -> String {
    "res.cloudinary.com".to_string()
}

fn default_api_base_url() -> String {
    "https://api.cloudinary.com".to_string()
}

fn default_max_files() -> usize {
    5
}

fn default_max_concurrent_uploads() -> usize {
    4
}

fn default_upload_timeout_secs() -> u64 {
    30
}

fn default_max_file_size() -> usize {
    10 * 1024 * 1024
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            pool_size: default_database_pool_size(),
            retry_count: default_retry_count(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            retry_max_delay_ms: default_retry_max_delay_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            cloud_name: String::new(),
            cdn_host: default_cdn_host(),
            api_base_url: default_api_base_url(),
            api_key: None,
            api_secret: None,
            max_files: default_max_files(),
            max_concurrent_uploads: default_max_concurrent_uploads(),
            upload_timeout_secs: default_upload_timeout_secs(),
            max_file_size: default_max_file_size(),
        }
    }
}
