use std::fmt;

#[derive(Debug, Clone)]
pub enum LinkshelfError {
    NotFound(String),
    Internal(String),
    UploadFailed(String),
    InvalidReference(String),
    Validation(String),
    Config(String),
    ProviderUnavailable(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    Provider(String),
}

impl LinkshelfError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            LinkshelfError::NotFound(_) => "E001",
            LinkshelfError::Internal(_) => "E002",
            LinkshelfError::UploadFailed(_) => "E003",
            LinkshelfError::InvalidReference(_) => "E004",
            LinkshelfError::Validation(_) => "E005",
            LinkshelfError::Config(_) => "E006",
            LinkshelfError::ProviderUnavailable(_) => "E007",
            LinkshelfError::DatabaseConnection(_) => "E008",
            LinkshelfError::DatabaseOperation(_) => "E009",
            LinkshelfError::Provider(_) => "E010",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            LinkshelfError::NotFound(_) => "Resource Not Found",
            LinkshelfError::Internal(_) => "Internal Error",
            LinkshelfError::UploadFailed(_) => "Upload Failed",
            LinkshelfError::InvalidReference(_) => "Invalid Image Reference",
            LinkshelfError::Validation(_) => "Validation Error",
            LinkshelfError::Config(_) => "Configuration Error",
            LinkshelfError::ProviderUnavailable(_) => "Provider Not Configured",
            LinkshelfError::DatabaseConnection(_) => "Database Connection Error",
            LinkshelfError::DatabaseOperation(_) => "Database Operation Error",
            LinkshelfError::Provider(_) => "Provider Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            LinkshelfError::NotFound(msg)
            | LinkshelfError::Internal(msg)
            | LinkshelfError::UploadFailed(msg)
            | LinkshelfError::InvalidReference(msg)
            | LinkshelfError::Validation(msg)
            | LinkshelfError::Config(msg)
            | LinkshelfError::ProviderUnavailable(msg)
            | LinkshelfError::DatabaseConnection(msg)
            | LinkshelfError::DatabaseOperation(msg)
            | LinkshelfError::Provider(msg) => msg,
        }
    }

    /// 格式化为彩色输出（用于启动失败时的终端输出）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于日志和 CLI）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for LinkshelfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for LinkshelfError {}

// 便捷的构造函数
impl LinkshelfError {
    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        LinkshelfError::NotFound(msg.into())
    }

    pub fn internal<T: Into<String>>(msg: T) -> Self {
        LinkshelfError::Internal(msg.into())
    }

    pub fn upload_failed<T: Into<String>>(msg: T) -> Self {
        LinkshelfError::UploadFailed(msg.into())
    }

    pub fn invalid_reference<T: Into<String>>(msg: T) -> Self {
        LinkshelfError::InvalidReference(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        LinkshelfError::Validation(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        LinkshelfError::Config(msg.into())
    }

    pub fn provider_unavailable<T: Into<String>>(msg: T) -> Self {
        LinkshelfError::ProviderUnavailable(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        LinkshelfError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        LinkshelfError::DatabaseOperation(msg.into())
    }

    pub fn provider<T: Into<String>>(msg: T) -> Self {
        LinkshelfError::Provider(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for LinkshelfError {
    fn from(err: sea_orm::DbErr) -> Self {
        LinkshelfError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for LinkshelfError {
    fn from(err: std::io::Error) -> Self {
        LinkshelfError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for LinkshelfError {
    fn from(err: serde_json::Error) -> Self {
        LinkshelfError::Internal(err.to_string())
    }
}

impl From<reqwest::Error> for LinkshelfError {
    fn from(err: reqwest::Error) -> Self {
        LinkshelfError::Provider(err.to_string())
    }
}

impl From<config::ConfigError> for LinkshelfError {
    fn from(err: config::ConfigError) -> Self {
        LinkshelfError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LinkshelfError>;
