use std::fmt;

#[derive(Debug, Clone)]
pub enum DashboardError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    Validation(String),
    NotFound(String),
    Serialization(String),
    DateParse(String),
    UnknownMetricKind(String),
    UnknownMeasure(String),
    InvalidDateRange(String),
}

impl DashboardError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            DashboardError::DatabaseConfig(_) => "E001",
            DashboardError::DatabaseConnection(_) => "E002",
            DashboardError::DatabaseOperation(_) => "E003",
            DashboardError::FileOperation(_) => "E004",
            DashboardError::Validation(_) => "E005",
            DashboardError::NotFound(_) => "E006",
            DashboardError::Serialization(_) => "E007",
            DashboardError::DateParse(_) => "E008",
            DashboardError::UnknownMetricKind(_) => "E009",
            DashboardError::UnknownMeasure(_) => "E010",
            DashboardError::InvalidDateRange(_) => "E011",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            DashboardError::DatabaseConfig(_) => "Database Configuration Error",
            DashboardError::DatabaseConnection(_) => "Database Connection Error",
            DashboardError::DatabaseOperation(_) => "Database Operation Error",
            DashboardError::FileOperation(_) => "File Operation Error",
            DashboardError::Validation(_) => "Validation Error",
            DashboardError::NotFound(_) => "Resource Not Found",
            DashboardError::Serialization(_) => "Serialization Error",
            DashboardError::DateParse(_) => "Date Parse Error",
            DashboardError::UnknownMetricKind(_) => "Unknown Metric Kind",
            DashboardError::UnknownMeasure(_) => "Unknown Measure",
            DashboardError::InvalidDateRange(_) => "Invalid Date Range",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            DashboardError::DatabaseConfig(msg)
            | DashboardError::DatabaseConnection(msg)
            | DashboardError::DatabaseOperation(msg)
            | DashboardError::FileOperation(msg)
            | DashboardError::Validation(msg)
            | DashboardError::NotFound(msg)
            | DashboardError::Serialization(msg)
            | DashboardError::DateParse(msg)
            | DashboardError::UnknownMetricKind(msg)
            | DashboardError::UnknownMeasure(msg)
            | DashboardError::InvalidDateRange(msg) => msg,
        }
    }

    /// 映射到 HTTP 状态码
    #[cfg(feature = "server")]
    pub fn http_status(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;
        match self {
            DashboardError::Validation(_)
            | DashboardError::DateParse(_)
            | DashboardError::UnknownMetricKind(_)
            | DashboardError::UnknownMeasure(_)
            | DashboardError::InvalidDateRange(_) => StatusCode::BAD_REQUEST,
            DashboardError::NotFound(_) => StatusCode::NOT_FOUND,
            DashboardError::DatabaseConnection(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于 Server 模式）
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

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for DashboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for DashboardError {}

// 便捷的构造函数
impl DashboardError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        DashboardError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        DashboardError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        DashboardError::DatabaseOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        DashboardError::FileOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        DashboardError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        DashboardError::NotFound(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        DashboardError::Serialization(msg.into())
    }

    pub fn date_parse<T: Into<String>>(msg: T) -> Self {
        DashboardError::DateParse(msg.into())
    }

    pub fn unknown_metric_kind<T: Into<String>>(msg: T) -> Self {
        DashboardError::UnknownMetricKind(msg.into())
    }

    pub fn unknown_measure<T: Into<String>>(msg: T) -> Self {
        DashboardError::UnknownMeasure(msg.into())
    }

    pub fn invalid_date_range<T: Into<String>>(msg: T) -> Self {
        DashboardError::InvalidDateRange(msg.into())
    }
}

impl From<sea_orm::DbErr> for DashboardError {
    fn from(err: sea_orm::DbErr) -> Self {
        DashboardError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for DashboardError {
    fn from(err: std::io::Error) -> Self {
        DashboardError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        DashboardError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for DashboardError {
    fn from(err: chrono::ParseError) -> Self {
        DashboardError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
