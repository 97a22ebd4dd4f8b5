use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Snapshot source error: {message}")]
    SourceError { message: String },

    #[error("Invalid timestamp '{value}': expected RFC 3339 or YYYY-MM-DD")]
    InvalidTimestamp { value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Io,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// 程序結束碼，一律非 0
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorSeverity::Medium => 2, // 可重試
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl DashboardError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DashboardError::ApiError(_) | DashboardError::SourceError { .. } => {
                ErrorCategory::Network
            }
            DashboardError::CsvError(_) | DashboardError::SerializationError(_) => {
                ErrorCategory::Data
            }
            DashboardError::IoError(_) => ErrorCategory::Io,
            DashboardError::ConfigError { .. }
            | DashboardError::MissingConfigError { .. }
            | DashboardError::InvalidConfigValueError { .. }
            | DashboardError::ConfigValidationError { .. }
            | DashboardError::InvalidTimestamp { .. } => ErrorCategory::Configuration,
        }
    }

    /// 嚴重程度，CLI 依此決定退出碼
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 後端暫時不可用，重試即可
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            DashboardError::ApiError(_) => "Could not reach the project backend".to_string(),
            DashboardError::SourceError { message } => {
                format!("The project backend rejected the request: {}", message)
            }
            DashboardError::CsvError(_) => "Failed to write the CSV report".to_string(),
            DashboardError::SerializationError(e) => {
                format!("The snapshot or report is not valid JSON: {}", e)
            }
            DashboardError::IoError(e) => format!("File system error: {}", e),
            DashboardError::ConfigError { message } => message.clone(),
            DashboardError::MissingConfigError { field } => {
                format!("Required setting '{}' is missing", field)
            }
            DashboardError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            DashboardError::ConfigValidationError { field, message } => {
                format!("Setting '{}' could not be read: {}", field, message)
            }
            DashboardError::InvalidTimestamp { value } => {
                format!("'{}' is not a valid date or timestamp", value)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            DashboardError::ApiError(_) => "Check the endpoint URL and your network connection",
            DashboardError::SourceError { .. } => {
                "Check the API key headers and the owner id, then retry"
            }
            DashboardError::CsvError(_) | DashboardError::IoError(_) => {
                "Make sure the output directory exists and is writable"
            }
            DashboardError::SerializationError(_) => {
                "Re-export the snapshot file from the backend"
            }
            DashboardError::ConfigError { .. }
            | DashboardError::MissingConfigError { .. }
            | DashboardError::InvalidConfigValueError { .. }
            | DashboardError::ConfigValidationError { .. } => {
                "Review the configuration file and command line flags"
            }
            DashboardError::InvalidTimestamp { .. } => {
                "Use a date like 2024-06-01 or a timestamp like 2024-06-01T00:00:00Z"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
