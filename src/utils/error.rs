use thiserror::Error;

#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("HTTP {status} returned by {url}")]
    HttpStatusError { url: String, status: u16 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Element not found: {region} (step: {step})")]
    ElementNotFound { region: String, step: String },

    #[error("Render error: {message}")]
    RenderError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown encoding label: {label}")]
    UnknownEncodingError { label: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    PageStructure,
    Configuration,
    Io,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SummaryError {
    pub fn element_not_found(region: impl Into<String>, step: impl Into<String>) -> Self {
        SummaryError::ElementNotFound {
            region: region.into(),
            step: step.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            SummaryError::HttpError(_) | SummaryError::HttpStatusError { .. } => {
                ErrorCategory::Network
            }
            SummaryError::ElementNotFound { .. } | SummaryError::RenderError { .. } => {
                ErrorCategory::PageStructure
            }
            SummaryError::ConfigError { .. }
            | SummaryError::MissingConfigError { .. }
            | SummaryError::InvalidConfigValueError { .. }
            | SummaryError::UnknownEncodingError { .. } => ErrorCategory::Configuration,
            SummaryError::IoError(_) => ErrorCategory::Io,
            SummaryError::SerializationError(_) => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::PageStructure | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io | ErrorCategory::Internal => ErrorSeverity::Critical,
        }
    }

    /// 依錯誤類別決定的程序結束碼
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::PageStructure | ErrorCategory::Configuration => 1,
            ErrorCategory::Network => 2,
            ErrorCategory::Io | ErrorCategory::Internal => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            SummaryError::HttpError(_) => {
                "Check network connectivity and that the brokerage site is reachable".to_string()
            }
            SummaryError::HttpStatusError { status, .. } if *status == 401 || *status == 403 => {
                "The session cookie is missing or expired; log in again and refresh it".to_string()
            }
            SummaryError::HttpStatusError { .. } => {
                "Verify the page and orders URLs are correct".to_string()
            }
            SummaryError::ElementNotFound { region, .. } => format!(
                "The page layout may have changed; inspect the '{}' region of the saved page",
                region
            ),
            SummaryError::RenderError { .. } => {
                "The located anchor table cannot take a sibling; check the page structure"
                    .to_string()
            }
            SummaryError::IoError(_) => {
                "Check file paths and permissions for the page and output directory".to_string()
            }
            SummaryError::UnknownEncodingError { .. } => {
                "Use a WHATWG encoding label such as Shift_JIS or EUC-JP".to_string()
            }
            SummaryError::ConfigError { .. }
            | SummaryError::MissingConfigError { .. }
            | SummaryError::InvalidConfigValueError { .. } => {
                "Review the config file and command-line options".to_string()
            }
            SummaryError::SerializationError(_) => "Please report this as a bug".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not download a page: {}", self),
            ErrorCategory::PageStructure => format!("Unexpected page structure: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Io => format!("File access failed: {}", self),
            ErrorCategory::Internal => format!("Internal error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, SummaryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_not_found_names_region() {
        let err = SummaryError::element_not_found("fund table", "caption '投資信託'");
        assert_eq!(
            err.to_string(),
            "Element not found: fund table (step: caption '投資信託')"
        );
        assert_eq!(err.category(), ErrorCategory::PageStructure);
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_status_error_suggests_login_on_forbidden() {
        let err = SummaryError::HttpStatusError {
            url: "https://example.com/orders".to_string(),
            status: 403,
        };
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(err.exit_code(), 2);
        assert!(err.recovery_suggestion().contains("cookie"));
    }
}
