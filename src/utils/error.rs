use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Usage error: {message}")]
    UsageError { message: String },

    #[error("Terminal operation '{operation}' failed: {source}")]
    PtyError {
        operation: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not open '{url}' in a browser: {source}")]
    BrowserError {
        url: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    FileSystem,
    Configuration,
    Usage,
    System,
}

impl ToolError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ToolError::HttpError(_) => ErrorCategory::Network,
            ToolError::IoError(_) => ErrorCategory::FileSystem,
            ToolError::UrlError(_)
            | ToolError::ConfigError { .. }
            | ToolError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            ToolError::UsageError { .. } => ErrorCategory::Usage,
            ToolError::PtyError { .. } | ToolError::BrowserError { .. } => ErrorCategory::System,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ToolError::HttpError(e) if e.is_timeout() => "The request timed out".to_string(),
            ToolError::HttpError(e) if e.is_connect() => "Could not connect to the server".to_string(),
            ToolError::IoError(e) if e.kind() == std::io::ErrorKind::NotFound => {
                "A required file was not found".to_string()
            }
            ToolError::IoError(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                "Permission denied while accessing a file".to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check your network connection and that the URL is reachable",
            ErrorCategory::FileSystem => "Check that the path exists and that you have permission to use it",
            ErrorCategory::Configuration => "Check the settings file and any ${VAR} references it uses",
            ErrorCategory::Usage => "Run the command with --help to see how to use it",
            ErrorCategory::System => "Check that the system supports the requested operation",
        }
    }
}

#[cfg(unix)]
impl ToolError {
    pub fn pty(operation: &'static str, errno: nix::errno::Errno) -> Self {
        ToolError::PtyError {
            operation,
            source: std::io::Error::from(errno),
        }
    }
}

pub type Result<T> = std::result::Result<T, ToolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        let io = ToolError::IoError(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        assert_eq!(io.category(), ErrorCategory::FileSystem);
        assert_eq!(io.user_friendly_message(), "A required file was not found");

        let usage = ToolError::UsageError {
            message: "count must be a number".to_string(),
        };
        assert_eq!(usage.category(), ErrorCategory::Usage);
        assert!(usage.recovery_suggestion().contains("--help"));
    }

    #[test]
    fn test_invalid_value_message() {
        let err = ToolError::InvalidConfigValueError {
            field: "bookmarks.delay_ms".to_string(),
            value: "999999".to_string(),
            reason: "Value must be between 0 and 60000".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid value for 'bookmarks.delay_ms': 999999 (Value must be between 0 and 60000)"
        );
    }
}
