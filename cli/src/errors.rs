use thiserror::Error;

/// Structured error types for the calendar client
#[derive(Error, Debug)]
pub enum CalendarError {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The OAuth client secret file is required for live mode
    #[error("Client secret not found at '{path}': download an OAuth desktop client JSON and place it there")]
    MissingClientSecret { path: String },

    /// Authorization flow errors
    #[error("Authorization error: {message}")]
    Authorization { message: String },

    /// The consent flow did not complete in time
    #[error("Authorization error: no browser callback received within {timeout_seconds}s")]
    AuthorizationTimeout { timeout_seconds: u64 },

    /// Calendar API answered with a non-success status
    #[error("API error: Google Calendar returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Network connectivity errors
    #[error("Network error: {message}")]
    Network { message: String },

    /// File system errors
    #[error("File system error: {operation} failed for path '{path}': {message}")]
    FileSystem {
        operation: String,
        path: String,
        message: String,
    },

    /// Parsing errors (JSON, TOML, URLs)
    #[error("Parsing error: Failed to parse {format}: {message}")]
    Parsing { format: String, message: String },

    /// Validation errors
    #[error("Validation error: {field} is invalid: {message}")]
    Validation { field: String, message: String },
}

/// Result type alias using CalendarError
pub type CalendarResult<T> = std::result::Result<T, CalendarError>;

impl CalendarError {
    pub fn file_system(operation: &str, path: &std::path::Path, error: std::io::Error) -> Self {
        Self::FileSystem {
            operation: operation.to_string(),
            path: path.display().to_string(),
            message: error.to_string(),
        }
    }

    pub fn authorization(message: impl Into<String>) -> Self {
        Self::Authorization {
            message: message.into(),
        }
    }
}

/// Convert std::io::Error to CalendarError
impl From<std::io::Error> for CalendarError {
    fn from(error: std::io::Error) -> Self {
        Self::FileSystem {
            operation: "io".to_string(),
            path: "unknown".to_string(),
            message: error.to_string(),
        }
    }
}

/// Convert serde_json::Error to CalendarError
impl From<serde_json::Error> for CalendarError {
    fn from(error: serde_json::Error) -> Self {
        Self::Parsing {
            format: "JSON".to_string(),
            message: error.to_string(),
        }
    }
}

/// Convert toml::de::Error to CalendarError
impl From<toml::de::Error> for CalendarError {
    fn from(error: toml::de::Error) -> Self {
        Self::Parsing {
            format: "TOML".to_string(),
            message: error.to_string(),
        }
    }
}

impl From<reqwest::Error> for CalendarError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_connect() {
            Self::Network {
                message: format!("Connection failed: {}", error),
            }
        } else if error.is_timeout() {
            Self::Network {
                message: format!("Request timed out: {}", error),
            }
        } else {
            Self::Network {
                message: error.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_message_includes_status() {
        let err = CalendarError::Api {
            status: 401,
            message: "Invalid Credentials".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API error: Google Calendar returned 401: Invalid Credentials"
        );
    }

    #[test]
    fn test_json_error_maps_to_parsing() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        match CalendarError::from(json_err) {
            CalendarError::Parsing { format, .. } => assert_eq!(format, "JSON"),
            other => panic!("unexpected variant: {:?}", other),
        }
    }
}
