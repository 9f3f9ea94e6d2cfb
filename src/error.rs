//! Error types for FritzBox Exporter application

use thiserror::Error;

/// TR-064 fault code returned by enumeration actions when the requested
/// index is past the last entry. This is the normal pagination terminator,
/// not a failure.
pub const FAULT_INDEX_OUT_OF_RANGE: u32 = 713;

/// Main application error type
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network or IO error
    #[error("IO error")]
    Io(#[from] std::io::Error),

    /// Unexpected HTTP status from the router
    #[error("HTTP error: status {0}")]
    Http(u16),

    /// Digest authentication failed or was rejected
    #[error("Authentication error: {0}")]
    Auth(String),

    /// SOAP fault reported by the router
    #[error("SOAP fault {code}: {description}")]
    Soap { code: u32, description: String },

    /// Malformed response body or description document
    #[error("Parse error: {0}")]
    Parse(String),

    /// Request did not complete within the configured timeout
    #[error("Timeout talking to the router")]
    Timeout,
}

impl AppError {
    /// True for the SOAP fault that terminates host enumeration.
    ///
    /// Callers paging through `Hosts1.GetGenericHostEntry` must treat this
    /// as end-of-list; every other error aborts the aggregate.
    #[must_use]
    pub fn is_index_out_of_range(&self) -> bool {
        matches!(
            self,
            AppError::Soap {
                code: FAULT_INDEX_OUT_OF_RANGE,
                ..
            }
        )
    }
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        AppError::Timeout
    }
}

/// Convenient alias for Result with application error
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error() {
        let err = AppError::Config("test error".to_string());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_soap_fault_display() {
        let err = AppError::Soap {
            code: 401,
            description: "Invalid Action".to_string(),
        };
        assert_eq!(err.to_string(), "SOAP fault 401: Invalid Action");
    }

    #[test]
    fn test_index_out_of_range_detection() {
        let end = AppError::Soap {
            code: FAULT_INDEX_OUT_OF_RANGE,
            description: "SpecifiedArrayIndexInvalid".to_string(),
        };
        assert!(end.is_index_out_of_range());

        let other = AppError::Soap {
            code: 714,
            description: "NoSuchEntryInArray".to_string(),
        };
        assert!(!other.is_index_out_of_range());

        assert!(!AppError::Timeout.is_index_out_of_range());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
    }

    #[test]
    fn test_http_error_display() {
        let err = AppError::Http(500);
        assert_eq!(err.to_string(), "HTTP error: status 500");
    }
}
