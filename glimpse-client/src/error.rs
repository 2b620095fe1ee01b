/// Error types for the Glimpse client core
///
/// Every operation surfaces a typed error so callers can tell a rejected
/// input from a missing resource from a transport failure. Compensating
/// cleanup failures are carried alongside the error that triggered the
/// cleanup, never in place of it.
use std::fmt;

/// Result type for client core operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Debug)]
pub enum AppError {
    /// Input rejected before any remote call was made
    Validation(String),

    /// Required argument missing or empty
    InvalidArgument(String),

    /// Media object upload failed
    Upload(String),

    /// Preview URL derivation failed
    Preview(String),

    /// Document create or update failed
    Write(String),

    /// Resource not found
    NotFound(String),

    /// Credentials or session rejected
    Unauthorized(String),

    /// Duplicate resource
    Conflict(String),

    /// Remote call exceeded its deadline
    Timeout(String),

    /// Backend transport or query failure
    Backend(String),

    /// A compensating delete failed after the source error; an orphaned
    /// object remains in storage
    Cleanup {
        source: Box<AppError>,
        detail: String,
    },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            AppError::Upload(msg) => write!(f, "Upload error: {}", msg),
            AppError::Preview(msg) => write!(f, "Preview error: {}", msg),
            AppError::Write(msg) => write!(f, "Write error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Timeout(msg) => write!(f, "Timeout: {}", msg),
            AppError::Backend(msg) => write!(f, "Backend error: {}", msg),
            AppError::Cleanup { source, detail } => {
                write!(f, "{} (cleanup failed, orphaned: {})", source, detail)
            }
        }
    }
}

impl std::error::Error for AppError {}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleanup_display_carries_both_errors() {
        let err = AppError::Cleanup {
            source: Box::new(AppError::Write("insert rejected".to_string())),
            detail: "object obj-1: delete failed".to_string(),
        };

        let rendered = err.to_string();
        assert!(rendered.contains("insert rejected"));
        assert!(rendered.contains("obj-1"));
    }

    #[test]
    fn test_validation_errors_convert() {
        use validator::Validate;

        #[derive(Validate)]
        struct Probe {
            #[validate(length(min = 5))]
            caption: String,
        }

        let probe = Probe {
            caption: "hi".to_string(),
        };
        let err: AppError = probe.validate().unwrap_err().into();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
