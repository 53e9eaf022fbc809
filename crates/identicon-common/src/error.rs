//! Error types for the identicon crates.

use thiserror::Error;

/// Result type alias using IdenticonError.
pub type IdenticonResult<T> = Result<T, IdenticonError>;

/// Primary error type for identicon operations.
///
/// Decoding a code never fails, so there is no variant for it.
#[derive(Debug, Error)]
pub enum IdenticonError {
    #[error("Invalid value for '{param}': {message}")]
    InvalidArgument { param: String, message: String },

    #[error("Resource exhausted: {0}")]
    ResourceExhausted(String),

    #[error("Encoding failed: {0}")]
    Encode(String),
}

impl IdenticonError {
    /// Shorthand for an `InvalidArgument` error.
    pub fn invalid(param: impl Into<String>, message: impl Into<String>) -> Self {
        IdenticonError::InvalidArgument {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            IdenticonError::InvalidArgument { .. } => 400,
            IdenticonError::ResourceExhausted(_) | IdenticonError::Encode(_) => 500,
        }
    }
}

impl From<std::io::Error> for IdenticonError {
    fn from(err: std::io::Error) -> Self {
        IdenticonError::Encode(err.to_string())
    }
}

impl From<std::collections::TryReserveError> for IdenticonError {
    fn from(err: std::collections::TryReserveError) -> Self {
        IdenticonError::ResourceExhausted(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_message() {
        let err = IdenticonError::invalid("size", "must be positive");
        assert_eq!(err.to_string(), "Invalid value for 'size': must be positive");
        assert_eq!(err.http_status_code(), 400);
    }

    #[test]
    fn test_server_side_errors_map_to_500() {
        assert_eq!(IdenticonError::ResourceExhausted("x".into()).http_status_code(), 500);
        assert_eq!(IdenticonError::Encode("x".into()).http_status_code(), 500);
    }

    #[test]
    fn test_try_reserve_error_converts() {
        let mut v: Vec<u8> = Vec::new();
        let err = v.try_reserve_exact(usize::MAX).unwrap_err();
        let converted: IdenticonError = err.into();
        assert!(matches!(converted, IdenticonError::ResourceExhausted(_)));
    }
}
