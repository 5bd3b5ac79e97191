//! Partner API error types.

use thiserror::Error;

use crate::persons::Person;

/// Result type for partner API calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Endpoint or feature the partner API does not support.
pub const ERR_UNSUPPORTED: i32 = -404;
/// The uploaded person image failed validation.
pub const ERR_PERSON_IMAGE_INVALID: i32 = -5010;
/// An employee with this identity already exists.
pub const ERR_EMPLOYEE_EXISTS: i32 = -9005;
/// The image could not be processed.
pub const ERR_INVALID_IMAGE: i32 = -9006;
/// The face image duplicates an already-registered person.
pub const ERR_DUPLICATED_IMAGE: i32 = -9007;

/// Error type for partner API calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The provider rejected the call inside its response envelope.
    #[error("facegate ({code}): {message}")]
    Server {
        code: i32,
        message: String,
        /// Already-registered person, supplied with [`ERR_DUPLICATED_IMAGE`].
        person: Option<Person>,
    },

    /// Transport-level failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response envelope or payload could not be decoded.
    #[error("Invalid response payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// The token source failed to produce an access token.
    #[error("Token error: {0}")]
    Token(String),

    /// Client-side configuration problem.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Whether a failed call is worth retrying.
///
/// Server rejections with a permanent cause (duplicate or invalid image,
/// existing employee, unsupported endpoint) are final; everything else is
/// assumed transient.
pub fn is_retriable(err: &ApiError) -> bool {
    match err {
        ApiError::Server { code, .. } => !matches!(
            *code,
            ERR_UNSUPPORTED
                | ERR_PERSON_IMAGE_INVALID
                | ERR_EMPLOYEE_EXISTS
                | ERR_INVALID_IMAGE
                | ERR_DUPLICATED_IMAGE
        ),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server_error(code: i32) -> ApiError {
        ApiError::Server {
            code,
            message: "rejected".to_string(),
            person: None,
        }
    }

    #[test]
    fn permanent_codes_are_not_retriable() {
        for code in [
            ERR_UNSUPPORTED,
            ERR_PERSON_IMAGE_INVALID,
            ERR_EMPLOYEE_EXISTS,
            ERR_INVALID_IMAGE,
            ERR_DUPLICATED_IMAGE,
        ] {
            assert!(!is_retriable(&server_error(code)), "code {code}");
        }
    }

    #[test]
    fn other_server_codes_are_retriable() {
        assert!(is_retriable(&server_error(-1)));
        assert!(is_retriable(&server_error(0)));
    }

    #[test]
    fn non_server_errors_are_retriable() {
        assert!(is_retriable(&ApiError::Token("expired".to_string())));
    }
}
