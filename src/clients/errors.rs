//! Error types for sending CMCI requests and interpreting their responses.
//!
//! # Error Handling
//!
//! The crate uses specific error types for each failure scenario:
//!
//! - [`ValidationError`]: Input rejected before any request is sent
//! - [`TransportError`]: Connection, TLS or timeout failures, and non-2xx
//!   responses whose body is not a CMCI document
//! - [`ResponseParseError`]: A body that does not have the CMCI response shape
//! - [`ApiError`]: A well-formed CMCI response reporting a failed CPSM call
//! - [`CmciError`]: Unified error type encompassing all of the above
//!
//! # Example
//!
//! ```rust,ignore
//! use cmci::CmciError;
//!
//! match result {
//!     Ok(result) => println!("Deleted {}", result.success_count()),
//!     Err(CmciError::Validation(e)) => println!("Bad input: {e}"),
//!     Err(CmciError::Transport(e)) => println!("Request failed: {e}"),
//!     Err(CmciError::ResponseParse(e)) => println!("Unexpected response: {e}"),
//!     Err(CmciError::Api(e)) => println!("CPSM {}: {}", e.response, e.reason),
//! }
//! ```

use std::fmt;
use std::time::Duration;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::error::ValidationError;
use crate::resources::ResponseResult;

/// Error returned when the request could not be completed at the HTTP level.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request did not complete within the configured timeout.
    #[error("Request to {url} timed out after {}s", .timeout.as_secs_f64())]
    Timeout {
        /// The URL that was requested.
        url: String,
        /// The configured timeout.
        timeout: Duration,
    },

    /// The TCP or TLS connection could not be established.
    #[error("Could not connect to {url}: {message}")]
    Connect {
        /// The URL that was requested.
        url: String,
        /// The underlying error message.
        message: String,
    },

    /// TLS material could not be loaded.
    #[error("TLS configuration error: {0}")]
    Tls(String),

    /// The server answered with a non-2xx status and a body that is not a
    /// CMCI response.
    #[error("HTTP {code} {reason} returned by CMCI")]
    UnexpectedStatus {
        /// The HTTP status code.
        code: u16,
        /// The reason phrase.
        reason: String,
    },

    /// Any other network or protocol error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Error returned when a response body does not have the CMCI shape.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResponseParseError {
    /// The body is not well-formed XML.
    #[error("Malformed CMCI response: {0}")]
    Malformed(String),

    /// A required element or attribute is missing.
    #[error("CMCI response is missing required field '{0}'")]
    MissingField(&'static str),

    /// A numeric attribute holds a non-numeric value.
    #[error("CMCI response field '{field}' is not numeric: '{value}'")]
    InvalidNumber {
        /// The attribute name.
        field: &'static str,
        /// The value found.
        value: String,
    },
}

/// Error returned when CMCI reports a failed CPSM API call.
///
/// The mapped result is kept so callers can report the status fields.
#[derive(Debug, Error)]
#[error("CMCI request failed with CPSM response {response} ({response_code}), reason {reason} ({reason_code})")]
pub struct ApiError {
    /// Textual CPSM response (e.g. `NOTAVAILABLE`).
    pub response: String,
    /// Numeric CPSM response code.
    pub response_code: u32,
    /// Textual CPSM reason.
    pub reason: String,
    /// Numeric CPSM reason code.
    pub reason_code: u32,
    /// The mapped response.
    pub result: Box<ResponseResult>,
}

/// Category of a [`CmciError`], reported to callers as `error.kind`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input rejected before sending.
    Validation,
    /// Connection, TLS, timeout or uninterpretable status.
    Transport,
    /// Unexpected response shape.
    ResponseParse,
    /// Non-OK CPSM response.
    Api,
}

impl ErrorKind {
    /// Returns the name reported to callers.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "ValidationError",
            Self::Transport => "TransportError",
            Self::ResponseParse => "ResponseParseError",
            Self::Api => "ApiError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ErrorKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Unified error type for a CMCI invocation.
#[derive(Debug, Error)]
pub enum CmciError {
    /// Input validation failed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The request could not be completed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response could not be parsed.
    #[error(transparent)]
    ResponseParse(#[from] ResponseParseError),

    /// CMCI reported a failed API call.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl CmciError {
    /// Returns the category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Transport(_) => ErrorKind::Transport,
            Self::ResponseParse(_) => ErrorKind::ResponseParse,
            Self::Api(_) => ErrorKind::Api,
        }
    }

    /// Returns the mapped response when the error carries one.
    #[must_use]
    pub fn result(&self) -> Option<&ResponseResult> {
        match self {
            Self::Api(e) => Some(&e.result),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_error_includes_url_and_duration() {
        let error = TransportError::Timeout {
            url: "https://host:1/CICSSystemManagement/CICSBundle/plex".to_string(),
            timeout: Duration::from_secs(30),
        };
        let message = error.to_string();
        assert!(message.contains("CICSBundle"));
        assert!(message.contains("30s"));
    }

    #[test]
    fn test_unexpected_status_error_message() {
        let error = TransportError::UnexpectedStatus {
            code: 404,
            reason: "Not Found".to_string(),
        };
        assert_eq!(error.to_string(), "HTTP 404 Not Found returned by CMCI");
    }

    #[test]
    fn test_missing_field_error_message() {
        let error = ResponseParseError::MissingField("resultsummary");
        assert!(error.to_string().contains("resultsummary"));
    }

    #[test]
    fn test_error_kind_names() {
        let error = CmciError::from(ValidationError::EmptyFilter);
        assert_eq!(error.kind(), ErrorKind::Validation);
        assert_eq!(error.kind().to_string(), "ValidationError");

        let error = CmciError::from(ResponseParseError::MissingField("response"));
        assert_eq!(error.kind().as_str(), "ResponseParseError");
        assert!(error.result().is_none());

        let error = CmciError::from(TransportError::Tls("bad pem".to_string()));
        assert_eq!(error.kind().as_str(), "TransportError");
    }

    #[test]
    fn test_error_types_implement_std_error() {
        let _: &dyn std::error::Error = &ResponseParseError::MissingField("response");
        let _: &dyn std::error::Error = &TransportError::Tls(String::new());
        let _: &dyn std::error::Error = &CmciError::from(ValidationError::EmptyFilter);
    }
}
