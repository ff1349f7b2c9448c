//! Error types for Stream operations.
//!
//! Failures fall into two groups. Argument and configuration errors are
//! returned synchronously, before a request is dispatched. Remote, transport
//! and decoding errors happen after dispatch and are only ever produced by the
//! future returned from a client operation.

use thiserror::Error;

/// Main error type for Stream operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A required argument was missing or empty
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Client or endpoint configuration is unusable
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The API answered with an error envelope
    #[error("Remote error ({status}): {message}")]
    RemoteError {
        /// HTTP status code of the response
        status: u16,
        /// Stream error code, when the envelope carried one
        code: Option<i64>,
        /// Stream exception name, when the envelope carried one
        exception: Option<String>,
        /// Error detail reported by the API
        message: String,
    },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Request timed out
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The API could not be reached
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// A successful response could not be decoded
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

/// Specialized result type for Stream operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::RemoteError { .. } => "REMOTE_ERROR",
            Self::HttpError(_) => "HTTP_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::ParseError(_) => "PARSE_ERROR",
        }
    }

    /// Returns true if this error should be logged as a serious error.
    #[must_use]
    pub const fn should_log(&self) -> bool {
        matches!(
            self,
            Self::ConfigError(_) | Self::ParseError(_) | Self::ServiceUnavailable(_)
        )
    }

    /// Returns true if the error came from the network layer rather than the API.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::HttpError(_) | Self::Timeout(_) | Self::ServiceUnavailable(_)
        )
    }

    /// Returns true if the API itself reported the failure.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::RemoteError { .. })
    }

    /// HTTP status of a remote error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Render an error together with every lower-level cause.
fn with_sources(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let detail = with_sources(&err);
        if err.is_timeout() {
            Self::Timeout(detail)
        } else if err.is_connect() {
            Self::ServiceUnavailable(format!("connect: {detail}"))
        } else if err.is_builder() {
            Self::ConfigError(detail)
        } else if err.is_decode() {
            Self::ParseError(format!("decode: {detail}"))
        } else if err.is_body() {
            Self::HttpError(format!("body: {detail}"))
        } else if err.is_request() {
            Self::HttpError(format!("request: {detail}"))
        } else {
            Self::HttpError(detail)
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::ConfigError(format!("Invalid URL: {err}"))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(format!("{:?}: {err}", err.classify()))
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ConfigError(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::HttpError(format!("Failed to read request payload: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote() -> Error {
        Error::RemoteError {
            status: 400,
            code: Some(4),
            exception: Some("InputException".to_string()),
            message: "url is required".to_string(),
        }
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            Error::InvalidArgument("test".to_string()).error_code(),
            "INVALID_ARGUMENT"
        );
        assert_eq!(
            Error::ConfigError("test".to_string()).error_code(),
            "CONFIG_ERROR"
        );
        assert_eq!(remote().error_code(), "REMOTE_ERROR");
        assert_eq!(
            Error::HttpError("test".to_string()).error_code(),
            "HTTP_ERROR"
        );
        assert_eq!(Error::Timeout("test".to_string()).error_code(), "TIMEOUT");
        assert_eq!(
            Error::ServiceUnavailable("test".to_string()).error_code(),
            "SERVICE_UNAVAILABLE"
        );
        assert_eq!(
            Error::ParseError("test".to_string()).error_code(),
            "PARSE_ERROR"
        );
    }

    #[test]
    fn test_error_display() {
        let err = Error::InvalidArgument("No data to upload".to_string());
        assert_eq!(err.to_string(), "Invalid argument: No data to upload");

        assert_eq!(remote().to_string(), "Remote error (400): url is required");
    }

    #[test]
    fn test_error_categories() {
        assert!(remote().is_remote());
        assert!(!remote().is_transport());
        assert_eq!(remote().status(), Some(400));

        assert!(Error::Timeout("slow".to_string()).is_transport());
        assert!(Error::HttpError("reset".to_string()).is_transport());
        assert!(!Error::ParseError("bad".to_string()).is_transport());
        assert_eq!(Error::HttpError("reset".to_string()).status(), None);
    }

    #[test]
    fn test_should_log() {
        assert!(Error::ConfigError("test".to_string()).should_log());
        assert!(Error::ParseError("test".to_string()).should_log());

        assert!(!Error::InvalidArgument("test".to_string()).should_log());
        assert!(!remote().should_log());
    }

    #[test]
    fn test_from_url_parse_error() {
        let err = url::Url::parse("not a url").unwrap_err();
        let stream_err: Error = err.into();
        assert!(matches!(stream_err, Error::ConfigError(_)));
    }

    #[test]
    fn test_from_serde_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let stream_err: Error = err.into();
        match stream_err {
            Error::ParseError(message) => {
                assert!(message.starts_with("Syntax: "), "{message}");
                assert!(message.contains("line 1"), "{message}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn with_sources_keeps_cause_chain() {
        #[derive(Debug, thiserror::Error)]
        #[error("upload failed")]
        struct Outer(#[source] std::io::Error);

        let err = Outer(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "connection reset by peer",
        ));
        assert_eq!(with_sources(&err), "upload failed: connection reset by peer");
    }

    #[tokio::test]
    async fn test_from_reqwest_connect_error_keeps_kind() {
        let err = reqwest::get("http://127.0.0.1:9/").await.unwrap_err();
        match Error::from(err) {
            Error::ServiceUnavailable(message) => {
                assert!(message.starts_with("connect: "), "{message}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_from_io_error() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let stream_err: Error = err.into();
        assert!(stream_err.is_transport());
    }

    #[test]
    fn test_error_partial_eq() {
        let err1 = Error::InvalidArgument("test".to_string());
        let err2 = Error::InvalidArgument("test".to_string());
        let err3 = Error::InvalidArgument("other".to_string());

        assert_eq!(err1, err2);
        assert_ne!(err1, err3);
        assert_eq!(remote(), remote().clone());
    }
}
