use thiserror::Error;

/// Errors returned by the Configuration API client.
///
/// Messages never contain the configured password.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server rejected the credentials (401) or the user lacks privileges (403).
    #[error("authentication failed (HTTP {status}): {message}")]
    Auth { status: u16, message: String },

    /// The server answered with a non-success status.
    #[error("Configuration API returned HTTP {status}: {message}")]
    Status {
        status: u16,
        message: String,
        body: String,
    },

    /// Network-level error (connection refused, TLS failure, timeout, ...).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The configured host is not a usable base URL.
    #[error("invalid https_host '{host}': {message}")]
    InvalidHost { host: String, message: String },

    /// A CA certificate file could not be loaded.
    #[error("failed to load CA certificate '{path}': {message}")]
    Certificate { path: String, message: String },

    /// The response body was not the JSON document we expected.
    #[error("failed to decode response: {message}")]
    Decode { message: String },
}

impl ApiError {
    /// The HTTP status of the response, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Auth { status, .. } | Self::Status { status, .. } => Some(*status),
            Self::Network(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the server reported the object as missing.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// The raw response body, for error responses.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. } => Some(body),
            _ => None,
        }
    }

    /// The human-readable part of the error.
    pub fn message(&self) -> &str {
        match self {
            Self::Auth { message, .. }
            | Self::Status { message, .. }
            | Self::InvalidHost { message, .. }
            | Self::Certificate { message, .. }
            | Self::Decode { message } => message,
            Self::Network(_) => "network error (see Debug output)",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = ApiError::Status {
            status: 400,
            message: "Unknown attribute".to_string(),
            body: "{}".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Configuration API returned HTTP 400: Unknown attribute"
        );
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.body(), Some("{}"));
    }

    #[test]
    fn test_auth_error_display() {
        let err = ApiError::Auth {
            status: 401,
            message: "Invalid credentials".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "authentication failed (HTTP 401): Invalid credentials"
        );
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_not_found() {
        let err = ApiError::Status {
            status: 404,
            message: "Not Found".to_string(),
            body: String::new(),
        };
        assert!(err.is_not_found());
    }

    #[test]
    fn test_errors_without_status() {
        let err = ApiError::InvalidHost {
            host: "localhost".to_string(),
            message: "relative URL without a base".to_string(),
        };
        assert_eq!(err.status(), None);
        assert_eq!(err.body(), None);
        assert_eq!(
            err.to_string(),
            "invalid https_host 'localhost': relative URL without a base"
        );
    }
}
