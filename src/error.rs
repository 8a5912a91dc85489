//! Error types for the PingDirectory provider.

use thiserror::Error;

use crate::client::ApiError;

/// Errors that can occur while serving a provider operation.
///
/// Every variant is reported to the plugin host as an error diagnostic; none
/// of them abort the server.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The requested configuration object was not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// A value in the plan or configuration is invalid.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The provider is not configured, or its configuration is invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The requested resource or data source type is unknown.
    #[error("Unknown resource type: {0}")]
    UnknownResource(String),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A gRPC transport error occurred.
    #[error("Transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    /// The Configuration API rejected a request or could not be reached.
    #[error("Configuration API error: {0}")]
    Api(#[from] ApiError),

    /// Operation not implemented.
    #[error("Unimplemented: {0}")]
    Unimplemented(String),

    /// Invalid request from the plugin host.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ProviderError {
    /// Get the error message as a string.
    pub fn message(&self) -> &str {
        match self {
            Self::NotFound(msg) => msg,
            Self::Validation(msg) => msg,
            Self::Configuration(msg) => msg,
            Self::UnknownResource(msg) => msg,
            Self::Serialization(_err) => "serialization error (see Debug output)",
            Self::Transport(_err) => "transport error (see Debug output)",
            Self::Api(err) => err.message(),
            Self::Unimplemented(msg) => msg,
            Self::InvalidRequest(msg) => msg,
        }
    }

    /// Extra detail attached to the diagnostic for this error.
    ///
    /// For API errors this is the raw HTTP response body, so operators see
    /// exactly what the server rejected.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Api(err) => err.body().filter(|body| !body.is_empty()),
            _ => None,
        }
    }

    /// Whether this error means the remote object does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::Api(err) => err.is_not_found(),
            _ => false,
        }
    }
}

impl From<ProviderError> for tonic::Status {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotFound(msg) => tonic::Status::not_found(msg),
            ProviderError::Validation(msg) => tonic::Status::invalid_argument(msg),
            ProviderError::Configuration(msg) => tonic::Status::failed_precondition(msg),
            ProviderError::UnknownResource(msg) => tonic::Status::not_found(msg),
            ProviderError::Serialization(err) => {
                tonic::Status::invalid_argument(format!("Serialization error: {}", err))
            },
            ProviderError::Transport(err) => {
                tonic::Status::unavailable(format!("Transport error: {}", err))
            },
            ProviderError::Api(err) => match err.status() {
                Some(401) | Some(403) => tonic::Status::permission_denied(err.to_string()),
                Some(404) => tonic::Status::not_found(err.to_string()),
                Some(status) if status < 500 => tonic::Status::failed_precondition(err.to_string()),
                _ => tonic::Status::unavailable(err.to_string()),
            },
            ProviderError::Unimplemented(msg) => tonic::Status::unimplemented(msg),
            ProviderError::InvalidRequest(msg) => tonic::Status::invalid_argument(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(status: u16, body: &str) -> ApiError {
        ApiError::Status {
            status,
            message: "rejected".to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_error_display() {
        let err = ProviderError::NotFound("userRoot".to_string());
        assert_eq!(format!("{}", err), "Resource not found: userRoot");

        let err = ProviderError::Validation("invalid input".to_string());
        assert_eq!(format!("{}", err), "Validation error: invalid input");

        let err = ProviderError::UnknownResource("pingdirectory_unknown".to_string());
        assert_eq!(
            format!("{}", err),
            "Unknown resource type: pingdirectory_unknown"
        );

        let err = ProviderError::Api(api_error(400, "{}"));
        assert_eq!(
            format!("{}", err),
            "Configuration API error: Configuration API returned HTTP 400: rejected"
        );
    }

    #[test]
    fn test_error_to_status() {
        let err = ProviderError::NotFound("test".to_string());
        let status: tonic::Status = err.into();
        assert_eq!(status.code(), tonic::Code::NotFound);

        let err = ProviderError::Validation("test".to_string());
        let status: tonic::Status = err.into();
        assert_eq!(status.code(), tonic::Code::InvalidArgument);

        let err = ProviderError::Configuration("test".to_string());
        let status: tonic::Status = err.into();
        assert_eq!(status.code(), tonic::Code::FailedPrecondition);

        let err = ProviderError::Unimplemented("test".to_string());
        let status: tonic::Status = err.into();
        assert_eq!(status.code(), tonic::Code::Unimplemented);
    }

    #[test]
    fn test_api_error_to_status() {
        let status: tonic::Status = ProviderError::Api(api_error(404, "")).into();
        assert_eq!(status.code(), tonic::Code::NotFound);

        let status: tonic::Status = ProviderError::Api(api_error(403, "")).into();
        assert_eq!(status.code(), tonic::Code::PermissionDenied);

        let status: tonic::Status = ProviderError::Api(api_error(409, "")).into();
        assert_eq!(status.code(), tonic::Code::FailedPrecondition);

        let status: tonic::Status = ProviderError::Api(api_error(503, "")).into();
        assert_eq!(status.code(), tonic::Code::Unavailable);
    }

    #[test]
    fn test_detail_carries_response_body() {
        let err = ProviderError::Api(api_error(400, r#"{"detail":"bad value"}"#));
        assert_eq!(err.detail(), Some(r#"{"detail":"bad value"}"#));

        let err = ProviderError::Api(api_error(400, ""));
        assert_eq!(err.detail(), None);

        let err = ProviderError::Validation("x".to_string());
        assert_eq!(err.detail(), None);
    }

    #[test]
    fn test_is_not_found() {
        assert!(ProviderError::NotFound("x".to_string()).is_not_found());
        assert!(ProviderError::Api(api_error(404, "")).is_not_found());
        assert!(!ProviderError::Api(api_error(500, "")).is_not_found());
        assert!(!ProviderError::Validation("x".to_string()).is_not_found());
    }

    #[test]
    fn test_message_method() {
        let err = ProviderError::NotFound("userRoot".to_string());
        assert_eq!(err.message(), "userRoot");

        let err = ProviderError::Configuration("invalid config".to_string());
        assert_eq!(err.message(), "invalid config");

        let err = ProviderError::Api(api_error(400, ""));
        assert_eq!(err.message(), "rejected");
    }
}
