//! Client for the PingDirectory Configuration API.
//!
//! Every configuration object lives at `<https_host>/config/<collection>/<id>`.
//! Requests use HTTP basic authentication and JSON bodies.

mod error;
mod types;

pub use error::ApiError;
pub use types::{
    ListResponse, Operation, OperationKind, UpdateRequest, CONFIGURATION_SCHEMA_PREFIX,
    MESSAGES_SCHEMA,
};

use std::fmt;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::config::ProviderConfig;

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!(
    "terraform-provider-pingdirectory/",
    env!("CARGO_PKG_VERSION")
);

#[derive(Clone)]
pub struct ConfigClient {
    client: reqwest::Client,
    base_url: Url,
    username: String,
    password: String,
}

impl ConfigClient {
    /// Build a client from the resolved provider configuration.
    pub fn new(config: &ProviderConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(config.insecure_trust_all_tls);

        for path in &config.ca_certificate_pem_files {
            let pem = std::fs::read(path).map_err(|e| ApiError::Certificate {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            let certificate =
                reqwest::Certificate::from_pem(&pem).map_err(|e| ApiError::Certificate {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;
            builder = builder.add_root_certificate(certificate);
        }

        let client = builder.build().map_err(ApiError::Network)?;
        Self::with_client(
            client,
            &config.https_host,
            config.username.clone(),
            config.password.clone(),
        )
    }

    /// Build a client around an existing `reqwest::Client`.
    ///
    /// NOTE: Primarily used for testing with mock servers.
    pub fn with_client(
        client: reqwest::Client,
        https_host: &str,
        username: String,
        password: String,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            client,
            base_url: config_base_url(https_host)?,
            username,
            password,
        })
    }

    /// The `/config` base URL all requests are made against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch one configuration object.
    pub async fn get(&self, collection: &str, id: &str) -> Result<Value, ApiError> {
        let url = self.endpoint(&[collection, id])?;
        let response = self.request(Method::GET, url).send().await?;
        decode(check(response).await?).await
    }

    /// List the objects of a collection, optionally narrowed by a server-side filter.
    pub async fn list(
        &self,
        collection: &str,
        filter: Option<&str>,
    ) -> Result<ListResponse, ApiError> {
        let url = self.endpoint(&[collection])?;
        let mut request = self.request(Method::GET, url);
        if let Some(filter) = filter {
            request = request.query(&[("filter", filter)]);
        }
        let response = check(request.send().await?).await?;
        let body = decode(response).await?;
        serde_json::from_value(body).map_err(|e| ApiError::Decode {
            message: format!("invalid list response: {}", e),
        })
    }

    /// Create a configuration object.
    pub async fn create(&self, collection: &str, body: &Value) -> Result<Value, ApiError> {
        let url = self.endpoint(&[collection])?;
        let response = self.request(Method::POST, url).json(body).send().await?;
        decode(check(response).await?).await
    }

    /// Apply attribute operations to an existing configuration object.
    pub async fn update(
        &self,
        collection: &str,
        id: &str,
        operations: &[Operation],
    ) -> Result<Value, ApiError> {
        let url = self.endpoint(&[collection, id])?;
        let body = UpdateRequest {
            operations: operations.to_vec(),
        };
        let response = self.request(Method::PATCH, url).json(&body).send().await?;
        decode(check(response).await?).await
    }

    /// Delete a configuration object.
    pub async fn delete(&self, collection: &str, id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&[collection, id])?;
        let response = self.request(Method::DELETE, url).send().await?;
        check(response).await?;
        Ok(())
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(method = %method, url = %url, "Configuration API request");
        self.client
            .request(method, url)
            .basic_auth(&self.username, Some(&self.password))
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidHost {
                host: self.base_url.to_string(),
                message: "URL cannot be a base".to_string(),
            })?
            .extend(segments);
        Ok(url)
    }
}

impl fmt::Debug for ConfigClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigClient")
            .field("base_url", &self.base_url.as_str())
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

fn config_base_url(https_host: &str) -> Result<Url, ApiError> {
    let mut url = Url::parse(https_host.trim()).map_err(|e| ApiError::InvalidHost {
        host: https_host.to_string(),
        message: e.to_string(),
    })?;
    url.path_segments_mut()
        .map_err(|_| ApiError::InvalidHost {
            host: https_host.to_string(),
            message: "URL cannot be a base".to_string(),
        })?
        .pop_if_empty()
        .push("config");
    Ok(url)
}

async fn check(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = error_body(response.text().await);
    let message = error_message(status, &body);
    debug!(status = status.as_u16(), body = %body, "Configuration API error response");

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ApiError::Auth {
            status: status.as_u16(),
            message,
        }),
        _ => Err(ApiError::Status {
            status: status.as_u16(),
            message,
            body,
        }),
    }
}

async fn decode(response: Response) -> Result<Value, ApiError> {
    let text = response.text().await?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&text).map_err(|e| ApiError::Decode {
        message: e.to_string(),
    })
}

/// The text of an error response. An unreadable body is logged and left empty.
fn error_body<E: fmt::Display>(text: Result<String, E>) -> String {
    match text {
        Ok(body) => body,
        Err(e) => {
            debug!(error = %e, "Failed to read Configuration API error body");
            String::new()
        },
    }
}

/// Pull the human-readable message out of an error body.
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("detail")?.as_str().map(str::to_string))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unexpected response")
                .to_string()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(host: &str) -> ConfigClient {
        ConfigClient::with_client(
            reqwest::Client::new(),
            host,
            "cn=administrator".to_string(),
            "2FederateM0re".to_string(),
        )
        .unwrap()
    }

    #[test]
    fn test_base_url() {
        assert_eq!(
            client("https://localhost:1443").base_url().as_str(),
            "https://localhost:1443/config"
        );
        assert_eq!(
            client("https://localhost:1443/").base_url().as_str(),
            "https://localhost:1443/config"
        );
    }

    #[test]
    fn test_endpoint_escapes_ids() {
        let client = client("https://localhost:1443");
        let url = client.endpoint(&["backends", "user Root"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://localhost:1443/config/backends/user%20Root"
        );
    }

    #[test]
    fn test_invalid_host() {
        let err = ConfigClient::with_client(
            reqwest::Client::new(),
            "localhost:1443",
            "u".to_string(),
            "p".to_string(),
        );
        assert!(matches!(err, Err(ApiError::InvalidHost { .. })));

        let err = ConfigClient::with_client(
            reqwest::Client::new(),
            "not a url",
            "u".to_string(),
            "p".to_string(),
        );
        assert!(matches!(err, Err(ApiError::InvalidHost { .. })));
    }

    #[test]
    fn test_debug_redacts_password() {
        let debug = format!("{:?}", client("https://localhost:1443"));
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("2FederateM0re"));
    }

    #[test]
    fn test_error_message_prefers_detail() {
        assert_eq!(
            error_message(
                StatusCode::BAD_REQUEST,
                r#"{"schemas":["urn:ietf:params:scim:api:messages:2.0:Error"],"status":"400","detail":"Invalid value"}"#
            ),
            "Invalid value"
        );
        assert_eq!(error_message(StatusCode::NOT_FOUND, "oops"), "Not Found");
    }

    #[test]
    fn test_unreadable_error_body() {
        assert_eq!(error_body(Ok::<_, String>("boom".to_string())), "boom");
        let body = error_body(Err::<String, _>("connection reset"));
        assert_eq!(body, "");
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, &body),
            "Internal Server Error"
        );
    }

    #[test]
    fn test_missing_certificate_file() {
        let config = ProviderConfig {
            https_host: "https://localhost:1443".to_string(),
            username: "u".to_string(),
            password: "p".to_string(),
            insecure_trust_all_tls: false,
            ca_certificate_pem_files: vec!["/nonexistent/ca.pem".into()],
            product_version: crate::version::ProductVersion::V9_3_0_0,
        };
        let err = ConfigClient::new(&config).unwrap_err();
        assert!(matches!(err, ApiError::Certificate { .. }));
    }
}
