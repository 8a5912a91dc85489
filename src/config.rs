//! Provider configuration.
//!
//! Every attribute of the provider block may be left unset and supplied
//! through an environment variable named after it:
//!
//! | Attribute                  | Environment variable                                  |
//! |----------------------------|-------------------------------------------------------|
//! | `https_host`               | `PINGDIRECTORY_PROVIDER_HTTPS_HOST`                   |
//! | `username`                 | `PINGDIRECTORY_PROVIDER_USERNAME`                     |
//! | `password`                 | `PINGDIRECTORY_PROVIDER_PASSWORD`                     |
//! | `insecure_trust_all_tls`   | `PINGDIRECTORY_PROVIDER_INSECURE_TRUST_ALL_TLS`       |
//! | `ca_certificate_pem_files` | `PINGDIRECTORY_PROVIDER_CA_CERTIFICATE_PEM_FILES` (comma-separated) |
//! | `product_version`          | `PINGDIRECTORY_PROVIDER_PRODUCT_VERSION`              |

use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;
use serde_json::Value;

use crate::error::ProviderError;
use crate::schema::{Attribute, Schema};
use crate::types::is_unknown;
use crate::version::ProductVersion;

/// Prefix of the environment variables read by [`ProviderConfig::resolve`].
pub const ENV_PREFIX: &str = "PINGDIRECTORY_PROVIDER_";

#[derive(Debug, Default, Deserialize)]
struct RawProviderConfig {
    #[serde(default)]
    https_host: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    password: Option<String>,
    #[serde(default)]
    insecure_trust_all_tls: Option<bool>,
    #[serde(default)]
    ca_certificate_pem_files: Option<Vec<String>>,
    #[serde(default)]
    product_version: Option<String>,
}

/// Resolved provider configuration.
#[derive(Clone)]
pub struct ProviderConfig {
    /// Base URL of the PingDirectory HTTPS connection handler, e.g. `https://localhost:1443`.
    pub https_host: String,
    pub username: String,
    pub password: String,
    /// Skip server certificate verification.
    pub insecure_trust_all_tls: bool,
    /// Additional PEM files whose certificates are trusted.
    pub ca_certificate_pem_files: Vec<PathBuf>,
    pub product_version: ProductVersion,
}

impl ProviderConfig {
    /// Schema of the provider configuration block.
    pub fn schema() -> Schema {
        Schema::v0()
            .with_attribute(
                "https_host",
                Attribute::optional_string().with_description(
                    "URI for PingDirectory HTTPS port. Default value can be set with the PINGDIRECTORY_PROVIDER_HTTPS_HOST environment variable.",
                ),
            )
            .with_attribute(
                "username",
                Attribute::optional_string().with_description(
                    "Username for PingDirectory admin user. Default value can be set with the PINGDIRECTORY_PROVIDER_USERNAME environment variable.",
                ),
            )
            .with_attribute(
                "password",
                Attribute::optional_string().sensitive().with_description(
                    "Password for PingDirectory admin user. Default value can be set with the PINGDIRECTORY_PROVIDER_PASSWORD environment variable.",
                ),
            )
            .with_attribute(
                "insecure_trust_all_tls",
                Attribute::optional_bool().with_description(
                    "Set to true to trust any certificate when connecting to the PingDirectory server. This is insecure and should not be enabled outside of testing. Default value can be set with the PINGDIRECTORY_PROVIDER_INSECURE_TRUST_ALL_TLS environment variable.",
                ),
            )
            .with_attribute(
                "ca_certificate_pem_files",
                Attribute::optional_string_set().with_description(
                    "Paths to files containing PEM-encoded certificates to be trusted as root CAs when connecting to the PingDirectory server over HTTPS. Default value can be set with the PINGDIRECTORY_PROVIDER_CA_CERTIFICATE_PEM_FILES environment variable, using commas to delimit multiple PEM files if necessary.",
                ),
            )
            .with_attribute(
                "product_version",
                Attribute::optional_string().with_description(
                    "Version of the PingDirectory server being configured. Default value can be set with the PINGDIRECTORY_PROVIDER_PRODUCT_VERSION environment variable.",
                ),
            )
    }

    /// Resolve the configuration from the provider block and the process environment.
    pub fn from_value(config: &Value) -> Result<Self, ProviderError> {
        Self::resolve(config, |name| std::env::var(name).ok())
    }

    /// Resolve the configuration, looking up unset attributes with `env`.
    pub fn resolve<F>(config: &Value, env: F) -> Result<Self, ProviderError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = parse_raw(config)?;
        let lookup = |attribute: &str| {
            env(&env_var_name(attribute))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let https_host = required(raw.https_host, "https_host", &lookup)?;
        let username = required(raw.username, "username", &lookup)?;
        let password = required(raw.password, "password", &lookup)?;
        let product_version = required(raw.product_version, "product_version", &lookup)?;
        let product_version = ProductVersion::parse(&product_version)?;

        let insecure_trust_all_tls = match raw.insecure_trust_all_tls {
            Some(value) => value,
            None => match lookup("insecure_trust_all_tls") {
                Some(value) => parse_bool("insecure_trust_all_tls", &value)?,
                None => false,
            },
        };

        let ca_certificate_pem_files = match raw.ca_certificate_pem_files {
            Some(files) => files,
            None => lookup("ca_certificate_pem_files")
                .map(|value| {
                    value
                        .split(',')
                        .map(|f| f.trim().to_string())
                        .filter(|f| !f.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        }
        .into_iter()
        .map(PathBuf::from)
        .collect();

        Ok(Self {
            https_host,
            username,
            password,
            insecure_trust_all_tls,
            ca_certificate_pem_files,
            product_version,
        })
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("https_host", &self.https_host)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("insecure_trust_all_tls", &self.insecure_trust_all_tls)
            .field("ca_certificate_pem_files", &self.ca_certificate_pem_files)
            .field("product_version", &self.product_version)
            .finish()
    }
}

/// The environment variable consulted for a provider attribute.
pub fn env_var_name(attribute: &str) -> String {
    format!("{}{}", ENV_PREFIX, attribute.to_ascii_uppercase())
}

fn parse_raw(config: &Value) -> Result<RawProviderConfig, ProviderError> {
    match config {
        Value::Null => Ok(RawProviderConfig::default()),
        Value::Object(map) => {
            // Unknown values are treated as unset so the environment can fill them in.
            let known: serde_json::Map<String, Value> = map
                .iter()
                .filter(|(_, v)| !is_unknown(v))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            serde_json::from_value(Value::Object(known)).map_err(|e| {
                ProviderError::Configuration(format!("Invalid provider configuration: {}", e))
            })
        },
        other => Err(ProviderError::Configuration(format!(
            "Expected provider configuration object, got {}",
            other
        ))),
    }
}

fn required<F>(value: Option<String>, attribute: &str, lookup: F) -> Result<String, ProviderError>
where
    F: Fn(&str) -> Option<String>,
{
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| lookup(attribute))
        .ok_or_else(|| {
            ProviderError::Configuration(format!(
                "Missing required provider attribute '{}'. Set it in the provider block or with the {} environment variable",
                attribute,
                env_var_name(attribute)
            ))
        })
}

fn parse_bool(attribute: &str, value: &str) -> Result<bool, ProviderError> {
    match value.to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ProviderError::Configuration(format!(
            "Invalid boolean '{}' for {}",
            value,
            env_var_name(attribute)
        ))),
    }
}
