//! The PingDirectory provider: registration and dispatch.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::client::ConfigClient;
use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::resources::{backend, DataSource, Resource};
use crate::schema::{Diagnostic, ProviderSchema};
use crate::server::ProviderService;
use crate::types::{ImportedResource, PlanResult, StateResponse};
use crate::validation;
use crate::version::ProductVersion;

/// What every resource operation needs once the provider is configured.
#[derive(Debug, Clone)]
pub struct ProviderContext {
    pub client: ConfigClient,
    pub version: ProductVersion,
}

impl ProviderContext {
    pub fn new(client: ConfigClient, version: ProductVersion) -> Self {
        Self { client, version }
    }
}

/// Serves every PingDirectory resource and data source.
pub struct PingDirectoryProvider {
    resources: Vec<Box<dyn Resource>>,
    data_sources: Vec<Box<dyn DataSource>>,
    context: RwLock<Option<Arc<ProviderContext>>>,
}

impl PingDirectoryProvider {
    pub fn new() -> Self {
        Self {
            resources: vec![
                Box::new(backend::backend_resource()),
                Box::new(backend::default_backend_resource()),
            ],
            data_sources: vec![
                Box::new(backend::backend_data_source()),
                Box::new(backend::backends_data_source()),
            ],
            context: RwLock::new(None),
        }
    }

    /// Install a context directly, bypassing `configure`.
    pub async fn set_context(&self, context: ProviderContext) {
        *self.context.write().await = Some(Arc::new(context));
    }

    async fn context(&self) -> Result<Arc<ProviderContext>, ProviderError> {
        self.context.read().await.clone().ok_or_else(|| {
            ProviderError::Configuration(
                "Provider not configured. Configure must be called before any resource operation"
                    .to_string(),
            )
        })
    }

    fn resource(&self, type_name: &str) -> Result<&dyn Resource, ProviderError> {
        self.resources
            .iter()
            .find(|r| r.type_name() == type_name)
            .map(|r| r.as_ref())
            .ok_or_else(|| ProviderError::UnknownResource(type_name.to_string()))
    }

    fn data_source(&self, type_name: &str) -> Result<&dyn DataSource, ProviderError> {
        self.data_sources
            .iter()
            .find(|d| d.type_name() == type_name)
            .map(|d| d.as_ref())
            .ok_or_else(|| ProviderError::UnknownResource(type_name.to_string()))
    }

    /// Resolve configuration, build the client and install the context.
    pub async fn configure_with(
        &self,
        config: ProviderConfig,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        let mut diagnostics = Vec::new();
        if config.insecure_trust_all_tls {
            warn!("insecure_trust_all_tls is enabled; server certificates will not be verified");
            diagnostics.push(
                Diagnostic::warning("Insecure TLS is enabled")
                    .with_detail(
                        "All server certificates are trusted. This should only be used for testing.",
                    )
                    .with_attribute("insecure_trust_all_tls"),
            );
        }

        let client = ConfigClient::new(&config)?;
        info!(
            https_host = %config.https_host,
            product_version = %config.product_version,
            "Configured PingDirectory provider"
        );
        self.set_context(ProviderContext::new(client, config.product_version))
            .await;
        Ok(diagnostics)
    }
}

impl Default for PingDirectoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ProviderService for PingDirectoryProvider {
    fn schema(&self) -> ProviderSchema {
        let mut schema = ProviderSchema::new().with_provider_config(ProviderConfig::schema());
        for resource in &self.resources {
            schema = schema.with_resource(resource.type_name(), resource.schema());
        }
        for data_source in &self.data_sources {
            schema = schema.with_data_source(data_source.type_name(), data_source.schema());
        }
        schema
    }

    async fn validate_provider_config(
        &self,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        Ok(validation::validate(&ProviderConfig::schema(), &config))
    }

    async fn configure(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError> {
        let config = ProviderConfig::from_value(&config)?;
        self.configure_with(config).await
    }

    async fn validate_resource_config(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        Ok(self.resource(resource_type)?.validate(&config))
    }

    async fn plan(
        &self,
        resource_type: &str,
        prior_state: Option<Value>,
        proposed_state: Value,
        config: Value,
    ) -> Result<PlanResult, ProviderError> {
        let resource = self.resource(resource_type)?;
        let ctx = self.context().await?;
        resource.plan(&ctx, prior_state.as_ref(), &proposed_state, &config)
    }

    async fn create(
        &self,
        resource_type: &str,
        planned_state: Value,
    ) -> Result<StateResponse, ProviderError> {
        let resource = self.resource(resource_type)?;
        let ctx = self.context().await?;
        resource.create(&ctx, &planned_state).await
    }

    async fn read(
        &self,
        resource_type: &str,
        current_state: Value,
    ) -> Result<StateResponse, ProviderError> {
        let resource = self.resource(resource_type)?;
        let ctx = self.context().await?;
        resource.read(&ctx, &current_state).await
    }

    async fn update(
        &self,
        resource_type: &str,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<StateResponse, ProviderError> {
        let resource = self.resource(resource_type)?;
        let ctx = self.context().await?;
        resource.update(&ctx, &prior_state, &planned_state).await
    }

    async fn delete(
        &self,
        resource_type: &str,
        current_state: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        let resource = self.resource(resource_type)?;
        let ctx = self.context().await?;
        resource.delete(&ctx, &current_state).await
    }

    async fn import_resource(
        &self,
        resource_type: &str,
        id: &str,
    ) -> Result<Vec<ImportedResource>, ProviderError> {
        self.resource(resource_type)?.import(id)
    }

    async fn validate_data_source_config(
        &self,
        data_source_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        Ok(self.data_source(data_source_type)?.validate(&config))
    }

    async fn read_data_source(
        &self,
        data_source_type: &str,
        config: Value,
    ) -> Result<StateResponse, ProviderError> {
        let data_source = self.data_source(data_source_type)?;
        let ctx = self.context().await?;
        data_source.read(&ctx, &config).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schema_registers_everything() {
        let provider = PingDirectoryProvider::new();
        let schema = provider.schema();
        let resources = &schema.resources;
        assert!(resources.contains_key("pingdirectory_backend"));
        assert!(resources.contains_key("pingdirectory_default_backend"));
        assert!(schema.data_sources.contains_key("pingdirectory_backend"));
        assert!(schema.data_sources.contains_key("pingdirectory_backends"));
        assert!(schema.provider.attribute("https_host").is_some());

        let metadata = provider.metadata();
        assert_eq!(
            metadata.resources,
            vec!["pingdirectory_backend", "pingdirectory_default_backend"]
        );
    }

    #[tokio::test]
    async fn test_operations_before_configure() {
        let provider = PingDirectoryProvider::new();
        let err = provider
            .read("pingdirectory_backend", json!({"backend_id": "userRoot"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_unknown_resource_type() {
        let provider = PingDirectoryProvider::new();
        let err = provider
            .validate_resource_config("pingdirectory_unknown", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::UnknownResource(_)));

        let err = provider
            .read_data_source("pingdirectory_unknown", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::UnknownResource(_)));
    }

    #[tokio::test]
    async fn test_import_needs_no_configuration() {
        let provider = PingDirectoryProvider::new();
        let imported = provider
            .import_resource("pingdirectory_default_backend", "userRoot")
            .await
            .unwrap();
        assert_eq!(imported[0].state, json!({"backend_id": "userRoot"}));
    }

    #[tokio::test]
    async fn test_configure_warns_on_insecure_tls() {
        let provider = PingDirectoryProvider::new();
        let config = ProviderConfig::resolve(
            &json!({
                "https_host": "https://localhost:1443",
                "username": "cn=administrator",
                "password": "2FederateM0re",
                "insecure_trust_all_tls": true,
                "product_version": "9.3.0.0"
            }),
            |_| None,
        )
        .unwrap();

        let diagnostics = provider.configure_with(config).await.unwrap();
        assert_eq!(diagnostics.len(), 1);
        assert!(!diagnostics[0].is_error());
        let context = provider.context().await.unwrap();
        assert_eq!(context.version, ProductVersion::V9_3_0_0);
    }
}
