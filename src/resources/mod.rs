//! Resources and data sources served by the provider.
//!
//! Every configuration object kind is served by the generic implementations
//! in [`config_object`], parameterised by an
//! [`ObjectDefinition`](crate::model::ObjectDefinition).

pub mod backend;
pub mod config_object;

use serde_json::Value;

use crate::error::ProviderError;
use crate::provider::ProviderContext;
use crate::schema::{Diagnostic, Schema};
use crate::types::{ImportedResource, PlanResult, StateResponse};
use crate::validation;

pub use config_object::{
    ConfigObjectDataSource, ConfigObjectListDataSource, ConfigObjectResource, ResourceMode,
};

/// A managed resource type.
#[async_trait::async_trait]
pub trait Resource: Send + Sync {
    /// The type name, e.g. `pingdirectory_backend`.
    fn type_name(&self) -> &str;

    fn schema(&self) -> Schema;

    /// Validate configuration before planning.
    fn validate(&self, config: &Value) -> Vec<Diagnostic> {
        validation::validate(&self.schema(), config)
    }

    fn plan(
        &self,
        ctx: &ProviderContext,
        prior_state: Option<&Value>,
        proposed_state: &Value,
        config: &Value,
    ) -> Result<PlanResult, ProviderError>;

    async fn create(
        &self,
        ctx: &ProviderContext,
        planned_state: &Value,
    ) -> Result<StateResponse, ProviderError>;

    async fn read(
        &self,
        ctx: &ProviderContext,
        current_state: &Value,
    ) -> Result<StateResponse, ProviderError>;

    async fn update(
        &self,
        ctx: &ProviderContext,
        prior_state: &Value,
        planned_state: &Value,
    ) -> Result<StateResponse, ProviderError>;

    async fn delete(
        &self,
        ctx: &ProviderContext,
        current_state: &Value,
    ) -> Result<Vec<Diagnostic>, ProviderError>;

    /// Turn an import id into the state a subsequent read starts from.
    fn import(&self, id: &str) -> Result<Vec<ImportedResource>, ProviderError>;
}

/// A read-only data source type.
#[async_trait::async_trait]
pub trait DataSource: Send + Sync {
    fn type_name(&self) -> &str;

    fn schema(&self) -> Schema;

    fn validate(&self, config: &Value) -> Vec<Diagnostic> {
        validation::validate(&self.schema(), config)
    }

    async fn read(
        &self,
        ctx: &ProviderContext,
        config: &Value,
    ) -> Result<StateResponse, ProviderError>;
}
