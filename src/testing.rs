//! Testing utilities for the provider.
//!
//! [`ProviderTester`] drives a [`ProviderService`] the way the plugin host
//! does, without a gRPC server in between. Pair it with a mock HTTP server
//! standing in for the Configuration API:
//!
//! ```ignore
//! use terraform_provider_pingdirectory::testing::{configured_provider, ProviderTester};
//! use serde_json::json;
//!
//! #[tokio::test]
//! async fn test_read_backend() {
//!     let server = wiremock::MockServer::start().await;
//!     let tester = ProviderTester::new(configured_provider(&server.uri()).await.unwrap());
//!
//!     let response = tester
//!         .read("pingdirectory_default_backend", json!({"backend_id": "userRoot"}))
//!         .await
//!         .unwrap();
//!     assert!(response.state.is_some());
//! }
//! ```

use serde_json::{json, Value};

use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::provider::PingDirectoryProvider;
use crate::schema::{Diagnostic, DiagnosticSeverity, ProviderSchema};
use crate::server::ProviderService;
use crate::types::{ImportedResource, PlanResult, StateResponse};

/// Credentials used by [`configured_provider`].
pub const TEST_USERNAME: &str = "cn=administrator";
pub const TEST_PASSWORD: &str = "2FederateM0re";

/// A provider configured against `https_host` for product version 9.3.0.0,
/// ignoring the process environment.
pub async fn configured_provider(https_host: &str) -> Result<PingDirectoryProvider, ProviderError> {
    configured_provider_for_version(https_host, "9.3.0.0").await
}

pub async fn configured_provider_for_version(
    https_host: &str,
    product_version: &str,
) -> Result<PingDirectoryProvider, ProviderError> {
    let config = ProviderConfig::resolve(
        &json!({
            "https_host": https_host,
            "username": TEST_USERNAME,
            "password": TEST_PASSWORD,
            "product_version": product_version
        }),
        |_| None,
    )?;
    let provider = PingDirectoryProvider::new();
    provider.configure_with(config).await?;
    Ok(provider)
}

/// A test harness that calls a provider directly.
pub struct ProviderTester<P: ProviderService> {
    provider: P,
}

impl<P: ProviderService> ProviderTester<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    // =========================================================================
    // Schema & Metadata
    // =========================================================================

    pub fn schema(&self) -> ProviderSchema {
        self.provider.schema()
    }

    pub fn resource_types(&self) -> Vec<String> {
        self.provider.metadata().resources
    }

    pub fn data_source_types(&self) -> Vec<String> {
        self.provider.metadata().data_sources
    }

    // =========================================================================
    // Provider Lifecycle
    // =========================================================================

    /// Configure the provider.
    ///
    /// Returns the diagnostics (warnings included) on success, and `Err`
    /// when any of them is an error.
    pub async fn configure(&self, config: Value) -> Result<Vec<Diagnostic>, TestError> {
        let diagnostics = self.provider.configure(config).await?;
        check_diagnostics(diagnostics)
    }

    // =========================================================================
    // Resource Operations
    // =========================================================================

    /// Validate a resource configuration, returning every diagnostic.
    pub async fn validate_resource_config(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        self.provider
            .validate_resource_config(resource_type, config)
            .await
    }

    /// Plan a resource creation (no prior state).
    pub async fn plan_create(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<PlanResult, ProviderError> {
        self.provider
            .plan(resource_type, None, config.clone(), config)
            .await
    }

    /// Plan an update of `prior_state` to `config`.
    pub async fn plan_update(
        &self,
        resource_type: &str,
        prior_state: Value,
        config: Value,
    ) -> Result<PlanResult, ProviderError> {
        self.provider
            .plan(resource_type, Some(prior_state), config.clone(), config)
            .await
    }

    pub async fn plan_delete(
        &self,
        resource_type: &str,
        prior_state: Value,
    ) -> Result<PlanResult, ProviderError> {
        self.provider
            .plan(resource_type, Some(prior_state), Value::Null, Value::Null)
            .await
    }

    pub async fn create(
        &self,
        resource_type: &str,
        planned_state: Value,
    ) -> Result<StateResponse, ProviderError> {
        self.provider.create(resource_type, planned_state).await
    }

    pub async fn read(
        &self,
        resource_type: &str,
        current_state: Value,
    ) -> Result<StateResponse, ProviderError> {
        self.provider.read(resource_type, current_state).await
    }

    pub async fn update(
        &self,
        resource_type: &str,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<StateResponse, ProviderError> {
        self.provider
            .update(resource_type, prior_state, planned_state)
            .await
    }

    pub async fn delete(
        &self,
        resource_type: &str,
        current_state: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        self.provider.delete(resource_type, current_state).await
    }

    pub async fn import_resource(
        &self,
        resource_type: &str,
        id: &str,
    ) -> Result<Vec<ImportedResource>, ProviderError> {
        self.provider.import_resource(resource_type, id).await
    }

    // =========================================================================
    // Data Source Operations
    // =========================================================================

    pub async fn validate_data_source_config(
        &self,
        data_source_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        self.provider
            .validate_data_source_config(data_source_type, config)
            .await
    }

    pub async fn read_data_source(
        &self,
        data_source_type: &str,
        config: Value,
    ) -> Result<StateResponse, ProviderError> {
        self.provider
            .read_data_source(data_source_type, config)
            .await
    }

    // =========================================================================
    // Lifecycle Helpers
    // =========================================================================

    /// Run validate → plan → create.
    ///
    /// Returns the state after create.
    pub async fn lifecycle_create(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<Value, TestError> {
        check_diagnostics(
            self.validate_resource_config(resource_type, config.clone())
                .await?,
        )?;
        let plan = self.plan_create(resource_type, config).await?;
        check_diagnostics(plan.diagnostics)?;

        let response = self.create(resource_type, plan.planned_state).await?;
        check_diagnostics(response.diagnostics)?;
        response.state.ok_or(TestError::Removed)
    }

    /// Run validate → plan → update.
    ///
    /// Returns the state after update.
    pub async fn lifecycle_update(
        &self,
        resource_type: &str,
        prior_state: Value,
        config: Value,
    ) -> Result<Value, TestError> {
        check_diagnostics(
            self.validate_resource_config(resource_type, config.clone())
                .await?,
        )?;
        let plan = self
            .plan_update(resource_type, prior_state.clone(), config)
            .await?;
        check_diagnostics(plan.diagnostics)?;

        let response = self
            .update(resource_type, prior_state, plan.planned_state)
            .await?;
        check_diagnostics(response.diagnostics)?;
        response.state.ok_or(TestError::Removed)
    }

    /// Run plan → delete.
    pub async fn lifecycle_delete(
        &self,
        resource_type: &str,
        current_state: Value,
    ) -> Result<(), TestError> {
        self.plan_delete(resource_type, current_state.clone())
            .await?;
        let diagnostics = self.delete(resource_type, current_state).await?;
        check_diagnostics(diagnostics).map(|_| ())
    }
}

/// Error type for test operations that may fail with diagnostics.
#[derive(Debug)]
pub enum TestError {
    /// The operation failed with diagnostics.
    Diagnostics(Vec<Diagnostic>),
    /// The operation failed with a provider error.
    Provider(ProviderError),
    /// The operation dropped the resource from state.
    Removed,
}

impl std::fmt::Display for TestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestError::Diagnostics(diags) => {
                writeln!(f, "Operation failed with {} diagnostic(s):", diags.len())?;
                for diag in diags {
                    write!(f, "  [{:?}] {}", diag.severity, diag.summary)?;
                    if let Some(detail) = &diag.detail {
                        write!(f, ": {}", detail)?;
                    }
                    if let Some(attr) = &diag.attribute {
                        write!(f, " (at {})", attr)?;
                    }
                    writeln!(f)?;
                }
                Ok(())
            },
            TestError::Provider(e) => write!(f, "Provider error: {}", e),
            TestError::Removed => write!(f, "Resource was removed from state"),
        }
    }
}

impl std::error::Error for TestError {}

impl From<ProviderError> for TestError {
    fn from(e: ProviderError) -> Self {
        TestError::Provider(e)
    }
}

/// Pass the diagnostics through unless one of them is an error.
fn check_diagnostics(diagnostics: Vec<Diagnostic>) -> Result<Vec<Diagnostic>, TestError> {
    if diagnostics.iter().any(Diagnostic::is_error) {
        Err(TestError::Diagnostics(
            diagnostics
                .into_iter()
                .filter(Diagnostic::is_error)
                .collect(),
        ))
    } else {
        Ok(diagnostics)
    }
}

// =========================================================================
// Assertion Helpers
// =========================================================================

/// Assert that a plan result indicates no changes.
///
/// # Panics
///
/// Panics if the plan has any changes.
pub fn assert_plan_no_changes(plan: &PlanResult) {
    assert!(
        plan.changes.is_empty(),
        "Expected no changes, but got {} change(s): {:?}",
        plan.changes.len(),
        plan.changes.iter().map(|c| &c.path).collect::<Vec<_>>()
    );
}

/// Assert that a plan requires resource replacement.
///
/// # Panics
///
/// Panics if the plan does not require replacement.
pub fn assert_plan_replaces(plan: &PlanResult) {
    assert!(
        plan.requires_replace,
        "Expected plan to require replacement, but it does not"
    );
}

/// Assert that a plan has a change for a specific attribute path.
///
/// # Panics
///
/// Panics if the plan does not have a change for the given path.
pub fn assert_plan_changes_attribute(plan: &PlanResult, path: &str) {
    let has_change = plan.changes.iter().any(|c| c.path == path);
    assert!(
        has_change,
        "Expected plan to change attribute '{}', but it was not changed. Changed attributes: {:?}",
        path,
        plan.changes.iter().map(|c| &c.path).collect::<Vec<_>>()
    );
}

/// Assert that diagnostics contain no errors.
///
/// # Panics
///
/// Panics if there are any error diagnostics.
pub fn assert_no_errors(diagnostics: &[Diagnostic]) {
    let errors: Vec<_> = diagnostics.iter().filter(|d| d.is_error()).collect();

    assert!(
        errors.is_empty(),
        "Expected no errors, but got {} error(s): {:?}",
        errors.len(),
        errors.iter().map(|d| &d.summary).collect::<Vec<_>>()
    );
}

/// Assert that diagnostics contain an error with the given summary substring.
///
/// # Panics
///
/// Panics if no error diagnostic contains the given substring.
pub fn assert_error_contains(diagnostics: &[Diagnostic], substring: &str) {
    let has_matching_error = diagnostics
        .iter()
        .any(|d| d.is_error() && d.summary.contains(substring));

    assert!(
        has_matching_error,
        "Expected an error containing '{}', but no matching error found. Errors: {:?}",
        substring,
        diagnostics
            .iter()
            .filter(|d| d.is_error())
            .map(|d| &d.summary)
            .collect::<Vec<_>>()
    );
}

/// Assert that diagnostics contain a warning with the given summary substring.
///
/// # Panics
///
/// Panics if no warning diagnostic contains the given substring.
pub fn assert_warning_contains(diagnostics: &[Diagnostic], substring: &str) {
    let has_matching_warning = diagnostics
        .iter()
        .filter(|d| matches!(d.severity, DiagnosticSeverity::Warning))
        .any(|d| d.summary.contains(substring));

    assert!(
        has_matching_warning,
        "Expected a warning containing '{}', but got: {:?}",
        substring,
        diagnostics.iter().map(|d| &d.summary).collect::<Vec<_>>()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UNKNOWN_VALUE;

    const UNREACHABLE_HOST: &str = "https://localhost:1443";

    async fn tester() -> ProviderTester<PingDirectoryProvider> {
        // Planning never reaches the server.
        let provider = configured_provider(UNREACHABLE_HOST).await.unwrap();
        ProviderTester::new(provider)
    }

    #[tokio::test]
    async fn test_tester_resource_types() {
        let tester = tester().await;
        assert_eq!(
            tester.resource_types(),
            vec!["pingdirectory_backend", "pingdirectory_default_backend"]
        );
        assert_eq!(
            tester.data_source_types(),
            vec!["pingdirectory_backend", "pingdirectory_backends"]
        );
        let schema = tester.schema();
        assert!(schema.resources.contains_key("pingdirectory_backend"));
    }

    #[tokio::test]
    async fn test_tester_plan_create() {
        let tester = tester().await;
        let plan = tester
            .plan_create(
                "pingdirectory_backend",
                json!({
                    "backend_id": "userRoot",
                    "type": "local-db",
                    "enabled": true,
                    "base_dn": ["dc=example,dc=com"]
                }),
            )
            .await
            .unwrap();

        assert_plan_changes_attribute(&plan, "base_dn");
        assert_eq!(plan.planned_state["db_directory"], "db");
        assert_eq!(plan.planned_state["java_class"], UNKNOWN_VALUE);
    }

    #[tokio::test]
    async fn test_tester_plan_update_no_changes() {
        let tester = tester().await;
        let config = json!({"backend_id": "alarms", "type": "alarm", "enabled": true});
        let created = tester
            .plan_create("pingdirectory_default_backend", config.clone())
            .await
            .unwrap()
            .planned_state;
        // Settle the unknowns the way a create would.
        let mut state = created.clone();
        for (_, value) in state.as_object_mut().unwrap().iter_mut() {
            if *value == json!(UNKNOWN_VALUE) {
                *value = Value::Null;
            }
        }
        state["notifications"] = json!([]);
        state["required_actions"] = json!([]);

        let plan = tester
            .plan_update("pingdirectory_default_backend", state, config)
            .await
            .unwrap();
        assert_plan_no_changes(&plan);
    }

    #[tokio::test]
    async fn test_tester_plan_replace() {
        let tester = tester().await;
        let prior = json!({"id": "alarms", "backend_id": "alarms", "type": "alarm"});
        let plan = tester
            .plan_update(
                "pingdirectory_default_backend",
                prior,
                json!({"backend_id": "alerts", "type": "alarm"}),
            )
            .await
            .unwrap();
        assert_plan_replaces(&plan);
    }

    #[test]
    fn test_assert_no_errors() {
        let diagnostics = vec![Diagnostic::warning("Just a warning")];
        assert_no_errors(&diagnostics);
        assert_warning_contains(&diagnostics, "warning");
    }

    #[test]
    #[should_panic(expected = "Expected no errors")]
    fn test_assert_no_errors_fails() {
        let diagnostics = vec![Diagnostic::error("An error")];
        assert_no_errors(&diagnostics);
    }

    #[test]
    fn test_assert_error_contains() {
        let diagnostics = vec![Diagnostic::error("Invalid Attribute Combination")];
        assert_error_contains(&diagnostics, "Invalid");
        assert_error_contains(&diagnostics, "Combination");
    }

    #[test]
    fn test_check_diagnostics() {
        let warnings = check_diagnostics(vec![Diagnostic::warning("w")]).unwrap();
        assert_eq!(warnings.len(), 1);

        let mixed = vec![Diagnostic::warning("w"), Diagnostic::error("e")];
        match check_diagnostics(mixed).unwrap_err() {
            TestError::Diagnostics(errors) => assert_eq!(errors.len(), 1),
            other => panic!("unexpected {}", other),
        }
    }

    #[test]
    fn test_test_error_display() {
        let err = TestError::Diagnostics(vec![
            Diagnostic::error("First error").with_attribute("field1"),
            Diagnostic::error("Second error").with_detail("More info"),
        ]);

        let display = format!("{}", err);
        assert!(display.contains("First error"));
        assert!(display.contains("Second error"));
        assert!(display.contains("field1"));
        assert!(display.contains("More info"));
    }
}
