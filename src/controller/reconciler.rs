//! Main reconciler for NangoIntegration resources
//!
//! One pass: load → validate → resolve credentials → probe Nango → create if
//! absent → record status → return the requeue decision. Passes keep no state
//! of their own; everything carried between passes lives in the status.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use kube::{
    api::Api,
    client::Client,
    runtime::{
        controller::{Action, Controller},
        watcher::Config,
    },
    ResourceExt,
};
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

use crate::crd::{IntegrationPhase, NangoIntegration, SecretOrValue};
use crate::error::{Error, Result};
use crate::nango::{
    CreateIntegrationRequest, IntegrationCredentials, IntegrationRecord, NangoClient,
    ProviderError, DEFAULT_BASE_URL,
};

#[cfg(feature = "metrics")]
use super::metrics;
use super::secrets::{resolve_value, KubeSecretStore, ResolutionError, SecretStore};
use super::status::{self, IntegrationStore, KubeIntegrationStore};

/// Delay before retrying a pass that ended in `Failed`
pub const FAILURE_REQUEUE: Duration = Duration::from_secs(5 * 60);

const CONTROLLER_NAME: &str = "nangointegration";

/// Operator-wide settings
#[derive(Clone, Debug)]
pub struct OperatorConfig {
    /// Namespace to watch, all namespaces when `None`
    pub watch_namespace: Option<String>,
    /// Nango base URL for resources that do not set `nango_base_url`
    pub default_base_url: String,
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self {
            watch_namespace: None,
            default_base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Reason a pass ended in the `Failed` phase. The display text is what ends
/// up in `status.error_message`.
#[derive(Error, Debug)]
pub enum PassFailure {
    #[error("invalid spec: {0}")]
    Invalid(String),

    #[error("failed to resolve {field}: {source}")]
    Resolution {
        field: &'static str,
        #[source]
        source: ResolutionError,
    },

    #[error("failed to configure Nango client: {0}")]
    Client(#[source] ProviderError),

    #[error("failed to check for existing integration: {0}")]
    Probe(#[source] ProviderError),

    #[error("failed to create integration: {0}")]
    Create(#[source] ProviderError),
}

/// Converges NangoIntegration resources against the Nango API
pub struct IntegrationReconciler<S, I> {
    secrets: S,
    store: I,
    config: OperatorConfig,
}

impl<S: SecretStore, I: IntegrationStore> IntegrationReconciler<S, I> {
    pub fn new(secrets: S, store: I, config: OperatorConfig) -> Self {
        Self {
            secrets,
            store,
            config,
        }
    }

    pub fn config(&self) -> &OperatorConfig {
        &self.config
    }

    /// Run one reconcile pass for `namespace/name`.
    ///
    /// Failures of the integration itself are recorded on the status and
    /// answered with a requeue; only loading or persisting errors are
    /// returned as `Err`.
    #[instrument(skip(self))]
    pub async fn reconcile(&self, namespace: &str, name: &str) -> Result<Action> {
        let Some(integration) = self.store.get(namespace, name).await? else {
            info!(
                "NangoIntegration {}/{} not found, ignoring since it must have been deleted",
                namespace, name
            );
            return Ok(Action::await_change());
        };

        info!(
            unique_key = %integration.spec.unique_key,
            provider = %integration.spec.provider,
            "Reconciling NangoIntegration {}/{}",
            namespace,
            name
        );

        let (phase, error_message, integration_id) =
            match self.converge(namespace, &integration).await {
                Ok(record) => (IntegrationPhase::Created, String::new(), Some(record.unique_key)),
                Err(failure) => {
                    warn!(
                        unique_key = %integration.spec.unique_key,
                        "Reconcile of {}/{} failed: {}",
                        namespace,
                        name,
                        failure
                    );
                    (IntegrationPhase::Failed, failure.to_string(), None)
                }
            };

        status::record(
            &self.store,
            namespace,
            name,
            &integration,
            phase,
            &error_message,
            integration_id.as_deref(),
        )
        .await?;

        #[cfg(feature = "metrics")]
        metrics::inc_integration_outcome(phase.as_str());

        Ok(requeue_action(phase))
    }

    /// Make sure the integration exists in Nango, creating it when absent
    async fn converge(
        &self,
        namespace: &str,
        integration: &NangoIntegration,
    ) -> std::result::Result<IntegrationRecord, PassFailure> {
        let spec = &integration.spec;

        spec.validate().map_err(|errors| {
            PassFailure::Invalid(
                errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; "),
            )
        })?;

        let client_id = self
            .resolve(namespace, "client ID", &spec.credentials.client_id)
            .await?;
        let client_secret = self
            .resolve(namespace, "client secret", &spec.credentials.client_secret)
            .await?;
        let token = self
            .resolve(namespace, "Nango token", &spec.nango_token)
            .await?;

        let client = NangoClient::new(spec.base_url_or(&self.config.default_base_url), &token)
            .map_err(PassFailure::Client)?;

        match client.get_integration(&spec.unique_key).await {
            Ok(record) => {
                info!(
                    unique_key = %spec.unique_key,
                    "Integration already exists in Nango"
                );
                return Ok(record);
            }
            Err(e) if e.is_not_found() => {
                debug!(unique_key = %spec.unique_key, "Integration not found in Nango");
            }
            Err(e) => return Err(PassFailure::Probe(e)),
        }

        info!(unique_key = %spec.unique_key, "Creating integration in Nango");

        let request = CreateIntegrationRequest {
            unique_key: spec.unique_key.clone(),
            provider: spec.provider.clone(),
            display_name: spec.display_name.clone(),
            credentials: IntegrationCredentials {
                type_: spec.credentials.type_.clone(),
                client_id,
                client_secret,
                scopes: spec.credentials.scopes.clone().filter(|s| !s.is_empty()),
            },
        };

        let record = client
            .create_integration(&request)
            .await
            .map_err(PassFailure::Create)?;

        info!(
            unique_key = %record.unique_key,
            provider = %record.provider,
            "Successfully created integration in Nango"
        );

        Ok(record)
    }

    async fn resolve(
        &self,
        namespace: &str,
        field: &'static str,
        source: &SecretOrValue,
    ) -> std::result::Result<String, PassFailure> {
        resolve_value(&self.secrets, namespace, source)
            .await
            .map_err(|source| PassFailure::Resolution { field, source })
    }
}

/// Requeue decision for the phase a pass ended in
pub fn requeue_action(phase: IntegrationPhase) -> Action {
    match phase {
        IntegrationPhase::Created => Action::await_change(),
        IntegrationPhase::Failed => Action::requeue(FAILURE_REQUEUE),
    }
}

/// Shared state for the controller
pub struct ControllerState {
    pub client: Client,
    pub reconciler: IntegrationReconciler<KubeSecretStore, KubeIntegrationStore>,
}

impl ControllerState {
    pub fn new(client: Client, config: OperatorConfig) -> Self {
        Self {
            reconciler: IntegrationReconciler::new(
                KubeSecretStore::new(client.clone()),
                KubeIntegrationStore::new(client.clone()),
                config,
            ),
            client,
        }
    }
}

/// Main entry point to start the controller
pub async fn run_controller(state: Arc<ControllerState>) -> Result<()> {
    let client = state.client.clone();
    let integrations: Api<NangoIntegration> = match &state.reconciler.config().watch_namespace {
        Some(namespace) => Api::namespaced(client, namespace),
        None => Api::all(client),
    };

    info!(controller = CONTROLLER_NAME, "Starting NangoIntegration controller");

    // Verify CRD exists
    match integrations.list(&Default::default()).await {
        Ok(_) => info!("NangoIntegration CRD is available"),
        Err(e) => {
            error!(
                "NangoIntegration CRD not found. Please install the CRD first: {:?}",
                e
            );
            return Err(Error::ConfigError(
                "NangoIntegration CRD not installed".to_string(),
            ));
        }
    }

    Controller::new(integrations, Config::default())
        .shutdown_on_signal()
        .run(reconcile, error_policy, state)
        .for_each(|res| async move {
            match res {
                Ok((obj, action)) => debug!("Reconciled {}: {:?}", obj, action),
                Err(e) => error!("Reconcile error: {:?}", e),
            }
        })
        .await;

    Ok(())
}

/// Called by the controller whenever a NangoIntegration changes or its
/// requeue timer expires
#[instrument(
    skip(obj, ctx),
    fields(name = %obj.name_any(), namespace = %obj.namespace().unwrap_or_default())
)]
async fn reconcile(obj: Arc<NangoIntegration>, ctx: Arc<ControllerState>) -> Result<Action> {
    let namespace = obj.namespace().unwrap_or_else(|| "default".to_string());
    let name = obj.name_any();

    #[cfg(feature = "metrics")]
    let started = std::time::Instant::now();

    let result = ctx.reconciler.reconcile(&namespace, &name).await;

    #[cfg(feature = "metrics")]
    metrics::observe_reconcile_duration_seconds(CONTROLLER_NAME, started.elapsed().as_secs_f64());

    result
}

/// Error policy determines how to handle reconciliation errors
fn error_policy(obj: Arc<NangoIntegration>, error: &Error, _ctx: Arc<ControllerState>) -> Action {
    error!("Reconciliation error for {}: {:?}", obj.name_any(), error);

    #[cfg(feature = "metrics")]
    metrics::inc_reconcile_error(CONTROLLER_NAME, error.kind());

    let retry_duration = if error.is_retriable() {
        Duration::from_secs(15)
    } else {
        Duration::from_secs(60)
    };

    Action::requeue(retry_duration)
}
