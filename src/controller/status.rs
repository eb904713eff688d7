//! Status bookkeeping for NangoIntegration resources
//!
//! [`apply`] computes the next status from the previous one without side
//! effects; [`IntegrationStore::patch_status`] persists it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kube::{
    api::{Api, Patch, PatchParams},
    Client,
};
use tracing::instrument;

use crate::crd::{Condition, IntegrationPhase, NangoIntegration, NangoIntegrationStatus};
use crate::error::{Error, Result};

use super::conditions::{
    upsert_condition, CONDITION_STATUS_FALSE, CONDITION_STATUS_TRUE, CONDITION_TYPE_READY,
    REASON_INTEGRATION_CREATED, REASON_INTEGRATION_CREATION_FAILED,
};

pub const FIELD_MANAGER: &str = "nango-operator";

/// Loads desired state and persists observed status
#[async_trait]
pub trait IntegrationStore: Send + Sync {
    /// Fetch the integration, `None` if it no longer exists
    async fn get(&self, namespace: &str, name: &str) -> Result<Option<NangoIntegration>>;

    /// Replace the status sub-resource
    async fn patch_status(
        &self,
        namespace: &str,
        name: &str,
        status: &NangoIntegrationStatus,
    ) -> Result<()>;
}

/// [`IntegrationStore`] backed by the Kubernetes API
#[derive(Clone)]
pub struct KubeIntegrationStore {
    client: Client,
}

impl KubeIntegrationStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IntegrationStore for KubeIntegrationStore {
    async fn get(&self, namespace: &str, name: &str) -> Result<Option<NangoIntegration>> {
        let api: Api<NangoIntegration> = Api::namespaced(self.client.clone(), namespace);
        api.get_opt(name).await.map_err(Error::KubeError)
    }

    async fn patch_status(
        &self,
        namespace: &str,
        name: &str,
        status: &NangoIntegrationStatus,
    ) -> Result<()> {
        let api: Api<NangoIntegration> = Api::namespaced(self.client.clone(), namespace);
        let patch = serde_json::json!({ "status": status });

        api.patch_status(name, &PatchParams::apply(FIELD_MANAGER), &Patch::Merge(&patch))
            .await
            .map_err(|source| Error::PersistenceError {
                namespace: namespace.to_string(),
                name: name.to_string(),
                source,
            })?;

        Ok(())
    }
}

/// Ready condition describing `phase`
pub fn ready_condition(
    phase: IntegrationPhase,
    error_message: &str,
    now: DateTime<Utc>,
) -> Condition {
    let (status, reason, message) = match phase {
        IntegrationPhase::Created => (
            CONDITION_STATUS_TRUE,
            REASON_INTEGRATION_CREATED,
            "Integration successfully created".to_string(),
        ),
        IntegrationPhase::Failed => (
            CONDITION_STATUS_FALSE,
            REASON_INTEGRATION_CREATION_FAILED,
            format!("Failed to create integration: {error_message}"),
        ),
    };

    Condition {
        type_: CONDITION_TYPE_READY.to_string(),
        status: status.to_string(),
        last_transition_time: now.to_rfc3339(),
        reason: reason.to_string(),
        message,
        observed_generation: None,
    }
}

/// Next status after a pass that ended in `phase`.
///
/// `integration_id` replaces the recorded id when Nango reported one.
pub fn apply(
    mut status: NangoIntegrationStatus,
    phase: IntegrationPhase,
    error_message: &str,
    integration_id: Option<&str>,
    now: DateTime<Utc>,
) -> NangoIntegrationStatus {
    status.status = Some(phase);
    status.error_message = error_message.to_string();
    status.last_updated = Some(now.to_rfc3339());
    if let Some(id) = integration_id {
        status.integration_id = id.to_string();
    }

    upsert_condition(
        &mut status.conditions,
        ready_condition(phase, error_message, now),
    );
    status
}

/// Apply the outcome to `integration`'s current status and persist it
#[instrument(skip(store, integration, error_message))]
pub async fn record<I: IntegrationStore + ?Sized>(
    store: &I,
    namespace: &str,
    name: &str,
    integration: &NangoIntegration,
    phase: IntegrationPhase,
    error_message: &str,
    integration_id: Option<&str>,
) -> Result<NangoIntegrationStatus> {
    let status = apply(
        integration.status.clone().unwrap_or_default(),
        phase,
        error_message,
        integration_id,
        Utc::now(),
    );

    store.patch_status(namespace, name, &status).await?;
    Ok(status)
}
