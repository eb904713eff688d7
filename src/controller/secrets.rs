//! Resolution of [`SecretOrValue`] fields
//!
//! Literal values are returned as-is; references are read from Kubernetes
//! Secrets in the NangoIntegration's own namespace. Resolved values are never
//! logged.

use std::collections::BTreeMap;

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::{Api, Client};
use thiserror::Error;
use tracing::debug;

use crate::crd::{SecretOrValue, ValueSource};

/// Why a [`SecretOrValue`] could not be turned into a string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("secret {name} not found")]
    NotFound { name: String },

    #[error("key {key} not found in secret {name}")]
    KeyMissing { name: String, key: String },

    #[error("neither value nor secretKeyRef provided")]
    Unspecified,

    #[error("failed to get secret {name}: {message}")]
    Lookup { name: String, message: String },
}

/// Read access to namespaced secret data
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Data of secret `name` in `namespace`, `None` if the secret does not exist
    async fn secret_data(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<BTreeMap<String, Vec<u8>>>, ResolutionError>;
}

/// [`SecretStore`] backed by the Kubernetes API
#[derive(Clone)]
pub struct KubeSecretStore {
    client: Client,
}

impl KubeSecretStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SecretStore for KubeSecretStore {
    async fn secret_data(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<BTreeMap<String, Vec<u8>>>, ResolutionError> {
        let api: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
        let secret = api.get_opt(name).await.map_err(|e| ResolutionError::Lookup {
            name: name.to_string(),
            message: e.to_string(),
        })?;

        Ok(secret.map(|s| {
            s.data
                .unwrap_or_default()
                .into_iter()
                .map(|(k, v)| (k, v.0))
                .collect()
        }))
    }
}

/// Resolve `source` to its plain value
pub async fn resolve_value<S: SecretStore + ?Sized>(
    store: &S,
    namespace: &str,
    source: &SecretOrValue,
) -> Result<String, ResolutionError> {
    match source.source() {
        ValueSource::Literal(value) => Ok(value.to_string()),
        ValueSource::SecretRef(reference) => {
            debug!(
                namespace,
                secret = %reference.name,
                key = %reference.key,
                "Resolving value from secret"
            );

            let data = store
                .secret_data(namespace, &reference.name)
                .await?
                .ok_or_else(|| ResolutionError::NotFound {
                    name: reference.name.clone(),
                })?;

            data.get(&reference.key)
                .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
                .ok_or_else(|| ResolutionError::KeyMissing {
                    name: reference.name.clone(),
                    key: reference.key.clone(),
                })
        }
        ValueSource::Unspecified => Err(ResolutionError::Unspecified),
    }
}
