//! Shared types for the NangoIntegration CRD

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A value that is either given inline or read from a Kubernetes Secret.
///
/// The wire shape keeps both fields optional for compatibility with existing
/// manifests; use [`SecretOrValue::source`] to get the effective variant.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SecretOrValue {
    /// Literal value (mutually exclusive with `secretKeyRef`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Reference to a key in a Secret in the resource's namespace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key_ref: Option<SecretKeyRef>,
}

/// Selects a key of a Secret
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub struct SecretKeyRef {
    /// Name of the Secret
    pub name: String,
    /// Key within the Secret's data
    pub key: String,
}

/// Effective source of a [`SecretOrValue`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueSource<'a> {
    Literal(&'a str),
    SecretRef(&'a SecretKeyRef),
    Unspecified,
}

impl SecretOrValue {
    pub fn literal(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            secret_key_ref: None,
        }
    }

    pub fn secret_ref(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            value: None,
            secret_key_ref: Some(SecretKeyRef {
                name: name.into(),
                key: key.into(),
            }),
        }
    }

    /// A non-empty literal always wins over a secret reference.
    pub fn source(&self) -> ValueSource<'_> {
        match (self.value.as_deref(), &self.secret_key_ref) {
            (Some(v), _) if !v.is_empty() => ValueSource::Literal(v),
            (_, Some(r)) => ValueSource::SecretRef(r),
            _ => ValueSource::Unspecified,
        }
    }
}

/// OAuth credentials registered with the provider
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub struct NangoCredentials {
    /// Authentication type (e.g. OAUTH1, OAUTH2)
    #[serde(rename = "type")]
    pub type_: String,
    pub client_id: SecretOrValue,
    pub client_secret: SecretOrValue,
    /// Space or comma separated scopes requested from the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scopes: Option<String>,
}

/// Outcome of the last reconcile pass
#[derive(Clone, Copy, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub enum IntegrationPhase {
    Created,
    Failed,
}

impl IntegrationPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntegrationPhase::Created => "Created",
            IntegrationPhase::Failed => "Failed",
        }
    }
}

impl std::fmt::Display for IntegrationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Standard Kubernetes condition
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Type of condition (only "Ready" is produced)
    #[serde(rename = "type")]
    pub type_: String,
    /// Status of the condition: "True", "False", or "Unknown"
    pub status: String,
    /// Last time the condition's status changed (RFC3339)
    pub last_transition_time: String,
    /// Machine-readable reason for the condition
    pub reason: String,
    /// Human-readable message
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,
}
