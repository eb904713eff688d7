//! NangoIntegration Custom Resource Definition
//!
//! A NangoIntegration declares an integration (provider + OAuth app
//! credentials) that should exist in a Nango environment.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::types::{Condition, IntegrationPhase, NangoCredentials, SecretOrValue};

/// Structured validation error for `NangoIntegrationSpec`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpecValidationError {
    pub field: String,
    pub message: String,
}

impl SpecValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for SpecValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(CustomResource, Clone, Debug, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "nango.nango.dev",
    version = "v1alpha1",
    kind = "NangoIntegration",
    namespaced,
    status = "NangoIntegrationStatus",
    shortname = "ni",
    printcolumn = r#"{"name":"Unique Key","type":"string","jsonPath":".spec.unique_key"}"#,
    printcolumn = r#"{"name":"Provider","type":"string","jsonPath":".spec.provider"}"#,
    printcolumn = r#"{"name":"Status","type":"string","jsonPath":".status.status"}"#,
    printcolumn = r#"{"name":"Ready","type":"string","jsonPath":".status.conditions[?(@.type=='Ready')].status"}"#,
    printcolumn = r#"{"name":"Age","type":"date","jsonPath":".metadata.creationTimestamp"}"#
)]
pub struct NangoIntegrationSpec {
    /// Unique key of the integration in Nango
    pub unique_key: String,
    /// Provider name (e.g. "slack", "github")
    pub provider: String,
    pub display_name: String,
    pub credentials: NangoCredentials,
    /// Nango API token
    #[serde(default)]
    pub nango_token: SecretOrValue,
    /// Nango API base URL, defaults to the operator's configured URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nango_base_url: Option<String>,
}

impl NangoIntegrationSpec {
    /// Validate the fields the Nango API cannot work without
    ///
    /// # Errors
    ///
    /// Returns every failing field.
    pub fn validate(&self) -> Result<(), Vec<SpecValidationError>> {
        let mut errors = Vec::new();

        if self.unique_key.trim().is_empty() {
            errors.push(SpecValidationError::new(
                "spec.unique_key",
                "must not be empty",
            ));
        }
        if self.provider.trim().is_empty() {
            errors.push(SpecValidationError::new("spec.provider", "must not be empty"));
        }
        if self.credentials.type_.trim().is_empty() {
            errors.push(SpecValidationError::new(
                "spec.credentials.type",
                "must not be empty",
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Base URL to use, falling back to `default` when unset or blank
    pub fn base_url_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.nango_base_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(default)
    }
}

/// Observed state of a NangoIntegration
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub struct NangoIntegrationStatus {
    /// Identifier of the integration in Nango
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub integration_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<IntegrationPhase>,

    /// Error message from the last failed pass; empty once it succeeds
    #[serde(default)]
    pub error_message: String,

    /// Last time the status was written (RFC3339)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,

    #[serde(default)]
    pub conditions: Vec<Condition>,
}
