//! Wire types for the Nango integrations API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /integrations`
#[derive(Clone, Serialize, PartialEq, Eq)]
pub struct CreateIntegrationRequest {
    pub unique_key: String,
    pub provider: String,
    pub display_name: String,
    pub credentials: IntegrationCredentials,
}

/// Resolved OAuth credentials sent to Nango
#[derive(Clone, Serialize, PartialEq, Eq)]
pub struct IntegrationCredentials {
    #[serde(rename = "type")]
    pub type_: String,
    pub client_id: String,
    pub client_secret: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scopes: Option<String>,
}

impl std::fmt::Debug for CreateIntegrationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateIntegrationRequest")
            .field("unique_key", &self.unique_key)
            .field("provider", &self.provider)
            .field("display_name", &self.display_name)
            .field("credentials", &self.credentials)
            .finish()
    }
}

impl std::fmt::Debug for IntegrationCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntegrationCredentials")
            .field("type_", &self.type_)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("scopes", &self.scopes)
            .finish()
    }
}

/// Integration as returned by Nango
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct IntegrationRecord {
    pub unique_key: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Response body carrying one integration, either wrapped in `{"data": ...}`
/// or as the bare record
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum IntegrationBody {
    Wrapped { data: IntegrationRecord },
    Bare(IntegrationRecord),
}

impl IntegrationBody {
    pub fn into_record(self) -> IntegrationRecord {
        match self {
            IntegrationBody::Wrapped { data } | IntegrationBody::Bare(data) => data,
        }
    }
}
