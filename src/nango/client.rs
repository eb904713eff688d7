//! HTTP client for the Nango integrations endpoints

use std::time::Duration;

use reqwest::{Client, Response, StatusCode, Url};
use thiserror::Error;
use tracing::{debug, instrument};

use super::types::{CreateIntegrationRequest, IntegrationBody, IntegrationRecord};

/// Base URL used when neither the resource nor the operator configures one
pub const DEFAULT_BASE_URL: &str = "https://api.nango.dev";

/// Connect and request budget applied to every call
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors returned by [`NangoClient`]
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The integration does not exist (HTTP 404 on get)
    #[error("integration {unique_key} not found")]
    NotFound { unique_key: String },

    #[error("request to Nango failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Nango returned status {status}, body: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("failed to decode Nango response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid Nango base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl ProviderError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProviderError::NotFound { .. })
    }
}

/// Nango API client bound to one base URL and API token
#[derive(Clone)]
pub struct NangoClient {
    http: Client,
    base_url: Url,
    token: String,
}

impl std::fmt::Debug for NangoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NangoClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl NangoClient {
    /// Build a client for `base_url` authenticating with `token`
    pub fn new(base_url: &str, token: &str) -> Result<Self, ProviderError> {
        let invalid = |reason: String| ProviderError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };

        let parsed = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if parsed.cannot_be_a_base() {
            return Err(invalid("not a hierarchical URL".to_string()));
        }

        let http = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .connect_timeout(HTTP_TIMEOUT)
            .user_agent(concat!("nango-operator/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: parsed,
            token: token.to_string(),
        })
    }

    /// `GET /integrations/{unique_key}`
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn get_integration(
        &self,
        unique_key: &str,
    ) -> Result<IntegrationRecord, ProviderError> {
        let url = self.endpoint(&["integrations", unique_key]);
        debug!("Fetching integration: {}", url);

        let resp = self.http.get(url).bearer_auth(&self.token).send().await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(ProviderError::NotFound {
                unique_key: unique_key.to_string(),
            });
        }

        decode_record(resp).await
    }

    /// `POST /integrations`
    #[instrument(
        skip(self, request),
        fields(base_url = %self.base_url, unique_key = %request.unique_key)
    )]
    pub async fn create_integration(
        &self,
        request: &CreateIntegrationRequest,
    ) -> Result<IntegrationRecord, ProviderError> {
        let url = self.endpoint(&["integrations"]);
        debug!("Creating integration: {}", url);

        let resp = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .json(request)
            .send()
            .await?;

        decode_record(resp).await
    }

    /// Append path segments to the base URL, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`: the base URL is hierarchical
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

async fn decode_record(resp: Response) -> Result<IntegrationRecord, ProviderError> {
    let status = resp.status();
    let body = resp.text().await?;

    if !status.is_success() {
        return Err(ProviderError::UnexpectedStatus {
            status: status.as_u16(),
            body,
        });
    }

    let body: IntegrationBody = serde_json::from_str(&body)?;
    Ok(body.into_record())
}
