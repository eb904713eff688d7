//! Client for the Nango integrations API
//!
//! Calls are single-attempt; retrying is left to the reconciler.

mod client;
pub mod types;

pub use client::{NangoClient, ProviderError, DEFAULT_BASE_URL, HTTP_TIMEOUT};
pub use types::{CreateIntegrationRequest, IntegrationCredentials, IntegrationRecord};
