//! nango-operator: Kubernetes operator for Nango integrations
//!
//! Watches `NangoIntegration` resources, resolves their OAuth credentials
//! (inline or from Secrets) and makes sure a matching integration exists in
//! Nango, reporting the outcome on the resource's status.

pub mod controller;
pub mod crd;
pub mod error;
pub mod nango;
pub mod telemetry;

#[cfg(feature = "rest-api")]
pub mod rest_api;

pub use crate::error::{Error, Result};
