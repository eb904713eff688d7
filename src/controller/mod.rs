//! Controller module for NangoIntegration reconciliation
//!
//! Contains the controller loop, the reconcile pass, secret resolution and
//! status bookkeeping.

pub mod conditions;
#[cfg(feature = "metrics")]
pub mod metrics;
mod reconciler;
pub mod secrets;
pub mod status;

pub use reconciler::{
    requeue_action, run_controller, ControllerState, IntegrationReconciler, OperatorConfig,
    PassFailure, FAILURE_REQUEUE,
};
pub use secrets::{resolve_value, KubeSecretStore, ResolutionError, SecretStore};
pub use status::{IntegrationStore, KubeIntegrationStore};
