//! Error types for the Nango operator
//!
//! Only failures the operator cannot express as integration status end up
//! here. Secret resolution and Nango API failures are recorded on the
//! `NangoIntegration` status instead (see `controller::reconciler`).

use thiserror::Error;

/// Hard reconcile errors, handed to the controller's error policy
#[derive(Error, Debug)]
pub enum Error {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Failed to persist status for {namespace}/{name}: {source}")]
    PersistenceError {
        namespace: String,
        name: String,
        #[source]
        source: kube::Error,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl Error {
    /// Whether a quick requeue is likely to succeed
    pub fn is_retriable(&self) -> bool {
        match self {
            Error::KubeError(e) | Error::PersistenceError { source: e, .. } => {
                !matches!(e, kube::Error::Api(resp) if resp.code == 403 || resp.code == 422)
            }
            Error::ConfigError(_) => false,
        }
    }

    /// Short label used for the `kind` metric dimension
    pub fn kind(&self) -> &'static str {
        match self {
            Error::KubeError(_) => "kube",
            Error::PersistenceError { .. } => "persistence",
            Error::ConfigError(_) => "config",
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
