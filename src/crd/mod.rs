//! Custom Resource Definitions for the Nango operator

mod nango_integration;
pub mod types;

#[cfg(test)]
mod tests;

pub use nango_integration::{
    NangoIntegration, NangoIntegrationSpec, NangoIntegrationStatus, SpecValidationError,
};
pub use types::*;
