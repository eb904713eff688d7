//! HTTP endpoints for probes and metrics scraping

mod handlers;
mod server;

pub use handlers::HealthResponse;
pub use server::{router, run_server};
