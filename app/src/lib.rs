//! Batch photo stamping application: a folder CLI and an upload form server
//! wrapped around the `image-processor` transform.

pub mod app;
pub mod config;
pub mod server;
pub mod services;

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. `RUST_LOG` overrides the `info` default.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
