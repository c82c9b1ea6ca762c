//! ProxyIP Checker - batch liveness checker for proxy lists
//!
//! Reads a list of candidate proxies, validates each one against a remote
//! proxy-check API with bounded concurrency, keeps only the alive ones and
//! publishes them grouped by country and by country + provider.

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod proxy;

pub use config::Config;
pub use error::{CheckError, RunError};
pub use pipeline::{run, RunSummary};
pub use proxy::*;

/// Application result type
pub type Result<T> = anyhow::Result<T>;

/// Install the global `tracing` subscriber.
///
/// Honors `RUST_LOG`; falls back to `info` so per-proxy progress lines are
/// visible by default.
pub fn init_logger() {
    use tracing_subscriber::{fmt, EnvFilter};

    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();
}
