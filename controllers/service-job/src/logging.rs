//! Diagnostic logging setup.
//!
//! Logs go to stderr; stdout is reserved for the status lines.

use tracing_subscriber::filter::{EnvFilter, LevelFilter};

/// Installs the global tracing subscriber (`RUST_LOG` overrides the `info` default).
pub fn init() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}
