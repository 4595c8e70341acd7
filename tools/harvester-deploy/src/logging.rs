//! Tracing setup shared by every entry point.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "warn";

/// Install the fmt subscriber
///
/// Logs go to stderr so prompts and progress on stdout stay readable.
/// Also loads a `.env` file if present so `OVH_*` variables can live there.
pub fn init() {
    // A missing .env is the common case
    let _ = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
