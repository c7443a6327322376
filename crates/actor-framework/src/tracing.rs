//! # Tracing Setup
//!
//! Actors log with structured fields (`entity_type`, `id`, `size`) at two levels:
//!
//! - `info`: lifecycle and mutations (`Actor started`, `Created`, `Updated`,
//!   `Action ok`, `Shutdown`)
//! - `debug`: every request with its payload
//!
//! ```bash
//! RUST_LOG=info cargo run
//! RUST_LOG=actor_framework=debug,roastbrew=debug cargo run
//! ```

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info";

/// Installs the global fmt subscriber, filtered by `RUST_LOG`.
///
/// Safe to call more than once; later calls are ignored, which lets tests call
/// it freely.
pub fn setup_tracing() {
    setup_tracing_with_default(DEFAULT_FILTER);
}

/// Same as [`setup_tracing`] but with a caller-supplied fallback filter.
pub fn setup_tracing_with_default(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();
}
