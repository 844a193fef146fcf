//! Log output for hosts that don't install their own subscriber.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
///
/// Warnings only: in pass-and-play the log shares a screen with players
/// who must not see round details.
pub const DEFAULT_FILTER: &str = "warn";

/// Installs a `fmt` subscriber writing to stderr.
///
/// `RUST_LOG` controls verbosity, e.g. `RUST_LOG=spyfall_session=debug`.
/// Does nothing if a global subscriber is already set.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
