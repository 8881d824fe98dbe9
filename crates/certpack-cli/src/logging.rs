//! Diagnostic logging setup.
//!
//! The core library reports through `tracing`; this installs the subscriber
//! that prints those events to stderr.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset and no flag changes it.
const DEFAULT_FILTER: &str = "certpack_core=warn";

/// Filter used with `--verbose` when `RUST_LOG` is unset.
const VERBOSE_FILTER: &str = "certpack_core=debug,certpack=debug";

/// Filter directives for the given flags. `--quiet` wins over `--verbose`.
fn default_directives(verbose: bool, quiet: bool) -> &'static str {
    match (verbose, quiet) {
        (_, true) => "off",
        (true, false) => VERBOSE_FILTER,
        (false, false) => DEFAULT_FILTER,
    }
}

/// Installs the global subscriber.
///
/// `RUST_LOG` always wins. Without it, warnings and errors from the core are
/// shown, `--verbose` adds debug events and `--quiet` turns logging off.
pub fn init(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose, quiet)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
