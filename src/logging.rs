//! Diagnostic logging.
//!
//! Everything the pipeline reports while running (task start/finish, each
//! written file, recovered config problems, failures) goes through `tracing`
//! to stderr. Result listings for the user are printed to stdout by
//! [`output`](crate::output) instead, so the two can be separated.
//!
//! Priority: `RUST_LOG` > `--verbose` > default `info`.

use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_LEVEL: &str = "info";

/// Build the filter for the given verbosity.
pub fn filter(verbose: bool) -> EnvFilter {
    if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new(DEFAULT_LOG_LEVEL)
    }
}

/// Install the global subscriber. Call once, before any work starts.
pub fn init(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_names(verbose)
        .compact()
        .init();

    tracing::debug!(
        app = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
        "Logging initialised"
    );
}
