//! Logging setup for the keel CLI.
//!
//! Structured logging via the `tracing` ecosystem: `--verbose` raises keel
//! crates to debug, `--quiet` drops to errors only, and `RUST_LOG` can
//! override everything in between.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global tracing subscriber. Call once, before any logging.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let filter = if verbose {
        EnvFilter::new("keel_cli=debug,keel_bundler=debug")
    } else if quiet {
        EnvFilter::new("keel_cli=error,keel_bundler=error")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("keel_cli=info,keel_bundler=info"))
    };

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    // The subscriber is global and can only be installed once per process,
    // so these only exercise filter construction.

    #[test]
    fn verbose_filter_parses() {
        let _ = EnvFilter::new("keel_cli=debug,keel_bundler=debug");
    }

    #[test]
    fn quiet_filter_parses() {
        let _ = EnvFilter::new("keel_cli=error,keel_bundler=error");
    }
}
