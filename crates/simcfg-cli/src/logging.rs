//! Subscriber setup for the CLI.
//!
//! Library crates only emit `tracing` events; this is where they get printed.

use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "SIMCFG_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber writing to stderr.
///
/// `verbose` forces `debug`; otherwise `SIMCFG_LOG` is honored, falling back
/// to `warn`.
pub fn init(verbose: bool, json: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = if json {
        builder.json().try_init()
    } else {
        builder.with_ansi(std::io::stderr().is_terminal()).try_init()
    };
    if let Err(e) = installed {
        eprintln!("simcfg: logging already initialized: {e}");
    }
}
