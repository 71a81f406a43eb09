//! Logging configuration for netswitch.

use crate::args::LogArgs;
use eyre::{Result, eyre};
use tracing_subscriber::EnvFilter;

/// Build the filter for the given arguments.
///
/// The filter is built with the following precedence:
/// 1. If `--quiet` is set, only errors are shown
/// 2. Otherwise, start with `RUST_LOG` env var if set, or the level implied by `-v`
/// 3. Apply any custom directives from `--log.filter`
pub fn build_filter(args: &LogArgs) -> EnvFilter {
    if args.quiet {
        return EnvFilter::new("error");
    }

    let mut filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.base_level()));

    if let Some(custom_filter) = &args.filter {
        for directive in custom_filter.split(',') {
            match directive.parse() {
                Ok(d) => filter = filter.add_directive(d),
                Err(e) => eprintln!("ignoring invalid log directive {directive:?}: {e}"),
            }
        }
    }

    filter
}

/// Initialize logging based on command line arguments.
pub fn init_logging(args: &LogArgs) -> Result<()> {
    let filter = build_filter(args);

    let result = if args.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .without_time()
            .try_init()
    };

    result.map_err(|e| eyre!("failed to initialize logging: {e}"))
}
