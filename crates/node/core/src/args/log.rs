//! Logging CLI arguments.

use clap::Args;
use serde::{Deserialize, Serialize};

/// Logging configuration.
#[derive(Debug, Args, Clone, Default, Serialize, Deserialize)]
#[command(next_help_heading = "Logging")]
#[serde(default)]
pub struct LogArgs {
    /// Silence all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (-v, -vv, etc.).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    #[serde(skip)] // CLI-only, count action doesn't make sense in config
    pub verbosity: u8,

    /// Log filter directive (e.g., "netswitch_switch=debug").
    #[arg(long = "log.filter", value_name = "DIRECTIVE", global = true)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,

    /// Use JSON format for log output.
    #[arg(long = "log.json", global = true)]
    pub json: bool,
}

impl LogArgs {
    /// Base level implied by the verbosity count.
    pub fn base_level(&self) -> &'static str {
        match self.verbosity {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_level() {
        let mut args = LogArgs::default();
        assert_eq!(args.base_level(), "info");
        args.verbosity = 1;
        assert_eq!(args.base_level(), "debug");
        args.verbosity = 4;
        assert_eq!(args.base_level(), "trace");
    }
}
