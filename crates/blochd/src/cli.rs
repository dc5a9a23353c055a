//! Command-line surface for the execution agent.

use camino::Utf8PathBuf;
use clap::Parser;

use crate::config::LogFormat;

/// Userspace execution agent for the quantum task scheduler.
#[derive(Parser, Debug)]
#[command(name = "blochd", version, about)]
pub struct Cli {
    /// Path to the scheduler character device.
    #[arg(long, default_value = "/dev/quantum")]
    pub device: Utf8PathBuf,
    /// Idle poll interval in milliseconds.
    #[arg(long = "interval-ms", value_name = "MILLIS", default_value_t = 500)]
    pub interval_ms: u64,
    /// Lowers the log threshold to debug.
    #[arg(short, long)]
    pub verbose: bool,
    /// Telemetry output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
    /// Explicit log filter expression; overrides --verbose.
    #[arg(long, value_name = "FILTER")]
    pub log_filter: Option<String>,
    /// Fixed seed for measurement sampling; omit for a clock seed.
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_flags() {
        let cli = Cli::parse_from(["blochd"]);
        assert_eq!(cli.device, Utf8PathBuf::from("/dev/quantum"));
        assert_eq!(cli.interval_ms, 500);
        assert!(!cli.verbose);
        assert_eq!(cli.log_format, LogFormat::Compact);
        assert!(cli.log_filter.is_none());
        assert!(cli.seed.is_none());
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "blochd",
            "--device",
            "/dev/quantum1",
            "--interval-ms",
            "50",
            "--verbose",
            "--log-format",
            "json",
            "--seed",
            "17",
        ]);
        assert_eq!(cli.device, Utf8PathBuf::from("/dev/quantum1"));
        assert_eq!(cli.interval_ms, 50);
        assert!(cli.verbose);
        assert_eq!(cli.log_format, LogFormat::Json);
        assert_eq!(cli.seed, Some(17));
    }
}
