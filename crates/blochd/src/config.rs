//! Runtime configuration assembled from the command line.

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use clap::ValueEnum;

use crate::cli::Cli;

/// Supported telemetry output formats.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable single-line output.
    #[default]
    Compact,
    /// Structured JSON suitable for ingestion by logging stacks.
    Json,
}

/// Runtime settings for the agent process.
#[derive(Debug, Clone)]
pub struct Config {
    device_path: Utf8PathBuf,
    poll_interval: Duration,
    log_filter: String,
    log_format: LogFormat,
    sampler_seed: Option<u64>,
}

impl Config {
    /// Path of the scheduler character device.
    #[must_use]
    pub fn device_path(&self) -> &Utf8Path {
        &self.device_path
    }

    /// Sleep between polls while no task is available.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Filter expression handed to the telemetry subscriber.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Selected telemetry output format.
    #[must_use]
    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Fixed sampling seed, when reproducible runs were requested.
    #[must_use]
    pub fn sampler_seed(&self) -> Option<u64> {
        self.sampler_seed
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device_path: Utf8PathBuf::from("/dev/quantum"),
            poll_interval: Duration::from_millis(500),
            log_filter: "info".to_owned(),
            log_format: LogFormat::default(),
            sampler_seed: None,
        }
    }
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        let log_filter = match (cli.log_filter, cli.verbose) {
            (Some(filter), _) => filter,
            (None, true) => "debug".to_owned(),
            (None, false) => "info".to_owned(),
        };
        Self {
            device_path: cli.device,
            poll_interval: Duration::from_millis(cli.interval_ms),
            log_filter,
            log_format: cli.log_format,
            sampler_seed: cli.seed,
        }
    }
}
