//! Startup sequencing for the execution agent.
//!
//! Startup is fail-fast: telemetry first so later failures are logged, then
//! the wire layout check, then the device and signal handlers. Only when all
//! of those hold does the poll loop start.

use bloch_protocol::LayoutError;
use bloch_sim::StatevectorBackend;
use thiserror::Error;
use tracing::{error, info};

use crate::agent::PollAgent;
use crate::config::Config;
use crate::device::{DeviceOpenError, QuantumDevice};
use crate::executor::TaskExecutor;
use crate::shutdown::{ShutdownError, ShutdownFlag};
use crate::telemetry::{self, TelemetryError};

const LAUNCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::launch");

/// Errors that abort startup before the poll loop begins.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// Telemetry could not be initialised.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        /// Underlying telemetry failure.
        #[source]
        source: TelemetryError,
    },
    /// The compiled record layouts disagree with the device contract.
    #[error("refusing to start: {source}")]
    Layout {
        /// The mismatches found.
        #[source]
        source: LayoutError,
    },
    /// Signal handlers could not be installed.
    #[error("failed to prepare shutdown handling: {source}")]
    Shutdown {
        /// Underlying registration failure.
        #[source]
        source: ShutdownError,
    },
    /// The task device could not be opened.
    #[error("failed to open the task device: {source}")]
    Device {
        /// Underlying open failure.
        #[source]
        source: DeviceOpenError,
    },
}

impl From<TelemetryError> for LaunchError {
    fn from(source: TelemetryError) -> Self {
        Self::Telemetry { source }
    }
}

impl From<LayoutError> for LaunchError {
    fn from(source: LayoutError) -> Self {
        Self::Layout { source }
    }
}

impl From<ShutdownError> for LaunchError {
    fn from(source: ShutdownError) -> Self {
        Self::Shutdown { source }
    }
}

impl From<DeviceOpenError> for LaunchError {
    fn from(source: DeviceOpenError) -> Self {
        Self::Device { source }
    }
}

/// Runs the agent to completion.
pub fn run_agent(config: &Config) -> Result<(), LaunchError> {
    let _telemetry = telemetry::initialise(config)?;
    info!(
        target: LAUNCH_TARGET,
        version = env!("CARGO_PKG_VERSION"),
        device = %config.device_path(),
        "starting execution agent"
    );

    if let Err(source) = bloch_protocol::verify_wire_layout() {
        for mismatch in source.mismatches() {
            error!(
                target: LAUNCH_TARGET,
                record = mismatch.record,
                expected = mismatch.expected,
                actual = mismatch.actual,
                "wire record size mismatch"
            );
        }
        return Err(LaunchError::Layout { source });
    }

    let device = QuantumDevice::open(config.device_path())?;
    let shutdown = ShutdownFlag::new();
    shutdown.install_signal_handlers()?;

    let backend = match config.sampler_seed() {
        Some(seed) => StatevectorBackend::with_seed(seed),
        None => StatevectorBackend::new(),
    };
    let mut agent = PollAgent::new(
        device,
        TaskExecutor::new(backend),
        config.poll_interval(),
        shutdown,
    );
    agent.run();

    info!(target: LAUNCH_TARGET, "agent stopped");
    Ok(())
}
