//! Userspace execution agent for the quantum task scheduler.
//!
//! The privileged scheduler admits circuit jobs, splits oversized ones, and
//! exposes runnable tasks through a character device. This agent is the
//! execution half of that protocol: it validates the compiled wire contract,
//! opens the device, and drives a fetch-execute-commit loop until a
//! termination signal arrives. Each fetched record is decoded into a
//! [`bloch_protocol::TaskRequest`], executed against a
//! [`bloch_sim::Simulator`], and committed back as a
//! [`bloch_protocol::CommitResult`] with failures classified in-band; the
//! scheduler reclaims tasks whose results never arrive.
//!
//! The agent is deliberately serial. One task is in flight at a time, the
//! shutdown flag is polled only between tasks, and scaling out means running
//! more agent processes.

mod agent;
mod cli;
mod config;
mod device;
mod executor;
mod launch;
mod shutdown;
mod telemetry;

pub use agent::PollAgent;
pub use cli::Cli;
pub use config::{Config, LogFormat};
pub use device::{DeviceChannel, DeviceError, DeviceOpenError, QuantumDevice};
pub use executor::TaskExecutor;
pub use launch::{LaunchError, run_agent};
pub use shutdown::{ShutdownError, ShutdownFlag};
pub use telemetry::{TelemetryError, TelemetryHandle};
