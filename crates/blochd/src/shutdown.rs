//! Cooperative shutdown flag latched by termination signals.
//!
//! The agent polls the flag between tasks rather than interrupting work in
//! flight, so a task that has been fetched is always executed and committed
//! before the process exits.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use signal_hook::consts::{SIGINT, SIGTERM};
use thiserror::Error;
use tracing::debug;

const SHUTDOWN_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::shutdown");

/// Errors raised while wiring termination signals to the flag.
#[derive(Debug, Error)]
pub enum ShutdownError {
    /// Registering a signal handler with the runtime failed.
    #[error("failed to install signal handlers: {source}")]
    Install {
        /// Underlying registration failure.
        #[source]
        source: io::Error,
    },
}

/// Shared latch that records a request to stop polling.
///
/// Clones share the same underlying flag, so one handle can be given to the
/// signal handlers while another is polled by the agent loop.
#[derive(Debug, Clone, Default)]
pub struct ShutdownFlag {
    flag: Arc<AtomicBool>,
}

impl ShutdownFlag {
    /// Creates an unset flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Latches the flag when `SIGINT` or `SIGTERM` is delivered.
    pub fn install_signal_handlers(&self) -> Result<(), ShutdownError> {
        for signal in [SIGINT, SIGTERM] {
            signal_hook::flag::register(signal, Arc::clone(&self.flag))
                .map_err(|source| ShutdownError::Install { source })?;
        }
        debug!(target: SHUTDOWN_TARGET, "signal handlers installed");
        Ok(())
    }

    /// Requests shutdown directly, without a signal.
    pub fn request(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Reports whether shutdown has been requested.
    #[must_use]
    pub fn is_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_starts_unset_and_latches_on_request() {
        let flag = ShutdownFlag::new();
        assert!(!flag.is_requested());
        flag.request();
        assert!(flag.is_requested());
    }

    #[test]
    fn clones_share_the_same_latch() {
        let flag = ShutdownFlag::new();
        let other = flag.clone();
        other.request();
        assert!(flag.is_requested());
    }

    #[test]
    fn termination_signals_latch_the_flag() {
        let flag = ShutdownFlag::new();
        flag.install_signal_handlers()
            .expect("signal registration should succeed");
        signal_hook::low_level::raise(SIGTERM).expect("raising the signal should succeed");
        assert!(flag.is_requested());
    }
}
