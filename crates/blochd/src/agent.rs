//! The fetch, execute, commit poll loop.
//!
//! Shutdown is only honoured between tasks: once a record has been fetched,
//! the agent always executes it and attempts the commit before looking at
//! the flag again. A completed task is followed immediately by the next
//! fetch; the idle interval applies only when the queue is empty or the
//! device reports a transient fetch failure.

use std::thread;
use std::time::Duration;

use bloch_protocol::{decode_fetch, encode_commit};
use bloch_sim::Simulator;
use tracing::{debug, info, warn};

use crate::device::DeviceChannel;
use crate::executor::TaskExecutor;
use crate::shutdown::ShutdownFlag;

const AGENT_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::agent");

/// Drives the device channel until shutdown is requested.
#[derive(Debug)]
pub struct PollAgent<C, S> {
    channel: C,
    executor: TaskExecutor<S>,
    idle_interval: Duration,
    shutdown: ShutdownFlag,
}

impl<C: DeviceChannel, S: Simulator> PollAgent<C, S> {
    /// Assembles a poll loop over an open channel.
    pub fn new(
        channel: C,
        executor: TaskExecutor<S>,
        idle_interval: Duration,
        shutdown: ShutdownFlag,
    ) -> Self {
        Self {
            channel,
            executor,
            idle_interval,
            shutdown,
        }
    }

    /// Polls for tasks until the shutdown flag is latched.
    pub fn run(&mut self) {
        info!(
            target: AGENT_TARGET,
            interval_ms = self.idle_interval.as_millis(),
            "agent polling for tasks"
        );
        loop {
            if self.shutdown.is_requested() {
                info!(target: AGENT_TARGET, "shutdown requested, stopping");
                return;
            }
            match self.channel.fetch() {
                Ok(Some(record)) => {
                    let request = decode_fetch(&record);
                    let result = self.executor.execute(&request);
                    let commit = encode_commit(&result);
                    match self.channel.commit(&commit) {
                        Ok(()) => debug!(
                            target: AGENT_TARGET,
                            qid = result.qid,
                            fragment = result.sub_index,
                            "result committed"
                        ),
                        Err(error) => warn!(
                            target: AGENT_TARGET,
                            qid = result.qid,
                            error = %error,
                            "commit failed; the scheduler will reclaim the task by timeout"
                        ),
                    }
                }
                Ok(None) => thread::sleep(self.idle_interval),
                Err(error) => {
                    warn!(
                        target: AGENT_TARGET,
                        error = %error,
                        "fetch failed; retrying after the idle interval"
                    );
                    thread::sleep(self.idle_interval);
                }
            }
        }
    }
}
