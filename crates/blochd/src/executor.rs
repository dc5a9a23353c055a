//! Turns fetched task requests into commit results.
//!
//! Execution never propagates an error: parse refusals and backend failures
//! are folded into a [`CommitResult`] carrying the task identity, so the
//! scheduler always hears back about a task it handed out.

use bloch_protocol::{CommitResult, MAX_OUTCOMES, OutcomeEntry, TaskRequest, WireErrorCode};
use bloch_sim::{OutcomeCount, SimulationError, Simulator};
use tracing::{debug, error, info};

const EXECUTOR_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::executor");

/// Longest circuit prefix echoed into debug logs.
const CIRCUIT_PREVIEW_LEN: usize = 200;

/// Histogram entries echoed into the success log line.
const OUTCOME_PREVIEW_LEN: usize = 4;

/// Runs tasks against a simulator and shapes the results for the wire.
#[derive(Debug)]
pub struct TaskExecutor<S> {
    simulator: S,
}

impl<S: Simulator> TaskExecutor<S> {
    /// Wraps a simulator.
    pub fn new(simulator: S) -> Self {
        Self { simulator }
    }

    /// Executes one task and summarises the outcome, success or failure.
    pub fn execute(&self, request: &TaskRequest) -> CommitResult {
        info!(
            target: EXECUTOR_TARGET,
            qid = request.qid,
            fragment = request.sub_index,
            fragments = request.num_sub_circuits,
            shots = request.shots,
            qubits = request.num_qubits,
            "executing task"
        );
        debug!(
            target: EXECUTOR_TARGET,
            circuit = %preview(&request.circuit_source),
            "circuit text"
        );
        let shots = u32::try_from(request.shots).unwrap_or(0);
        match self.simulator.simulate(&request.circuit_source, shots) {
            Ok(outcomes) => success_result(request, outcomes),
            Err(error) => failure_result(request, &error),
        }
    }
}

fn success_result(request: &TaskRequest, mut outcomes: Vec<OutcomeCount>) -> CommitResult {
    // Stable sort: equal counts keep their first-observed order.
    outcomes.sort_by(|a, b| b.count.cmp(&a.count));
    outcomes.truncate(MAX_OUTCOMES);
    let outcomes: Vec<OutcomeEntry> = outcomes
        .into_iter()
        .map(|outcome| OutcomeEntry {
            key: outcome.key,
            count: i32::try_from(outcome.count).unwrap_or(i32::MAX),
        })
        .collect();
    info!(
        target: EXECUTOR_TARGET,
        qid = request.qid,
        distinct = outcomes.len(),
        leading = %preview_outcomes(&outcomes),
        "task succeeded"
    );
    CommitResult {
        qid: request.qid,
        shots: request.shots,
        success: true,
        outcomes,
        error_code: WireErrorCode::None,
        error_info: String::new(),
        need_split: request.need_split,
        sub_index: request.sub_index,
    }
}

fn failure_result(request: &TaskRequest, error: &SimulationError) -> CommitResult {
    let error_code = match error {
        SimulationError::Parse(_) => WireErrorCode::CompileFail,
        SimulationError::Backend { .. } => WireErrorCode::BackendFail,
    };
    error!(
        target: EXECUTOR_TARGET,
        qid = request.qid,
        code = error_code.as_raw(),
        error = %error,
        "task failed"
    );
    CommitResult {
        qid: request.qid,
        shots: request.shots,
        success: false,
        outcomes: Vec::new(),
        error_code,
        error_info: error.to_string(),
        need_split: request.need_split,
        sub_index: request.sub_index,
    }
}

fn preview(source: &str) -> String {
    let mut chars = source.chars();
    let head: String = chars.by_ref().take(CIRCUIT_PREVIEW_LEN).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

fn preview_outcomes(outcomes: &[OutcomeEntry]) -> String {
    let mut rendered: Vec<String> = outcomes
        .iter()
        .take(OUTCOME_PREVIEW_LEN)
        .map(|entry| format!("{}={}", entry.key, entry.count))
        .collect();
    if outcomes.len() > OUTCOME_PREVIEW_LEN {
        rendered.push("...".to_owned());
    }
    rendered.join(", ")
}
