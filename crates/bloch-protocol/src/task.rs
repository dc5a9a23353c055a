//! Owned task entities decoded from and encoded into wire records.

use serde::{Deserialize, Serialize};

/// One runnable task, or one fragment of a split task, handed to the agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRequest {
    /// Scheduler-assigned task identifier, always positive.
    pub qid: i32,
    /// Requested measurement repetitions.
    pub shots: i32,
    /// Qubit count declared by the submitter.
    pub num_qubits: i32,
    /// Circuit depth declared by the submitter.
    pub circuit_depth: i32,
    /// Whether the submitter asked for error mitigation.
    pub error_mitigation: bool,
    /// Circuit text, decoded permissively from the wire buffer.
    pub circuit_source: String,
    /// True when this request is one fragment of a split task.
    pub need_split: bool,
    /// Fragment position within the parent task.
    pub sub_index: i32,
    /// Total fragments the parent task was split into.
    pub num_sub_circuits: i32,
}

/// A measured bit-string and its occurrence count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeEntry {
    pub key: String,
    pub count: i32,
}

/// In-band failure classification reported to the scheduler.
///
/// The raw values are part of the kernel contract and round-trip through
/// [`as_raw`](Self::as_raw) and [`from_raw`](Self::from_raw).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireErrorCode {
    /// Execution succeeded.
    #[default]
    None,
    /// The circuit text failed to parse.
    CompileFail,
    /// The circuit parsed but execution failed.
    BackendFail,
}

impl WireErrorCode {
    /// Wire value of this classification.
    #[must_use]
    pub const fn as_raw(self) -> i32 {
        match self {
            Self::None => 0,
            Self::CompileFail => 4,
            Self::BackendFail => 6,
        }
    }

    /// Maps a wire value back to its classification.
    #[must_use]
    pub const fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(Self::None),
            4 => Some(Self::CompileFail),
            6 => Some(Self::BackendFail),
            _ => None,
        }
    }
}

/// Execution result for one task or fragment, ready to encode.
///
/// `qid`, `shots`, `need_split`, and `sub_index` echo the fetched request on
/// success and failure alike; the scheduler correlates fragment results by
/// `(qid, sub_index)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitResult {
    pub qid: i32,
    pub shots: i32,
    pub success: bool,
    /// Histogram entries, count-descending, at most [`crate::MAX_OUTCOMES`].
    pub outcomes: Vec<OutcomeEntry>,
    pub error_code: WireErrorCode,
    /// Human-readable failure description; empty on success.
    pub error_info: String,
    pub need_split: bool,
    pub sub_index: i32,
}
