//! Wire contract between the execution agent and the scheduler device.
//!
//! The privileged scheduler hands out tasks and accepts results as
//! fixed-layout records crossing the kernel boundary through blocking control
//! requests. This crate pins that contract: the record definitions and their
//! byte-exact sizes, the startup validation that refuses to run a drifted
//! build, the permissive codec between records and owned task entities, and
//! the in-band error taxonomy reported back to the scheduler.
//!
//! Nothing here performs I/O; the daemon owns the device channel and feeds
//! records through [`decode_fetch`] and [`encode_commit`].

mod codec;
mod layout;
mod records;
mod task;

pub use codec::{decode_commit, decode_fetch, encode_commit};
pub use layout::{LayoutError, LayoutMismatch, verify_wire_layout};
pub use records::{
    CIRCUIT_BUF_LEN, COMMIT_RECORD_SIZE, COMMIT_REQUEST_CODE, CommitRecord, ERROR_INFO_LEN,
    FETCH_RECORD_SIZE, FETCH_REQUEST_CODE, FetchRecord, MAX_OUTCOMES, MAX_QUBITS, OUTCOME_KEY_LEN,
};
pub use task::{CommitResult, OutcomeEntry, TaskRequest, WireErrorCode};
