//! Startup validation of compiled record sizes.
//!
//! A build whose records disagree with the pinned byte counts would corrupt
//! kernel memory through the control requests, so the daemon validates the
//! layout once before opening the device and refuses to run on any mismatch.

use std::mem;

use thiserror::Error;

use crate::records::{COMMIT_RECORD_SIZE, CommitRecord, FETCH_RECORD_SIZE, FetchRecord};

/// One record whose compiled size differs from the pinned contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutMismatch {
    /// Record name as used in the protocol contract.
    pub record: &'static str,
    /// Byte count pinned by the protocol version.
    pub expected: usize,
    /// Byte count produced by this build.
    pub actual: usize,
}

/// Error listing every record that failed size validation.
#[derive(Debug, Error)]
#[error("wire record sizes do not match the pinned contract: {}", summarise(.mismatches))]
pub struct LayoutError {
    mismatches: Vec<LayoutMismatch>,
}

impl LayoutError {
    /// Every record that failed validation, in contract order.
    #[must_use]
    pub fn mismatches(&self) -> &[LayoutMismatch] {
        &self.mismatches
    }
}

fn summarise(mismatches: &[LayoutMismatch]) -> String {
    let parts: Vec<String> = mismatches
        .iter()
        .map(|mismatch| {
            format!(
                "{} expected {} bytes, built {}",
                mismatch.record, mismatch.expected, mismatch.actual
            )
        })
        .collect();
    parts.join("; ")
}

/// Compares the compiled record sizes against the pinned byte counts.
///
/// Reports every mismatching record rather than stopping at the first, so a
/// single run of a drifted build names the whole extent of the damage.
pub fn verify_wire_layout() -> Result<(), LayoutError> {
    check_sizes(
        mem::size_of::<FetchRecord>(),
        mem::size_of::<CommitRecord>(),
    )
}

fn check_sizes(fetch_actual: usize, commit_actual: usize) -> Result<(), LayoutError> {
    let mut mismatches = Vec::new();
    if fetch_actual != FETCH_RECORD_SIZE {
        mismatches.push(LayoutMismatch {
            record: "fetch",
            expected: FETCH_RECORD_SIZE,
            actual: fetch_actual,
        });
    }
    if commit_actual != COMMIT_RECORD_SIZE {
        mismatches.push(LayoutMismatch {
            record: "commit",
            expected: COMMIT_RECORD_SIZE,
            actual: commit_actual,
        });
    }
    if mismatches.is_empty() {
        Ok(())
    } else {
        Err(LayoutError { mismatches })
    }
}
