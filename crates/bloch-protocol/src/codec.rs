//! Conversions between fixed-layout records and owned task entities.
//!
//! Decoding is permissive by contract: a malformed record degrades to a task
//! that fails circuit parsing rather than crashing the agent. Encoding never
//! rejects either; oversized text is truncated to buffer capacity on a UTF-8
//! character boundary and oversized histograms are clamped.

use crate::records::{CommitRecord, FetchRecord, MAX_OUTCOMES};
use crate::task::{CommitResult, OutcomeEntry, TaskRequest, WireErrorCode};

/// Decodes a fetched record into an owned task request.
///
/// Circuit text is truncated at the first NUL and invalid UTF-8 is replaced.
/// Decoding is pure: the same record always yields the same request.
#[must_use]
pub fn decode_fetch(record: &FetchRecord) -> TaskRequest {
    TaskRequest {
        qid: record.qid,
        shots: record.shots,
        num_qubits: record.num_qubits,
        circuit_depth: record.circuit_depth,
        error_mitigation: record.error_mitigation != 0,
        circuit_source: decode_text(&record.circuit),
        need_split: record.need_split != 0,
        sub_index: record.sub_index,
        num_sub_circuits: record.num_sub_circuits,
    }
}

/// Encodes an execution result into the fixed-layout commit record.
///
/// Outcome entries beyond [`MAX_OUTCOMES`] are dropped; keys and the failure
/// message are truncated to their buffer capacity less the NUL terminator.
#[must_use]
pub fn encode_commit(result: &CommitResult) -> CommitRecord {
    let mut record = CommitRecord {
        qid: result.qid,
        success: i32::from(result.success),
        shots: result.shots,
        error_code: result.error_code.as_raw(),
        need_split: i32::from(result.need_split),
        sub_index: result.sub_index,
        ..CommitRecord::default()
    };
    encode_text(&mut record.error_info, &result.error_info);
    let kept = result.outcomes.len().min(MAX_OUTCOMES);
    record.num_outcomes = kept as i32;
    for (index, entry) in result.outcomes.iter().take(kept).enumerate() {
        encode_text(&mut record.keys[index], &entry.key);
        record.counts[index] = entry.count;
    }
    record
}

/// Decodes a commit record back into an owned result.
///
/// Used by operator tooling and round-trip tests; the daemon itself only
/// encodes. Unknown error codes decode as success-shaped
/// [`WireErrorCode::None`] in keeping with the permissive contract.
#[must_use]
pub fn decode_commit(record: &CommitRecord) -> CommitResult {
    let kept = usize::try_from(record.num_outcomes)
        .unwrap_or(0)
        .min(MAX_OUTCOMES);
    let outcomes = record
        .keys
        .iter()
        .zip(record.counts.iter())
        .take(kept)
        .map(|(key, &count)| OutcomeEntry {
            key: decode_text(key),
            count,
        })
        .collect();
    CommitResult {
        qid: record.qid,
        shots: record.shots,
        success: record.success != 0,
        outcomes,
        error_code: WireErrorCode::from_raw(record.error_code).unwrap_or_default(),
        error_info: decode_text(&record.error_info),
        need_split: record.need_split != 0,
        sub_index: record.sub_index,
    }
}

fn decode_text(buffer: &[u8]) -> String {
    let end = buffer
        .iter()
        .position(|&byte| byte == 0)
        .unwrap_or(buffer.len());
    String::from_utf8_lossy(&buffer[..end]).into_owned()
}

/// Writes `text` into a NUL-filled buffer, keeping at most
/// `buffer.len() - 1` bytes and backing up to a character boundary.
fn encode_text(buffer: &mut [u8], text: &str) {
    buffer.fill(0);
    let capacity = buffer.len().saturating_sub(1);
    let mut end = capacity.min(text.len());
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    buffer[..end].copy_from_slice(&text.as_bytes()[..end]);
}
