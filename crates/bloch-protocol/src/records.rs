//! Fixed-layout records exchanged with the scheduler device.
//!
//! Field order, buffer lengths, and total byte counts are part of the kernel
//! contract; [`crate::verify_wire_layout`] refuses startup when a build
//! disagrees with the pinned sizes. All integer fields are signed 32-bit in
//! native byte order, as the records never leave the machine.

/// Capacity of the circuit text buffer in a fetch record.
pub const CIRCUIT_BUF_LEN: usize = 4096;

/// Physical-qubit map slots carried by a fetch record.
pub const MAX_QUBITS: usize = 64;

/// Outcome slots in a commit record; longer histograms are truncated.
pub const MAX_OUTCOMES: usize = 32;

/// Capacity of one outcome key buffer, including its NUL terminator.
pub const OUTCOME_KEY_LEN: usize = 192;

/// Capacity of the failure message buffer, including its NUL terminator.
pub const ERROR_INFO_LEN: usize = 128;

/// Pinned byte count of [`FetchRecord`].
pub const FETCH_RECORD_SIZE: usize = 4384;

/// Pinned byte count of [`CommitRecord`].
pub const COMMIT_RECORD_SIZE: usize = 6428;

/// Control request code for fetching a task, `_IO('Q', 6)`.
pub const FETCH_REQUEST_CODE: u32 = (b'Q' as u32) << 8 | 6;

/// Control request code for committing a result, `_IO('Q', 7)`.
pub const COMMIT_REQUEST_CODE: u32 = (b'Q' as u32) << 8 | 7;

/// Task record filled in by the scheduler on a successful fetch.
///
/// A `qid` of zero or below means the fetch succeeded but no runnable task
/// was available. The physical-qubit map is populated by the scheduler's
/// allocator and carried here for layout fidelity; the agent does not consume
/// it.
#[derive(Clone, Copy, Debug)]
#[repr(C)]
pub struct FetchRecord {
    pub qid: i32,
    pub shots: i32,
    pub num_qubits: i32,
    pub circuit_depth: i32,
    pub error_mitigation: i32,
    pub circuit: [u8; CIRCUIT_BUF_LEN],
    pub need_split: i32,
    pub sub_index: i32,
    pub num_sub_circuits: i32,
    pub phys_qubits: [i32; MAX_QUBITS],
}

impl Default for FetchRecord {
    fn default() -> Self {
        Self {
            qid: 0,
            shots: 0,
            num_qubits: 0,
            circuit_depth: 0,
            error_mitigation: 0,
            circuit: [0; CIRCUIT_BUF_LEN],
            need_split: 0,
            sub_index: 0,
            num_sub_circuits: 0,
            phys_qubits: [0; MAX_QUBITS],
        }
    }
}

/// Result record handed back to the scheduler for a fetched task.
///
/// `need_split` and `sub_index` must echo the fetched record so the scheduler
/// can correlate fragment results with the parent task.
#[derive(Clone, Copy)]
#[repr(C)]
pub struct CommitRecord {
    pub qid: i32,
    pub success: i32,
    pub shots: i32,
    pub num_outcomes: i32,
    pub keys: [[u8; OUTCOME_KEY_LEN]; MAX_OUTCOMES],
    pub counts: [i32; MAX_OUTCOMES],
    pub error_code: i32,
    pub error_info: [u8; ERROR_INFO_LEN],
    pub need_split: i32,
    pub sub_index: i32,
}

impl Default for CommitRecord {
    fn default() -> Self {
        Self {
            qid: 0,
            success: 0,
            shots: 0,
            num_outcomes: 0,
            keys: [[0; OUTCOME_KEY_LEN]; MAX_OUTCOMES],
            counts: [0; MAX_OUTCOMES],
            error_code: 0,
            error_info: [0; ERROR_INFO_LEN],
            need_split: 0,
            sub_index: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::mem;

    use super::*;

    #[test]
    fn request_codes_match_the_device_contract() {
        assert_eq!(FETCH_REQUEST_CODE, 0x5106);
        assert_eq!(COMMIT_REQUEST_CODE, 0x5107);
    }

    #[test]
    fn fetch_record_fields_sit_at_pinned_offsets() {
        assert_eq!(mem::offset_of!(FetchRecord, qid), 0);
        assert_eq!(mem::offset_of!(FetchRecord, shots), 4);
        assert_eq!(mem::offset_of!(FetchRecord, num_qubits), 8);
        assert_eq!(mem::offset_of!(FetchRecord, circuit_depth), 12);
        assert_eq!(mem::offset_of!(FetchRecord, error_mitigation), 16);
        assert_eq!(mem::offset_of!(FetchRecord, circuit), 20);
        assert_eq!(mem::offset_of!(FetchRecord, need_split), 4116);
        assert_eq!(mem::offset_of!(FetchRecord, sub_index), 4120);
        assert_eq!(mem::offset_of!(FetchRecord, num_sub_circuits), 4124);
        assert_eq!(mem::offset_of!(FetchRecord, phys_qubits), 4128);
    }

    #[test]
    fn commit_record_fields_sit_at_pinned_offsets() {
        assert_eq!(mem::offset_of!(CommitRecord, qid), 0);
        assert_eq!(mem::offset_of!(CommitRecord, success), 4);
        assert_eq!(mem::offset_of!(CommitRecord, shots), 8);
        assert_eq!(mem::offset_of!(CommitRecord, num_outcomes), 12);
        assert_eq!(mem::offset_of!(CommitRecord, keys), 16);
        assert_eq!(mem::offset_of!(CommitRecord, counts), 6160);
        assert_eq!(mem::offset_of!(CommitRecord, error_code), 6288);
        assert_eq!(mem::offset_of!(CommitRecord, error_info), 6292);
        assert_eq!(mem::offset_of!(CommitRecord, need_split), 6420);
        assert_eq!(mem::offset_of!(CommitRecord, sub_index), 6424);
    }

    #[test]
    fn default_records_are_zeroed() {
        let fetch = FetchRecord::default();
        assert_eq!(fetch.qid, 0);
        assert!(fetch.circuit.iter().all(|&byte| byte == 0));
        assert!(fetch.phys_qubits.iter().all(|&slot| slot == 0));

        let commit = CommitRecord::default();
        assert_eq!(commit.num_outcomes, 0);
        assert!(commit.keys.iter().flatten().all(|&byte| byte == 0));
        assert!(commit.error_info.iter().all(|&byte| byte == 0));
    }
}
