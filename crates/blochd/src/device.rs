//! Blocking control channel to the scheduler's character device.
//!
//! Tasks move over two ioctl requests: a read request that fills a
//! [`FetchRecord`] and a write request that hands back a [`CommitRecord`].
//! Both "no task queued" signals from the driver, a non-positive `qid` and
//! an `EAGAIN` return, are folded into `Ok(None)` so callers only see one
//! idle shape.

use std::fs::File;
use std::io;
use std::os::fd::AsRawFd;

use bloch_protocol::{COMMIT_REQUEST_CODE, CommitRecord, FETCH_REQUEST_CODE, FetchRecord};
use camino::{Utf8Path, Utf8PathBuf};
use nix::errno::Errno;
use thiserror::Error;
use tracing::debug;

const DEVICE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::device");

nix::ioctl_read_bad!(quantum_fetch, FETCH_REQUEST_CODE, FetchRecord);
nix::ioctl_write_ptr_bad!(quantum_commit, COMMIT_REQUEST_CODE, CommitRecord);

/// Errors raised while opening the device node.
#[derive(Debug, Error)]
pub enum DeviceOpenError {
    /// The node does not exist.
    #[error("device {path} not found (is the scheduler module loaded?)")]
    NotFound {
        /// Path that was probed.
        path: Utf8PathBuf,
    },
    /// The node exists but the process may not open it.
    #[error("permission denied opening {path} (run as root or adjust device permissions)")]
    PermissionDenied {
        /// Path that was probed.
        path: Utf8PathBuf,
    },
    /// Any other open failure.
    #[error("failed to open device {path}: {source}")]
    Open {
        /// Path that was probed.
        path: Utf8PathBuf,
        /// Underlying open failure.
        #[source]
        source: io::Error,
    },
}

/// Errors raised by control requests on an open device.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The fetch request failed.
    #[error("fetch request failed: {source}")]
    Fetch {
        /// Errno reported by the driver.
        #[source]
        source: Errno,
    },
    /// The commit request failed.
    #[error("commit request failed: {source}")]
    Commit {
        /// Errno reported by the driver.
        #[source]
        source: Errno,
    },
}

/// Transport used by the poll loop to exchange task records.
///
/// The production implementation is [`QuantumDevice`]; tests substitute
/// scripted channels to drive the loop without a kernel module.
pub trait DeviceChannel {
    /// Asks the scheduler for the next task.
    ///
    /// Returns `Ok(None)` when no task is queued.
    fn fetch(&mut self) -> Result<Option<FetchRecord>, DeviceError>;

    /// Hands a finished task back to the scheduler.
    fn commit(&mut self, record: &CommitRecord) -> Result<(), DeviceError>;
}

/// Task channel backed by the scheduler's character device.
#[derive(Debug)]
pub struct QuantumDevice {
    file: File,
    path: Utf8PathBuf,
}

impl QuantumDevice {
    /// Opens the device node read-write.
    pub fn open(path: &Utf8Path) -> Result<Self, DeviceOpenError> {
        let file = File::options()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|source| match source.kind() {
                io::ErrorKind::NotFound => DeviceOpenError::NotFound {
                    path: path.to_owned(),
                },
                io::ErrorKind::PermissionDenied => DeviceOpenError::PermissionDenied {
                    path: path.to_owned(),
                },
                _ => DeviceOpenError::Open {
                    path: path.to_owned(),
                    source,
                },
            })?;
        debug!(target: DEVICE_TARGET, device = %path, "device opened");
        Ok(Self {
            file,
            path: path.to_owned(),
        })
    }

    /// Path the device was opened from.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl DeviceChannel for QuantumDevice {
    fn fetch(&mut self) -> Result<Option<FetchRecord>, DeviceError> {
        let mut record = FetchRecord::default();
        match unsafe { quantum_fetch(self.file.as_raw_fd(), &mut record) } {
            Ok(_) if record.qid <= 0 => Ok(None),
            Ok(_) => Ok(Some(record)),
            Err(Errno::EAGAIN) => Ok(None),
            Err(source) => Err(DeviceError::Fetch { source }),
        }
    }

    fn commit(&mut self, record: &CommitRecord) -> Result<(), DeviceError> {
        match unsafe { quantum_commit(self.file.as_raw_fd(), record) } {
            Ok(_) => Ok(()),
            Err(source) => Err(DeviceError::Commit { source }),
        }
    }
}
