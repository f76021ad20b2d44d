//! Error types for the RAID-6 store

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the RAID-6 store
#[derive(Error, Debug)]
pub enum Error {
    /// Write or update called with a zero-length payload
    #[error("file data is empty")]
    EmptyInput,

    /// Read or update of a name that was never written
    #[error("unknown file: {0}")]
    UnknownFile(String),

    /// Write of a name that already exists; update is the rewrite path
    #[error("file already exists: {0}")]
    DuplicateFile(String),

    /// Read attempted while a disk is failed
    #[error("cluster is degraded: disk {disk} is offline")]
    DegradedCluster { disk: usize },

    /// Expected shard not found during read or recovery
    #[error("shard {shard_id} of {file} is missing")]
    ShardMissing { file: String, shard_id: i32 },

    /// Surviving shards disagree on the block size
    #[error("shard length mismatch: expected {expected} bytes, found {found}")]
    ShardLengthMismatch { expected: usize, found: usize },

    /// Coder inputs violated a field invariant; unreachable in healthy flows
    #[error("division by zero in GF(2^8)")]
    DivisionByZero,

    /// Writing a reconstructed shard back to disk failed
    #[error("recovery of {file} failed: {reason}")]
    RecoveryFailed { file: String, reason: String },

    /// Disk index outside `0..N`
    #[error("disk index {0} out of range")]
    DiskOutOfRange(usize),

    /// More than two shards of one file are gone; nothing can bring them back
    #[error("too many shards missing: at most two disks may fail between recoveries")]
    TooManyFailures,

    /// Invalid cluster configuration or operation arguments
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error surfaced verbatim from the filesystem
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
