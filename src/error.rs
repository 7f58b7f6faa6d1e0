//! Error types for the adapter and ring array.

use thiserror::Error;

/// Result type alias using this crate's Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for adapter and collection operations.
///
/// Every variant describes a caller-side contract violation that the caller
/// can recover from (wait for more data, retry with a smaller index). Empty
/// collections are not errors; those operations return `None`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// More bytes were requested than the adapter currently holds.
    #[error("insufficient data: requested {requested} bytes, {available} available")]
    InsufficientData {
        /// Number of bytes the caller asked for (including any offset).
        requested: usize,
        /// Number of bytes available at the time of the call.
        available: usize,
    },

    /// A logical index was outside the collection.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Collection length at the time of the call.
        len: usize,
    },

    /// A masked scan pattern has bits set outside its mask.
    #[error("invalid scan pattern {pattern:#010x} for mask {mask:#010x}")]
    InvalidPattern {
        /// Scan mask.
        mask: u32,
        /// Pattern that must be a subset of the mask.
        pattern: u32,
    },
}

impl Error {
    /// Returns true for [`Error::InsufficientData`].
    ///
    /// Streaming callers typically treat this as "wait for more input".
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, Error::InsufficientData { .. })
    }
}
