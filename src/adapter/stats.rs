//! Adapter counters.

/// Counters describing how an adapter has served its reads.
///
/// `zero_copy_reads` and `merges` against `assembled_copies` show how often
/// consumers got views into producer memory instead of copies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdapterStats {
    /// Chunks handed to `push`, including empty ones.
    pub chunks_pushed: u64,
    /// Bytes handed to `push`.
    pub bytes_pushed: u64,
    /// Bytes removed by `flush` and the `take*` operations.
    pub bytes_flushed: u64,
    /// Reads served directly from the head chunk's memory.
    pub zero_copy_reads: u64,
    /// Pairs of adjacent chunks joined without copying.
    pub merges: u64,
    /// Times the scratch buffer was filled by copying.
    pub assembled_copies: u64,
    /// Bytes copied into the scratch buffer or caller-owned results.
    pub bytes_copied: u64,
}
