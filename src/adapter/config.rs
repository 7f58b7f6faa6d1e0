//! Adapter configuration.

/// Default granularity of the scratch buffer used to assemble reads that
/// span several chunks.
pub const DEFAULT_SCRATCH_BLOCK_SIZE: usize = 4096;

/// Default number of chunk slots allocated up front.
pub const DEFAULT_QUEUE_CAPACITY: usize = 16;

/// Configuration for a [`ChunkAdapter`](super::ChunkAdapter).
///
/// # Example
///
/// ```rust
/// use parallax_adapter::adapter::{AdapterConfig, ChunkAdapter};
///
/// let adapter = ChunkAdapter::with_config(
///     AdapterConfig::default()
///         .with_name("h264-depay")
///         .with_scratch_block_size(64 * 1024),
/// );
/// assert_eq!(adapter.name(), "h264-depay");
/// ```
#[derive(Debug, Clone)]
pub struct AdapterConfig {
    /// Name used in log events.
    pub name: String,
    /// Scratch buffer capacity is always a multiple of this many bytes.
    pub scratch_block_size: usize,
    /// Join neighbouring chunks that share one allocation instead of copying.
    pub merge_adjacent: bool,
    /// Initial capacity of the chunk queue.
    pub queue_capacity: usize,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            name: "adapter".into(),
            scratch_block_size: DEFAULT_SCRATCH_BLOCK_SIZE,
            merge_adjacent: true,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl AdapterConfig {
    /// Set the name used in log events.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the scratch buffer block size. Values below 1 are raised to 1.
    pub fn with_scratch_block_size(mut self, size: usize) -> Self {
        self.scratch_block_size = size.max(1);
        self
    }

    /// Enable or disable merging of adjacent chunks.
    pub fn with_merge_adjacent(mut self, merge: bool) -> Self {
        self.merge_adjacent = merge;
        self
    }

    /// Set the initial chunk queue capacity.
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Scratch capacity needed to hold `size` bytes.
    pub(crate) fn scratch_capacity_for(&self, size: usize) -> usize {
        (size / self.scratch_block_size + 1) * self.scratch_block_size
    }
}
