//! Chunk types for zero-copy data passing.

use crate::memory::{HeapSegment, MemorySegment, MemoryType};
use crate::metadata::Metadata;
use bytes::Bytes;
use std::sync::Arc;

/// Handle to a memory region within a segment.
///
/// This is cheap to clone (just Arc increment + copy of offset/len).
#[derive(Clone)]
pub struct MemoryHandle {
    /// The backing memory segment.
    segment: Arc<dyn MemorySegment>,
    /// Offset within the segment.
    offset: usize,
    /// Length of this handle's data.
    len: usize,
}

impl MemoryHandle {
    /// Create a new memory handle.
    ///
    /// # Panics
    ///
    /// Panics if `offset + len > segment.len()`.
    pub fn new(segment: Arc<dyn MemorySegment>, offset: usize, len: usize) -> Self {
        assert!(
            offset + len <= segment.len(),
            "memory handle exceeds segment bounds"
        );
        Self {
            segment,
            offset,
            len,
        }
    }

    /// Create a memory handle covering an entire segment.
    pub fn from_segment(segment: Arc<dyn MemorySegment>) -> Self {
        let len = segment.len();
        Self {
            segment,
            offset: 0,
            len,
        }
    }

    /// Get the length of this handle's data.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if this handle has zero length.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get this handle's data as a byte slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.segment.as_slice()[self.offset..self.offset + self.len]
    }

    /// Get the memory type of the backing segment.
    pub fn memory_type(&self) -> MemoryType {
        self.segment.memory_type()
    }

    /// Get the offset within the segment.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Get a reference to the backing segment.
    pub fn segment(&self) -> &Arc<dyn MemorySegment> {
        &self.segment
    }

    /// Check whether both handles refer to the same segment.
    pub fn shares_segment(&self, other: &MemoryHandle) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.segment), Arc::as_ptr(&other.segment))
    }

    /// Create a sub-handle (a view into a portion of this handle).
    ///
    /// # Panics
    ///
    /// Panics if `offset + len > self.len`.
    pub fn slice(&self, offset: usize, len: usize) -> Self {
        assert!(offset + len <= self.len, "sub-handle exceeds parent bounds");
        Self {
            segment: Arc::clone(&self.segment),
            offset: self.offset + offset,
            len,
        }
    }

    /// Check whether `next` directly follows this handle in the same segment,
    /// so both can be described by a single handle without copying.
    pub fn is_span_fast(&self, next: &MemoryHandle) -> bool {
        self.shares_segment(next) && self.offset + self.len == next.offset
    }

    /// Join this handle with the one directly following it.
    ///
    /// Returns `None` unless [`is_span_fast`](Self::is_span_fast) holds.
    pub fn span(&self, next: &MemoryHandle) -> Option<Self> {
        if !self.is_span_fast(next) {
            return None;
        }
        Some(Self {
            segment: Arc::clone(&self.segment),
            offset: self.offset,
            len: self.len + next.len,
        })
    }
}

impl std::fmt::Debug for MemoryHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryHandle")
            .field("offset", &self.offset)
            .field("len", &self.len)
            .field("memory_type", &self.memory_type())
            .finish()
    }
}

/// An immutable run of stream bytes with its metadata.
///
/// Chunks are what producers push into a
/// [`ChunkAdapter`](crate::adapter::ChunkAdapter). They consist of:
/// - A `MemoryHandle` pointing to the actual data
/// - `Metadata` with timestamps, stream offsets and flags
///
/// # Zero-Copy
///
/// Chunks are cheap to clone - only the Arc reference count is incremented.
/// Sub-ranges created with [`slice`](Chunk::slice) share the same storage,
/// so a view handed out by the adapter stays valid after the adapter has
/// released its own reference.
///
/// # Example
///
/// ```rust
/// use parallax_adapter::chunk::Chunk;
/// use parallax_adapter::metadata::Metadata;
///
/// let chunk = Chunk::from_vec(vec![0u8; 1024]).with_metadata(Metadata::with_sequence(0));
///
/// // Clone is O(1) - just Arc increment
/// let chunk2 = chunk.clone();
/// assert_eq!(chunk.as_bytes().as_ptr(), chunk2.as_bytes().as_ptr());
/// ```
#[derive(Clone)]
pub struct Chunk {
    /// Handle to the memory region containing the data.
    memory: MemoryHandle,
    /// Chunk metadata.
    metadata: Metadata,
}

impl Chunk {
    /// Create a new chunk.
    pub fn new(memory: MemoryHandle, metadata: Metadata) -> Self {
        Self { memory, metadata }
    }

    /// Create a chunk owning `data`, with default metadata.
    pub fn from_vec(data: Vec<u8>) -> Self {
        let segment: Arc<dyn MemorySegment> = Arc::new(HeapSegment::from_vec(data));
        Self::new(MemoryHandle::from_segment(segment), Metadata::default())
    }

    /// Create a chunk holding a copy of `data`, with default metadata.
    pub fn copy_from_slice(data: &[u8]) -> Self {
        let segment: Arc<dyn MemorySegment> = Arc::new(HeapSegment::copy_from_slice(data));
        Self::new(MemoryHandle::from_segment(segment), Metadata::default())
    }

    /// Create a chunk sharing the storage of `bytes`, with default metadata.
    pub fn from_bytes(bytes: Bytes) -> Self {
        let segment: Arc<dyn MemorySegment> = Arc::new(bytes);
        Self::new(MemoryHandle::from_segment(segment), Metadata::default())
    }

    /// Replace the metadata.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Get a reference to the chunk's metadata.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Get a mutable reference to the chunk's metadata.
    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    /// Get a reference to the memory handle.
    pub fn memory(&self) -> &MemoryHandle {
        &self.memory
    }

    /// Get the chunk data as a byte slice.
    pub fn as_bytes(&self) -> &[u8] {
        self.memory.as_slice()
    }

    /// Get the length of the chunk data.
    pub fn len(&self) -> usize {
        self.memory.len()
    }

    /// Check if the chunk is empty.
    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }

    /// Get the memory type of the backing segment.
    pub fn memory_type(&self) -> MemoryType {
        self.memory.memory_type()
    }

    /// Check whether both chunks are backed by the same segment.
    pub fn shares_memory_with(&self, other: &Chunk) -> bool {
        self.memory.shares_segment(&other.memory)
    }

    /// Create a sub-chunk (a view into a portion of this chunk).
    ///
    /// The new chunk shares this chunk's memory. Its metadata is derived
    /// with [`Metadata::for_region`].
    ///
    /// # Panics
    ///
    /// Panics if `offset + len > self.len()`.
    pub fn slice(&self, offset: usize, len: usize) -> Chunk {
        Chunk {
            memory: self.memory.slice(offset, len),
            metadata: self.metadata.for_region(offset, len, self.len()),
        }
    }

    /// Check whether `next` can be appended to this chunk without copying.
    pub fn is_span_fast(&self, next: &Chunk) -> bool {
        self.memory.is_span_fast(&next.memory)
    }

    /// Join this chunk with `next` when their memory is adjacent in the same
    /// segment. Returns `None` when a copy would be required.
    pub fn span(&self, next: &Chunk) -> Option<Chunk> {
        let memory = self.memory.span(&next.memory)?;
        Some(Chunk {
            memory,
            metadata: self.metadata.merged_with(&next.metadata),
        })
    }
}

impl std::fmt::Debug for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chunk")
            .field("memory", &self.memory)
            .field("metadata", &self.metadata)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ClockTime;

    fn make_test_chunk(size: usize) -> Chunk {
        let data: Vec<u8> = (0..size).map(|i| i as u8).collect();
        Chunk::from_vec(data).with_metadata(Metadata::with_sequence(42))
    }

    #[test]
    fn test_chunk_creation() {
        let chunk = make_test_chunk(1024);
        assert_eq!(chunk.len(), 1024);
        assert_eq!(chunk.metadata().sequence, 42);
        assert_eq!(chunk.memory_type(), MemoryType::Heap);
    }

    #[test]
    fn test_chunk_clone_is_cheap() {
        let chunk = make_test_chunk(1024);
        let chunk2 = chunk.clone();

        // Both should point to the same memory
        assert_eq!(chunk.as_bytes().as_ptr(), chunk2.as_bytes().as_ptr());
        assert!(chunk.shares_memory_with(&chunk2));
    }

    #[test]
    fn test_chunk_slice() {
        let chunk = make_test_chunk(1024);
        let sub = chunk.slice(100, 200);

        assert_eq!(sub.len(), 200);
        assert_eq!(sub.memory().offset(), 100);
        assert_eq!(sub.as_bytes()[0], 100);
        assert!(sub.shares_memory_with(&chunk));
    }

    #[test]
    fn test_span_adjacent_slices() {
        let chunk = make_test_chunk(300).with_metadata(
            Metadata::new()
                .with_pts(ClockTime::from_millis(5))
                .with_offsets(0, 300),
        );
        let a = chunk.slice(0, 100);
        let b = chunk.slice(100, 100);
        let c = chunk.slice(250, 50);

        assert!(a.is_span_fast(&b));
        assert!(!b.is_span_fast(&a));
        assert!(!b.is_span_fast(&c));

        let ab = a.span(&b).unwrap();
        assert_eq!(ab.len(), 200);
        assert_eq!(ab.as_bytes(), &chunk.as_bytes()[..200]);
        assert_eq!(ab.metadata().pts, ClockTime::from_millis(5));
        assert_eq!(ab.metadata().offset_end, Some(200));
        assert!(b.span(&c).is_none());
    }

    #[test]
    fn test_separate_allocations_never_span() {
        let a = make_test_chunk(10);
        let b = make_test_chunk(10);
        assert!(!a.is_span_fast(&b));
    }

    #[test]
    fn test_from_bytes_shares_storage() {
        let bytes = Bytes::from(vec![7u8; 64]);
        let ptr = bytes.as_ptr();
        let chunk = Chunk::from_bytes(bytes);
        assert_eq!(chunk.as_bytes().as_ptr(), ptr);
        assert_eq!(chunk.memory_type(), MemoryType::Bytes);
    }

    #[test]
    fn test_memory_handle_slice() {
        let segment: Arc<dyn MemorySegment> = Arc::new(HeapSegment::new(1024));
        let handle = MemoryHandle::from_segment(segment);

        let sub = handle.slice(100, 200);
        assert_eq!(sub.offset(), 100);
        assert_eq!(sub.len(), 200);
    }

    #[test]
    #[should_panic(expected = "sub-handle exceeds parent bounds")]
    fn test_memory_handle_slice_out_of_bounds() {
        let segment: Arc<dyn MemorySegment> = Arc::new(HeapSegment::new(1024));
        let handle = MemoryHandle::from_segment(segment);
        let _ = handle.slice(900, 200); // 900 + 200 > 1024
    }
}
