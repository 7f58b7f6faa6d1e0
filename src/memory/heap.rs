//! Heap-backed memory segment.

use super::{MemorySegment, MemoryType};

/// A memory segment backed by a heap allocation.
///
/// This is the segment the adapter allocates when it has to assemble data
/// from several chunks into a fresh one.
///
/// # Example
///
/// ```rust
/// use parallax_adapter::memory::{HeapSegment, MemorySegment};
///
/// let segment = HeapSegment::new(1024);
/// assert_eq!(segment.len(), 1024);
/// ```
pub struct HeapSegment {
    /// Using a boxed slice ensures the memory is contiguous and won't be reallocated.
    data: Box<[u8]>,
}

impl HeapSegment {
    /// Create a zero-initialized heap segment of `size` bytes.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0u8; size].into_boxed_slice(),
        }
    }

    /// Take ownership of an existing vector without copying its contents.
    ///
    /// Spare capacity is released.
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self {
            data: data.into_boxed_slice(),
        }
    }

    /// Create a segment holding a copy of `data`.
    pub fn copy_from_slice(data: &[u8]) -> Self {
        Self {
            data: Box::from(data),
        }
    }
}

impl MemorySegment for HeapSegment {
    fn as_slice(&self) -> &[u8] {
        &self.data
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn memory_type(&self) -> MemoryType {
        MemoryType::Heap
    }
}

impl std::fmt::Debug for HeapSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeapSegment")
            .field("len", &self.data.len())
            .finish()
    }
}
