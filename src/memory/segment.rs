//! Memory segment trait and types.

use bytes::Bytes;

/// Type of memory backing a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoryType {
    /// Heap allocation owned by the segment.
    Heap,
    /// Reference-counted storage owned by a `bytes::Bytes` handle
    /// (typically produced by network or file readers).
    Bytes,
}

/// Trait for memory segment backends.
///
/// A memory segment is an immutable, contiguous byte region. Chunks refer
/// to segments through `Arc<dyn MemorySegment>` so several chunks (and
/// zero-copy views handed out by the adapter) can share one allocation.
///
/// Implementations must return the same slice, at the same address, for the
/// whole lifetime of the segment. The adapter relies on this to merge
/// neighbouring sub-ranges of one segment without copying.
pub trait MemorySegment: Send + Sync {
    /// The segment contents.
    fn as_slice(&self) -> &[u8];

    /// Total size of the segment in bytes.
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Returns true if the segment has zero length.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The type of memory backing this segment.
    fn memory_type(&self) -> MemoryType;
}

impl MemorySegment for Bytes {
    fn as_slice(&self) -> &[u8] {
        self.as_ref()
    }

    fn len(&self) -> usize {
        Bytes::len(self)
    }

    fn memory_type(&self) -> MemoryType {
        MemoryType::Bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_segment() {
        let bytes = Bytes::from_static(b"parallax");
        let segment: &dyn MemorySegment = &bytes;
        assert_eq!(segment.len(), 8);
        assert_eq!(segment.as_slice(), b"parallax");
        assert_eq!(segment.memory_type(), MemoryType::Bytes);
        assert!(!segment.is_empty());
    }
}
