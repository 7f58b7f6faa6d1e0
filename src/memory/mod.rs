//! Memory backends for chunk storage.
//!
//! - [`MemorySegment`]: Trait for immutable, shareable byte storage
//! - [`HeapSegment`]: Heap allocation, used for data assembled by the adapter
//! - `bytes::Bytes` implements [`MemorySegment`] so producers that already
//!   hold `Bytes` can hand them over without copying
//!
//! # Example
//!
//! ```rust
//! use parallax_adapter::memory::{HeapSegment, MemorySegment};
//! use std::sync::Arc;
//!
//! let segment: Arc<dyn MemorySegment> = Arc::new(HeapSegment::from_vec(b"hello".to_vec()));
//! assert_eq!(segment.as_slice(), b"hello");
//! ```

mod heap;
mod segment;

pub use heap::HeapSegment;
pub use segment::{MemorySegment, MemoryType};
