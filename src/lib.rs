//! # Parallax Adapter
//!
//! Byte-stream buffering primitives for streaming pipelines.
//!
//! Upstream stages deliver data in chunks of whatever size the transport or
//! demuxer produced. Downstream stages usually want something else: a fixed
//! packet size, a header whose length is only known after parsing, a whole
//! frame. This crate bridges the two.
//!
//! ## Features
//!
//! - **[`ChunkAdapter`](adapter::ChunkAdapter)**: accumulate chunks, read any
//!   number of bytes, copy only when a read really spans allocations
//! - **Zero-copy sub-chunks**: reads inside one chunk share its memory
//! - **Adjacency merging**: neighbouring chunks cut from one allocation are
//!   joined instead of copied
//! - **Timestamp tracking**: last pts/dts/offset and byte distance since
//! - **[`RingArray`](collections::RingArray)**: growable double-ended queue
//!   with sorted insert and removal from the middle
//!
//! ## Quick Start
//!
//! ```rust
//! use parallax_adapter::prelude::*;
//!
//! let mut adapter = ChunkAdapter::new();
//! adapter.push(Chunk::from_vec(vec![0x47; 100]));
//! adapter.push(Chunk::from_vec(vec![0x47; 100]));
//!
//! // Fixed-size 188 byte packets.
//! let packet = adapter.take_chunk(188)?;
//! assert_eq!(packet.len(), 188);
//! assert_eq!(adapter.available(), 12);
//! # Ok::<(), parallax_adapter::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod adapter;
pub mod chunk;
pub mod clock;
pub mod collections;
pub mod error;
pub mod memory;
pub mod metadata;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::adapter::{AdapterConfig, AdapterStats, ChunkAdapter, PrevTimestamp};
    pub use crate::chunk::{Chunk, MemoryHandle};
    pub use crate::clock::ClockTime;
    pub use crate::collections::RingArray;
    pub use crate::error::{Error, Result};
    pub use crate::memory::{HeapSegment, MemorySegment, MemoryType};
    pub use crate::metadata::{ChunkFlags, Metadata};
}

pub use error::{Error, Result};
