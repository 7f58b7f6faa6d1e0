//! Chunk adapter: turns irregular input chunks into reads of any size.
//!
//! Producers push [`Chunk`]s as they arrive. Consumers ask for exactly the
//! number of bytes they need (a fixed-size packet, a parsed header length,
//! an audio frame) and the adapter serves them with as little copying as
//! possible:
//!
//! 1. a view into the head chunk when it alone holds the requested bytes,
//! 2. a view into a chunk joined from neighbours that share one allocation,
//! 3. a copy into an internal scratch buffer as the last resort.
//!
//! # Example
//!
//! ```rust
//! use parallax_adapter::adapter::ChunkAdapter;
//! use parallax_adapter::chunk::Chunk;
//!
//! let mut adapter = ChunkAdapter::new();
//! adapter.push(Chunk::from_vec(b"hel".to_vec()));
//! adapter.push(Chunk::from_vec(b"lo wor".to_vec()));
//! adapter.push(Chunk::from_vec(b"ld".to_vec()));
//!
//! while adapter.available() >= 4 {
//!     let packet = adapter.take(4)?;
//!     assert_eq!(packet.len(), 4);
//! }
//! assert_eq!(adapter.available(), 3);
//! # Ok::<(), parallax_adapter::Error>(())
//! ```
//!
//! The adapter is not synchronized. A pipeline stage owns it exclusively.

mod config;
mod scan;
mod stats;
mod timestamps;

pub use config::{AdapterConfig, DEFAULT_QUEUE_CAPACITY, DEFAULT_SCRATCH_BLOCK_SIZE};
pub use stats::AdapterStats;
pub use timestamps::PrevTimestamp;

use crate::chunk::Chunk;
use crate::clock::ClockTime;
use crate::collections::RingArray;
use crate::error::{Error, Result};
use crate::metadata::Metadata;
use timestamps::TimestampTracker;
use tracing::{debug, trace};

/// Accumulates chunks and serves contiguous reads of arbitrary size.
///
/// # Invariants
///
/// - `size` equals the total length of all queued chunks minus `skip`.
/// - `skip < head.len()` whenever a chunk is queued, and `skip == 0` when
///   the queue is empty. Empty chunks never sit at the head.
/// - `assembled[..assembled_len]` is a copy of the first `assembled_len`
///   available bytes; every flush resets `assembled_len` to 0.
pub struct ChunkAdapter {
    config: AdapterConfig,
    chunks: RingArray<Chunk>,
    /// Bytes of the head chunk that were already flushed.
    skip: usize,
    /// Bytes available for reading.
    size: usize,
    /// Scratch buffer; its length is its capacity.
    assembled: Vec<u8>,
    assembled_len: usize,
    timestamps: TimestampTracker,
    stats: AdapterStats,
}

impl ChunkAdapter {
    /// Create an adapter with default settings.
    pub fn new() -> Self {
        Self::with_config(AdapterConfig::default())
    }

    /// Create an adapter with the given configuration.
    pub fn with_config(config: AdapterConfig) -> Self {
        Self {
            chunks: RingArray::new(config.queue_capacity),
            config,
            skip: 0,
            size: 0,
            assembled: Vec::new(),
            assembled_len: 0,
            timestamps: TimestampTracker::default(),
            stats: AdapterStats::default(),
        }
    }

    /// Name used in log events.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// The adapter's configuration.
    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Counters describing how reads were served.
    pub fn stats(&self) -> &AdapterStats {
        &self.stats
    }

    /// Append a chunk. The adapter takes ownership of it.
    ///
    /// No merging happens here; adjacent chunks are only joined when a read
    /// needs it. An empty chunk pushed into an empty adapter only updates
    /// the timestamp tracking.
    pub fn push(&mut self, chunk: Chunk) {
        let len = chunk.len();
        self.stats.chunks_pushed += 1;
        self.stats.bytes_pushed += len as u64;

        if self.chunks.is_empty() {
            self.timestamps.on_new_head(chunk.metadata());
            if len == 0 {
                trace!(adapter = %self.config.name, "dropping empty chunk");
                return;
            }
        }

        self.size += len;
        self.chunks.push_back(chunk);
        trace!(
            adapter = %self.config.name,
            size = len,
            available = self.size,
            queued = self.chunks.len(),
            "pushed chunk"
        );
    }

    /// Number of bytes available for reading.
    #[inline]
    pub fn available(&self) -> usize {
        self.size
    }

    /// Returns true when no bytes are available.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of bytes that [`peek`](Self::peek) can return without
    /// copying or merging.
    pub fn available_contiguous_fast(&self) -> usize {
        if self.assembled_len > 0 {
            return self.assembled_len;
        }
        self.head_available()
    }

    fn head_available(&self) -> usize {
        self.chunks
            .peek_front()
            .map_or(0, |head| head.len() - self.skip)
    }

    fn head_view(&self, n: usize) -> &[u8] {
        match self.chunks.peek_front() {
            Some(head) => &head.as_bytes()[self.skip..self.skip + n],
            None => &[],
        }
    }

    fn ensure_available(&self, requested: usize) -> Result<()> {
        if requested > self.size {
            return Err(Error::InsufficientData {
                requested,
                available: self.size,
            });
        }
        Ok(())
    }

    /// Get a contiguous view of the first `n` bytes without consuming them.
    ///
    /// The view is valid until the next call that mutates the adapter. When
    /// the head chunk holds all `n` bytes the view points into the chunk's
    /// own memory; otherwise neighbouring chunks are joined if they share an
    /// allocation, and only then is the data copied into a scratch buffer.
    ///
    /// # Errors
    ///
    /// [`Error::InsufficientData`] if `n > available()`.
    pub fn peek(&mut self, n: usize) -> Result<&[u8]> {
        self.ensure_available(n)?;
        if n == 0 {
            return Ok(&[]);
        }

        if self.assembled_len >= n {
            return Ok(&self.assembled[..n]);
        }

        if self.head_available() >= n || self.try_merge_up(n) {
            self.stats.zero_copy_reads += 1;
            return Ok(self.head_view(n));
        }

        self.assemble(n);
        Ok(&self.assembled[..n])
    }

    /// Join the head chunk with its neighbours while they share an allocation
    /// and the head holds fewer than `n` bytes.
    ///
    /// Returns true when the head now holds at least `n` available bytes.
    fn try_merge_up(&mut self, n: usize) -> bool {
        if !self.config.merge_adjacent {
            return false;
        }

        while self.head_available() < n {
            let joined = match (self.chunks.peek_nth(0), self.chunks.peek_nth(1)) {
                (Some(head), Some(next)) => head.span(next),
                _ => None,
            };
            let Some(joined) = joined else {
                break;
            };

            self.chunks.pop_front();
            self.chunks.pop_front();
            trace!(
                adapter = %self.config.name,
                size = joined.len(),
                "merged adjacent chunks"
            );
            self.chunks.push_front(joined);
            self.stats.merges += 1;
        }

        self.head_available() >= n
    }

    /// Copy the first `n` bytes into the scratch buffer.
    fn assemble(&mut self, n: usize) {
        if self.assembled.len() < n {
            let capacity = self.config.scratch_capacity_for(n);
            debug!(
                adapter = %self.config.name,
                from = self.assembled.len(),
                to = capacity,
                "growing scratch buffer"
            );
            self.assembled.resize(capacity, 0);
        }

        copy_from_queue(&self.chunks, &mut self.assembled[..n], self.skip);
        self.assembled_len = n;
        self.stats.assembled_copies += 1;
        self.stats.bytes_copied += n as u64;
        trace!(adapter = %self.config.name, size = n, "assembled bytes");
    }

    /// Copy `n` bytes starting `offset` bytes past the read position into
    /// `dest`, without consuming anything.
    ///
    /// # Errors
    ///
    /// [`Error::InsufficientData`] if `offset + n > available()`.
    ///
    /// # Panics
    ///
    /// Panics if `dest` is shorter than `n`.
    pub fn copy_into(&self, dest: &mut [u8], offset: usize, n: usize) -> Result<()> {
        let end = offset.saturating_add(n);
        self.ensure_available(end)?;
        assert!(dest.len() >= n, "destination shorter than requested copy");
        if n == 0 {
            return Ok(());
        }

        if end <= self.assembled_len {
            dest[..n].copy_from_slice(&self.assembled[offset..end]);
        } else {
            copy_from_queue(&self.chunks, &mut dest[..n], self.skip + offset);
        }
        Ok(())
    }

    /// Discard the first `n` bytes.
    ///
    /// # Errors
    ///
    /// [`Error::InsufficientData`] if `n > available()`.
    pub fn flush(&mut self, n: usize) -> Result<()> {
        self.ensure_available(n)?;
        self.flush_unchecked(n);
        Ok(())
    }

    fn flush_unchecked(&mut self, n: usize) {
        debug_assert!(n <= self.size);
        self.size -= n;
        self.assembled_len = 0;
        self.stats.bytes_flushed += n as u64;

        let mut remaining = n;
        while let Some(head) = self.chunks.peek_front() {
            let head_left = head.len() - self.skip;
            if remaining < head_left {
                self.skip += remaining;
                self.timestamps.advance(remaining);
                remaining = 0;
                break;
            }

            // Whole head consumed; this also pops empty chunks behind it.
            remaining -= head_left;
            self.timestamps.advance(head_left);
            self.skip = 0;
            self.chunks.pop_front();
            if let Some(next) = self.chunks.peek_front() {
                self.timestamps.on_new_head(next.metadata());
            }
        }
        debug_assert_eq!(remaining, 0);

        trace!(
            adapter = %self.config.name,
            flushed = n,
            available = self.size,
            "flushed bytes"
        );
    }

    /// Remove the first `n` bytes and return them as a new vector.
    ///
    /// # Errors
    ///
    /// [`Error::InsufficientData`] if `n > available()`.
    pub fn take(&mut self, n: usize) -> Result<Vec<u8>> {
        self.ensure_available(n)?;
        let mut data = vec![0u8; n];
        self.copy_into(&mut data, 0, n)?;
        self.stats.bytes_copied += n as u64;
        self.flush_unchecked(n);
        Ok(data)
    }

    /// Get the first `n` bytes as a chunk without consuming them.
    ///
    /// Prefers a zero-copy sub-range of the head chunk, then a sub-range of
    /// a merged head, and copies only when neither is possible. A sub-range
    /// shares memory with the queued chunk and keeps it alive on its own.
    ///
    /// # Errors
    ///
    /// [`Error::InsufficientData`] if `n > available()`.
    pub fn get_chunk(&mut self, n: usize) -> Result<Chunk> {
        self.ensure_available(n)?;
        if n == 0 {
            return Ok(Chunk::from_vec(Vec::new()));
        }

        if self.head_available() >= n || self.try_merge_up(n) {
            if let Some(head) = self.chunks.peek_front() {
                self.stats.zero_copy_reads += 1;
                return Ok(head.slice(self.skip, n));
            }
        }

        let mut data = vec![0u8; n];
        self.copy_into(&mut data, 0, n)?;
        self.stats.bytes_copied += n as u64;
        trace!(adapter = %self.config.name, size = n, "copied chunk");
        Ok(Chunk::from_vec(data).with_metadata(self.assembled_metadata(n)))
    }

    /// Metadata for `n` bytes copied from the read position onwards.
    fn assembled_metadata(&self, n: usize) -> Metadata {
        let Some(head) = self.chunks.peek_front() else {
            return Metadata::default();
        };
        let mut meta = head
            .metadata()
            .for_region(self.skip, head.len() - self.skip, head.len());
        meta.duration = ClockTime::NONE;
        meta.offset_end = meta.offset.map(|offset| offset + n as u64);
        meta.flags.eos = false;
        meta
    }

    /// Remove the first `n` bytes and return them as a chunk.
    ///
    /// See [`get_chunk`](Self::get_chunk) for how the chunk is produced.
    ///
    /// # Errors
    ///
    /// [`Error::InsufficientData`] if `n > available()`.
    pub fn take_chunk(&mut self, n: usize) -> Result<Chunk> {
        let chunk = self.get_chunk(n)?;
        self.flush_unchecked(n);
        Ok(chunk)
    }

    /// Remove the first `n` bytes as a list of chunks, one per queued chunk
    /// they touch. No data is copied.
    ///
    /// # Errors
    ///
    /// [`Error::InsufficientData`] if `n > available()`.
    pub fn take_list(&mut self, n: usize) -> Result<Vec<Chunk>> {
        self.ensure_available(n)?;
        let mut list = Vec::new();
        let mut remaining = n;
        while remaining > 0 {
            let len = self.head_available().min(remaining);
            debug_assert!(len > 0);
            list.push(self.take_chunk(len)?);
            remaining -= len;
        }
        Ok(list)
    }

    /// Drop all queued chunks and reset the read position and timestamps.
    pub fn clear(&mut self) {
        debug!(
            adapter = %self.config.name,
            dropped = self.size,
            chunks = self.chunks.len(),
            "clearing adapter"
        );
        self.chunks.clear();
        self.size = 0;
        self.skip = 0;
        self.assembled_len = 0;
        self.timestamps = TimestampTracker::default();
    }

    /// The last pts seen at or before the read position and the number of
    /// bytes consumed since.
    pub fn prev_pts(&self) -> PrevTimestamp<ClockTime> {
        self.timestamps.prev_pts()
    }

    /// The last dts seen at or before the read position and the number of
    /// bytes consumed since.
    pub fn prev_dts(&self) -> PrevTimestamp<ClockTime> {
        self.timestamps.prev_dts()
    }

    /// The last stream offset seen at or before the read position and the
    /// number of bytes consumed since.
    pub fn prev_offset(&self) -> PrevTimestamp<Option<u64>> {
        self.timestamps.prev_offset()
    }

    /// Pts of the last chunk flagged as a discontinuity.
    pub fn pts_at_discont(&self) -> ClockTime {
        self.timestamps.pts_at_discont()
    }

    /// Dts of the last chunk flagged as a discontinuity.
    pub fn dts_at_discont(&self) -> ClockTime {
        self.timestamps.dts_at_discont()
    }

    /// Stream offset of the last chunk flagged as a discontinuity.
    pub fn offset_at_discont(&self) -> Option<u64> {
        self.timestamps.offset_at_discont()
    }

    /// Bytes consumed since the last discontinuity.
    pub fn distance_from_discont(&self) -> u64 {
        self.timestamps.distance_from_discont()
    }
}

impl Default for ChunkAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ChunkAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkAdapter")
            .field("name", &self.config.name)
            .field("available", &self.size)
            .field("chunks", &self.chunks.len())
            .field("skip", &self.skip)
            .field("assembled_len", &self.assembled_len)
            .finish()
    }
}

/// Fill `dest` with queued bytes, starting `offset` bytes into the first chunk.
fn copy_from_queue(chunks: &RingArray<Chunk>, dest: &mut [u8], mut offset: usize) {
    let mut written = 0;
    for chunk in chunks {
        if written == dest.len() {
            break;
        }
        let bytes = chunk.as_bytes();
        if offset >= bytes.len() {
            offset -= bytes.len();
            continue;
        }
        let len = (bytes.len() - offset).min(dest.len() - written);
        dest[written..written + len].copy_from_slice(&bytes[offset..offset + len]);
        written += len;
        offset = 0;
    }
    debug_assert_eq!(written, dest.len());
}
