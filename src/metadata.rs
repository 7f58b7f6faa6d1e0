//! Chunk metadata types.

use crate::clock::ClockTime;

/// Flags indicating chunk properties.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChunkFlags {
    /// Data does not continue from the previous chunk.
    pub discont: bool,
    /// Chunk is a gap marker (no meaningful payload).
    pub gap: bool,
    /// Chunk marks end of stream.
    pub eos: bool,
}

impl ChunkFlags {
    /// Check if discont flag is set.
    pub fn is_discont(&self) -> bool {
        self.discont
    }
}

/// Metadata associated with a chunk.
///
/// Timing fields use [`ClockTime::NONE`] when unset; stream offsets use
/// `None`. `offset` is the stream position of the first byte and
/// `offset_end` the position just past the last byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metadata {
    /// Presentation timestamp.
    pub pts: ClockTime,

    /// Decode timestamp.
    pub dts: ClockTime,

    /// Duration of this chunk's content.
    pub duration: ClockTime,

    /// Monotonic sequence number within a stream.
    pub sequence: u64,

    /// Byte offset in the original source.
    pub offset: Option<u64>,

    /// End byte offset in the original source.
    pub offset_end: Option<u64>,

    /// Chunk flags.
    pub flags: ChunkFlags,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            pts: ClockTime::NONE,
            dts: ClockTime::NONE,
            duration: ClockTime::NONE,
            sequence: 0,
            offset: None,
            offset_end: None,
            flags: ChunkFlags::default(),
        }
    }
}

impl Metadata {
    /// Create new metadata with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create metadata with a sequence number.
    pub fn with_sequence(sequence: u64) -> Self {
        Self {
            sequence,
            ..Default::default()
        }
    }

    /// Set the presentation timestamp.
    pub fn with_pts(mut self, pts: ClockTime) -> Self {
        self.pts = pts;
        self
    }

    /// Set the decode timestamp.
    pub fn with_dts(mut self, dts: ClockTime) -> Self {
        self.dts = dts;
        self
    }

    /// Set the duration.
    pub fn with_duration(mut self, duration: ClockTime) -> Self {
        self.duration = duration;
        self
    }

    /// Set the stream byte range `[offset, offset_end)`.
    pub fn with_offsets(mut self, offset: u64, offset_end: u64) -> Self {
        self.offset = Some(offset);
        self.offset_end = Some(offset_end);
        self
    }

    /// Mark as a discontinuity.
    pub fn with_discont(mut self) -> Self {
        self.flags.discont = true;
        self
    }

    /// Mark as a gap.
    pub fn with_gap(mut self) -> Self {
        self.flags.gap = true;
        self
    }

    /// Metadata for a region starting `skip` bytes into the chunk this
    /// metadata describes and covering `len` of its `total` bytes.
    ///
    /// Timestamps and the discont flag only describe the first byte, so they
    /// survive only when `skip == 0`. Duration and end offset survive only
    /// when the region reaches the end of the chunk. The byte offset is
    /// shifted when known.
    pub fn for_region(&self, skip: usize, len: usize, total: usize) -> Self {
        let starts_at_head = skip == 0;
        let reaches_end = skip + len == total;

        Self {
            pts: if starts_at_head { self.pts } else { ClockTime::NONE },
            dts: if starts_at_head { self.dts } else { ClockTime::NONE },
            duration: if starts_at_head && reaches_end {
                self.duration
            } else {
                ClockTime::NONE
            },
            sequence: self.sequence,
            offset: self.offset.map(|o| o + skip as u64),
            offset_end: match (self.offset, reaches_end) {
                (_, true) => self.offset_end,
                (Some(o), false) => Some(o + (skip + len) as u64),
                (None, false) => None,
            },
            flags: ChunkFlags {
                discont: starts_at_head && self.flags.discont,
                gap: self.flags.gap,
                eos: reaches_end && self.flags.eos,
            },
        }
    }

    /// Metadata for the concatenation of a chunk described by `self`
    /// followed by a chunk described by `next`.
    pub fn merged_with(&self, next: &Metadata) -> Self {
        Self {
            duration: self.duration + next.duration,
            offset_end: next.offset_end,
            flags: ChunkFlags {
                discont: self.flags.discont,
                gap: self.flags.gap && next.flags.gap,
                eos: next.flags.eos,
            },
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_builder() {
        let meta = Metadata::with_sequence(42)
            .with_pts(ClockTime::from_millis(100))
            .with_duration(ClockTime::from_millis(33))
            .with_offsets(1000, 1188)
            .with_discont();

        assert_eq!(meta.sequence, 42);
        assert_eq!(meta.pts, ClockTime::from_millis(100));
        assert!(meta.dts.is_none());
        assert_eq!(meta.duration, ClockTime::from_millis(33));
        assert_eq!(meta.offset, Some(1000));
        assert!(meta.flags.is_discont());
    }

    #[test]
    fn test_region_from_middle_drops_timestamps() {
        let meta = Metadata::new()
            .with_pts(ClockTime::from_secs(1))
            .with_duration(ClockTime::from_millis(20))
            .with_offsets(100, 200)
            .with_discont();

        let mid = meta.for_region(10, 50, 100);
        assert!(mid.pts.is_none());
        assert!(mid.duration.is_none());
        assert_eq!(mid.offset, Some(110));
        assert_eq!(mid.offset_end, Some(160));
        assert!(!mid.flags.discont);

        let head = meta.for_region(0, 100, 100);
        assert_eq!(head, meta);

        let tail = meta.for_region(60, 40, 100);
        assert_eq!(tail.offset_end, Some(200));
    }

    #[test]
    fn test_merged_metadata() {
        let a = Metadata::new()
            .with_pts(ClockTime::from_millis(0))
            .with_duration(ClockTime::from_millis(10))
            .with_offsets(0, 10);
        let b = Metadata::new()
            .with_pts(ClockTime::from_millis(10))
            .with_duration(ClockTime::from_millis(10))
            .with_offsets(10, 20);

        let m = a.merged_with(&b);
        assert_eq!(m.pts, ClockTime::ZERO);
        assert_eq!(m.duration, ClockTime::from_millis(20));
        assert_eq!(m.offset, Some(0));
        assert_eq!(m.offset_end, Some(20));
    }
}
