//! Timestamp and offset tracking across flushes.

use crate::clock::ClockTime;
use crate::metadata::Metadata;

/// The most recent value seen at or before the adapter's read position,
/// and how many bytes have been consumed since.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrevTimestamp<T> {
    /// Last valid value carried by a chunk that became the head.
    pub value: T,
    /// Bytes flushed since that chunk became the head.
    pub distance: u64,
}

impl PrevTimestamp<ClockTime> {
    /// Estimate the timestamp of the current read position for a constant
    /// byte rate stream (raw audio, for example).
    ///
    /// Returns NONE when no timestamp has been seen or the rate is zero.
    pub fn interpolate(&self, bytes_per_second: u64) -> ClockTime {
        self.value + ClockTime::from_byte_distance(self.distance, bytes_per_second)
    }
}

#[derive(Debug, Clone)]
pub(super) struct TimestampTracker {
    pts: ClockTime,
    pts_distance: u64,
    dts: ClockTime,
    dts_distance: u64,
    offset: Option<u64>,
    offset_distance: u64,
    pts_at_discont: ClockTime,
    dts_at_discont: ClockTime,
    offset_at_discont: Option<u64>,
    distance_from_discont: u64,
}

impl Default for TimestampTracker {
    fn default() -> Self {
        Self {
            pts: ClockTime::NONE,
            pts_distance: 0,
            dts: ClockTime::NONE,
            dts_distance: 0,
            offset: None,
            offset_distance: 0,
            pts_at_discont: ClockTime::NONE,
            dts_at_discont: ClockTime::NONE,
            offset_at_discont: None,
            distance_from_discont: 0,
        }
    }
}

impl TimestampTracker {
    /// Record the metadata of a chunk that just became the head.
    ///
    /// Each value is only taken over when the chunk actually carries it;
    /// otherwise the previous value stays and its distance keeps growing.
    pub(super) fn on_new_head(&mut self, meta: &Metadata) {
        if meta.pts.is_some() {
            self.pts = meta.pts;
            self.pts_distance = 0;
        }
        if meta.dts.is_some() {
            self.dts = meta.dts;
            self.dts_distance = 0;
        }
        if let Some(offset) = meta.offset {
            self.offset = Some(offset);
            self.offset_distance = 0;
        }
        if meta.flags.discont {
            self.pts_at_discont = meta.pts;
            self.dts_at_discont = meta.dts;
            self.offset_at_discont = meta.offset;
            self.distance_from_discont = 0;
        }
    }

    /// Account for `bytes` flushed from the front.
    pub(super) fn advance(&mut self, bytes: usize) {
        let bytes = bytes as u64;
        self.pts_distance += bytes;
        self.dts_distance += bytes;
        self.offset_distance += bytes;
        self.distance_from_discont += bytes;
    }

    pub(super) fn prev_pts(&self) -> PrevTimestamp<ClockTime> {
        PrevTimestamp {
            value: self.pts,
            distance: self.pts_distance,
        }
    }

    pub(super) fn prev_dts(&self) -> PrevTimestamp<ClockTime> {
        PrevTimestamp {
            value: self.dts,
            distance: self.dts_distance,
        }
    }

    pub(super) fn prev_offset(&self) -> PrevTimestamp<Option<u64>> {
        PrevTimestamp {
            value: self.offset,
            distance: self.offset_distance,
        }
    }

    pub(super) fn pts_at_discont(&self) -> ClockTime {
        self.pts_at_discont
    }

    pub(super) fn dts_at_discont(&self) -> ClockTime {
        self.dts_at_discont
    }

    pub(super) fn offset_at_discont(&self) -> Option<u64> {
        self.offset_at_discont
    }

    pub(super) fn distance_from_discont(&self) -> u64 {
        self.distance_from_discont
    }
}
