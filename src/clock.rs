//! Stream time type carried by chunk metadata.
//!
//! [`ClockTime`] is a nanosecond timestamp with a `NONE` sentinel. The
//! adapter uses it for presentation/decode timestamps and durations and
//! to interpolate timestamps at byte positions inside a chunk.

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Time in nanoseconds (8 bytes, Copy).
///
/// # Special Values
///
/// - `ClockTime::ZERO`: Zero time
/// - `ClockTime::NONE`: Invalid/unset time (sentinel value)
/// - `ClockTime::MAX`: Maximum representable time
///
/// # Examples
///
/// ```rust
/// use parallax_adapter::clock::ClockTime;
///
/// let t1 = ClockTime::from_secs(1);
/// let t2 = ClockTime::from_millis(500);
/// let t3 = t1 + t2;
///
/// assert_eq!(t3, ClockTime::from_millis(1500));
/// assert_eq!(format!("{}", t3), "1.500s");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ClockTime(u64);

impl ClockTime {
    /// Zero time.
    pub const ZERO: Self = Self(0);

    /// Maximum representable time (one less than NONE sentinel).
    pub const MAX: Self = Self(u64::MAX - 1);

    /// Invalid/unset time (sentinel value).
    pub const NONE: Self = Self(u64::MAX);

    /// Create from milliseconds.
    #[inline]
    pub const fn from_millis(ms: u64) -> Self {
        Self(ms.saturating_mul(1_000_000))
    }

    /// Create from seconds.
    #[inline]
    pub const fn from_secs(s: u64) -> Self {
        Self(s.saturating_mul(NANOS_PER_SEC))
    }

    /// Get as seconds (truncated).
    #[inline]
    pub const fn secs(self) -> u64 {
        self.0 / NANOS_PER_SEC
    }

    /// Check if this is the NONE sentinel value.
    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == u64::MAX
    }

    /// Check if this is a valid time (not NONE).
    #[inline]
    pub const fn is_some(self) -> bool {
        self.0 != u64::MAX
    }

    /// Saturating addition. Returns NONE if either operand is NONE.
    #[inline]
    pub const fn saturating_add(self, rhs: Self) -> Self {
        if self.is_none() || rhs.is_none() {
            return Self::NONE;
        }
        let result = self.0.saturating_add(rhs.0);
        // Don't overflow into NONE
        if result == u64::MAX {
            Self::MAX
        } else {
            Self(result)
        }
    }

    /// Duration covered by `bytes` at `bytes_per_second`.
    ///
    /// Returns NONE when the rate is zero. The intermediate product is
    /// computed in 128 bits so large byte counts do not overflow.
    pub fn from_byte_distance(bytes: u64, bytes_per_second: u64) -> Self {
        if bytes_per_second == 0 {
            return Self::NONE;
        }
        let ns = (bytes as u128 * NANOS_PER_SEC as u128) / bytes_per_second as u128;
        if ns >= u64::MAX as u128 {
            Self::MAX
        } else {
            Self(ns as u64)
        }
    }
}

impl Default for ClockTime {
    fn default() -> Self {
        Self::NONE
    }
}

impl std::ops::Add for ClockTime {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        self.saturating_add(rhs)
    }
}

impl std::fmt::Display for ClockTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "NONE")
        } else {
            let ms = (self.0 / 1_000_000) % 1000;
            write!(f, "{}.{:03}s", self.secs(), ms)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_time_default_is_none() {
        assert!(ClockTime::default().is_none());
    }

    #[test]
    fn test_clock_time_none_arithmetic() {
        let t = ClockTime::from_secs(1);
        assert!((t + ClockTime::NONE).is_none());
        assert!((ClockTime::NONE + t).is_none());
        assert_eq!(ClockTime::MAX + t, ClockTime::MAX);
    }

    #[test]
    fn test_clock_time_display() {
        assert_eq!(format!("{}", ClockTime::from_millis(2_250)), "2.250s");
        assert_eq!(format!("{}", ClockTime::NONE), "NONE");
    }

    #[test]
    fn test_from_byte_distance() {
        // 48kHz stereo s16 = 192000 bytes per second
        assert_eq!(
            ClockTime::from_byte_distance(19_200, 192_000),
            ClockTime::from_millis(100)
        );
        assert!(ClockTime::from_byte_distance(10, 0).is_none());
        assert_eq!(ClockTime::from_byte_distance(0, 1), ClockTime::ZERO);
    }
}
