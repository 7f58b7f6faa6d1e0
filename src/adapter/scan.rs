//! Pattern scanning over queued bytes.

use super::ChunkAdapter;
use crate::error::{Error, Result};

impl ChunkAdapter {
    /// Find the first position in `[offset, offset + size - 4]` whose
    /// big-endian u32 satisfies `value & mask == pattern`.
    ///
    /// Positions are relative to the read position. The scan reads the
    /// queued chunks in place, so patterns straddling chunk boundaries are
    /// found without copying. Returns `Ok(None)` when nothing matches or
    /// `size < 4`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidPattern`] if `pattern` has bits outside `mask`.
    /// - [`Error::InsufficientData`] if `offset + size > available()`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use parallax_adapter::adapter::ChunkAdapter;
    /// use parallax_adapter::chunk::Chunk;
    ///
    /// let mut adapter = ChunkAdapter::new();
    /// adapter.push(Chunk::from_vec(vec![0xff, 0x00, 0x00]));
    /// adapter.push(Chunk::from_vec(vec![0x01, 0x65, 0xaa]));
    ///
    /// let pos = adapter.masked_scan_u32(0xffff_ffff, 0x0000_0165, 0, 6)?;
    /// assert_eq!(pos, Some(1));
    /// # Ok::<(), parallax_adapter::Error>(())
    /// ```
    pub fn masked_scan_u32(
        &self,
        mask: u32,
        pattern: u32,
        offset: usize,
        size: usize,
    ) -> Result<Option<usize>> {
        Ok(self
            .masked_scan_u32_peek(mask, pattern, offset, size)?
            .map(|(pos, _)| pos))
    }

    /// Like [`masked_scan_u32`](Self::masked_scan_u32), also returning the
    /// full 32-bit value found at the match.
    ///
    /// # Errors
    ///
    /// Same as [`masked_scan_u32`](Self::masked_scan_u32).
    pub fn masked_scan_u32_peek(
        &self,
        mask: u32,
        pattern: u32,
        offset: usize,
        size: usize,
    ) -> Result<Option<(usize, u32)>> {
        if pattern & !mask != 0 {
            return Err(Error::InvalidPattern { mask, pattern });
        }
        let end = offset.saturating_add(size);
        if end > self.size {
            return Err(Error::InsufficientData {
                requested: end,
                available: self.size,
            });
        }
        if size < 4 {
            return Ok(None);
        }

        let mut bytes = self.bytes_from(offset);
        let mut state: u32 = 0;
        for _ in 0..3 {
            match bytes.next() {
                Some(b) => state = (state << 8) | u32::from(b),
                None => return Ok(None),
            }
        }

        for pos in offset..=end - 4 {
            let Some(b) = bytes.next() else {
                break;
            };
            state = (state << 8) | u32::from(b);
            if state & mask == pattern {
                return Ok(Some((pos, state)));
            }
        }
        Ok(None)
    }

    /// Iterate over available bytes starting `offset` bytes past the read
    /// position.
    fn bytes_from(&self, offset: usize) -> impl Iterator<Item = u8> + '_ {
        let mut to_skip = self.skip + offset;
        self.chunks
            .iter()
            .filter_map(move |chunk| {
                let bytes = chunk.as_bytes();
                if to_skip >= bytes.len() {
                    to_skip -= bytes.len();
                    return None;
                }
                let start = to_skip;
                to_skip = 0;
                Some(&bytes[start..])
            })
            .flatten()
            .copied()
    }
}
