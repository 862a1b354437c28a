//! Fixed-capacity pages with bump allocation.
//!
//! A [`Page`] is a header (`size`, `used`) plus a separately owned word
//! buffer. Pages are created with exactly the requested capacity, never
//! shrink, and are never compacted; a page that cannot fit a request is
//! skipped, not split.

use crate::capabilities::ALIGNMENT;
use crate::error::ArenaError;
use crate::raw;

/// Reserve `bytes` of word-aligned storage without aborting on failure.
/// `bytes` must be a multiple of [`ALIGNMENT`].
///
/// The returned buffer is empty with at least `bytes / ALIGNMENT` words of
/// capacity; callers initialise words as they hand them out.
pub(crate) fn try_alloc_words(bytes: usize) -> Result<Vec<u64>, ArenaError> {
    debug_assert_eq!(bytes % ALIGNMENT, 0);
    let words = bytes / ALIGNMENT;
    let mut data = Vec::new();
    if fail_hook::should_fail() || data.try_reserve_exact(words).is_err() {
        tracing::warn!(bytes, "backing allocation failed");
        return Err(ArenaError::OutOfMemory { requested: bytes });
    }
    Ok(data)
}


#[cfg(not(test))]
mod fail_hook {
    #[inline]
    pub(super) fn should_fail() -> bool {
        false
    }
}

/// A single contiguous page with bump allocation.
pub struct Page {
    /// Backing storage. Capacity is reserved at creation; words are
    /// initialised only once handed out.
    data: Vec<u64>,
    /// Capacity in bytes.
    size: usize,
    /// Bump pointer: bytes handed out so far.
    used: usize,
}

impl Page {
    /// Create a page of `size` bytes. `size` must be a multiple of the
    /// alignment guarantee.
    ///
    /// Returns `Err(ArenaError::OutOfMemory)` if the storage cannot be
    /// obtained.
    pub fn new(size: usize) -> Result<Self, ArenaError> {
        Ok(Self {
            data: try_alloc_words(size)?,
            size,
            used: 0,
        })
    }

    /// Bump-allocate `len` bytes (already aligned).
    ///
    /// Returns the offset of the region, or `None` if the page does not
    /// have `len` bytes left.
    pub fn try_bump(&mut self, len: usize) -> Option<usize> {
        if len > self.remaining() {
            return None;
        }
        let offset = self.used;
        self.used += len;
        let words = self.used.div_ceil(ALIGNMENT);
        if words > self.data.len() {
            // Within the reserved capacity, so the buffer never moves.
            self.data.resize(words, 0);
        }
        Some(offset)
    }

    /// Whether `len` bytes would fit.
    pub fn fits(&self, len: usize) -> bool {
        len <= self.remaining()
    }

    /// Byte view of `[offset, offset + len)`, or `None` if the range is not
    /// within the used region.
    pub fn bytes(&self, offset: usize, len: usize) -> Option<&[u8]> {
        let end = offset.checked_add(len)?;
        if end > self.used {
            return None;
        }
        Some(&raw::as_bytes(&self.data)[offset..end])
    }

    /// Mutable byte view of `[offset, offset + len)`.
    pub fn bytes_mut(&mut self, offset: usize, len: usize) -> Option<&mut [u8]> {
        let end = offset.checked_add(len)?;
        if end > self.used {
            return None;
        }
        Some(&mut raw::as_bytes_mut(&mut self.data)[offset..end])
    }

    #[cfg(test)]
    fn base_ptr(&self) -> *const u8 {
        self.data.as_ptr().cast()
    }

    /// Reset the bump pointer without deallocating or zeroing.
    pub fn reset(&mut self) {
        self.used = 0;
    }

    /// Bytes handed out.
    pub fn used(&self) -> usize {
        self.used
    }

    /// Capacity in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Bytes still free.
    pub fn remaining(&self) -> usize {
        self.size - self.used
    }

    /// Percentage of the page in use.
    pub fn utilization(&self) -> f64 {
        crate::stats::percent(self.used, self.size)
    }
}
