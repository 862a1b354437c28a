//! Allocation handles and save points.
//!
//! An [`Allocation`] encodes the physical location of a pushed region: which
//! page it lives in, where it starts, and how long it is. Handles are plain
//! values; resolving one to bytes goes through the arena that produced it.

use std::fmt;

/// Location of one pushed region within an arena.
///
/// The region lies entirely inside a single page. It stays valid until the
/// arena is reset or destroyed; after a reset, resolving an old handle may
/// fail or may observe memory handed out again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[must_use]
pub struct Allocation {
    /// Index of the page holding the region.
    pub(crate) page: usize,
    /// Byte offset of the region within its page.
    pub(crate) offset: usize,
    /// Requested length in bytes (before alignment rounding).
    pub(crate) len: usize,
}

impl Allocation {
    /// Create a new handle. Backends call this; callers receive handles.
    pub fn new(page: usize, offset: usize, len: usize) -> Self {
        Self { page, offset, len }
    }

    /// A zero-length allocation. Resolves to an empty slice on every arena.
    pub(crate) fn empty() -> Self {
        Self::new(0, 0, 0)
    }

    /// Index of the page holding this region.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Byte offset within the page.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Requested length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether this is a zero-length allocation.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// One past the last byte of the region within its page.
    ///
    /// Saturates at `usize::MAX` for handles that could never resolve.
    pub fn end(&self) -> usize {
        self.offset.saturating_add(self.len)
    }
}

impl fmt::Display for Allocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Allocation(page={}, off={}, len={})",
            self.page, self.offset, self.len
        )
    }
}

/// A recorded allocation cursor that a backend can rewind to.
///
/// Only produced by backends advertising
/// [`Features::SAVE_RESTORE`](crate::Features::SAVE_RESTORE).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SavePoint {
    /// Allocated bytes at the time the point was taken.
    pub(crate) allocated: usize,
    /// Reset epoch at the time the point was taken.
    pub(crate) epoch: u64,
}

impl SavePoint {
    /// Create a save point. Only backends construct these.
    pub fn new(allocated: usize, epoch: u64) -> Self {
        Self { allocated, epoch }
    }

    /// Allocated bytes recorded by this point.
    pub fn allocated(&self) -> usize {
        self.allocated
    }

    /// Reset epoch recorded by this point.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_round_trip() {
        let a = Allocation::new(3, 64, 40);
        assert_eq!(a.page(), 3);
        assert_eq!(a.offset(), 64);
        assert_eq!(a.len(), 40);
        assert_eq!(a.end(), 104);
        assert!(!a.is_empty());
    }

    #[test]
    fn end_saturates_on_overflowing_handle() {
        let a = Allocation::new(0, usize::MAX, 2);
        assert_eq!(a.end(), usize::MAX);
    }

    #[test]
    fn empty_handle() {
        assert!(Allocation::empty().is_empty());
    }

    #[test]
    fn display_shows_location() {
        let a = Allocation::new(1, 8, 16);
        assert_eq!(a.to_string(), "Allocation(page=1, off=8, len=16)");
    }
}
