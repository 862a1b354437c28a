//! The backend contract.
//!
//! An [`Adapter`] is one concrete allocation strategy. The
//! [`Arena`](crate::Arena) facade owns exactly one adapter, chosen at
//! creation, and forwards every operation to it. Construction from an
//! [`ArenaConfig`](crate::ArenaConfig) plays the role of `create`; dropping
//! the adapter plays the role of `destroy`.

use std::io;

use crate::allocation::{Allocation, SavePoint};
use crate::capabilities::Capabilities;
use crate::error::ArenaError;

/// Operation set every arena backend implements.
///
/// Adapters are single-owner data structures: no method takes a lock, and
/// concurrent use requires external synchronisation.
pub trait Adapter: Send {
    /// Short backend name used in diagnostics and errors.
    fn name(&self) -> &'static str;

    /// The backend's static capability descriptor.
    fn capabilities(&self) -> Capabilities;

    /// Bump-allocate `size` bytes, growing if necessary.
    ///
    /// `size` is non-zero; the facade handles zero-length requests.
    fn push(&mut self, size: usize) -> Result<Allocation, ArenaError>;

    /// As [`push`](Adapter::push), with the region zero-filled.
    ///
    /// The region is cleared on every call, since memory reused after a
    /// reset still holds stale bytes.
    fn push_zero(&mut self, size: usize) -> Result<Allocation, ArenaError> {
        let alloc = self.push(size)?;
        self.bytes_mut(&alloc)?.fill(0);
        Ok(alloc)
    }

    /// Bytes handed out since creation or the last reset, after alignment
    /// rounding.
    fn allocated(&self) -> usize;

    /// Total bytes of backing storage.
    fn capacity(&self) -> usize;

    /// Number of backing pages (1 for single-buffer backends).
    fn page_count(&self) -> usize;

    /// Ensure `capacity() >= min_capacity`.
    fn reserve(&mut self, min_capacity: usize) -> Result<(), ArenaError>;

    /// Release every allocation logically, keeping all backing storage.
    fn reset(&mut self) -> Result<(), ArenaError>;

    /// Record the current allocation cursor.
    fn save_point(&self) -> Result<SavePoint, ArenaError> {
        Err(ArenaError::UnsupportedOperation {
            operation: "save_point",
            backend: self.name(),
        })
    }

    /// Rewind to a cursor recorded by [`save_point`](Adapter::save_point).
    fn restore_point(&mut self, point: SavePoint) -> Result<(), ArenaError> {
        let _ = point;
        Err(ArenaError::UnsupportedOperation {
            operation: "restore_point",
            backend: self.name(),
        })
    }

    /// Hint that `alloc` is about to be accessed. No-op unless overridden.
    fn prefetch(&self, alloc: &Allocation) {
        let _ = alloc;
    }

    /// Resolve an allocation to its bytes.
    fn bytes(&self, alloc: &Allocation) -> Result<&[u8], ArenaError>;

    /// Resolve an allocation to its bytes, mutably.
    fn bytes_mut(&mut self, alloc: &Allocation) -> Result<&mut [u8], ArenaError>;

    /// Write backend-specific statistics. `detail` requests per-page lines.
    fn dump_stats(&self, out: &mut dyn io::Write, detail: bool) -> io::Result<()>;
}

/// Build the error for a handle that does not resolve.
pub fn invalid_handle(alloc: &Allocation) -> ArenaError {
    ArenaError::InvalidHandle {
        page: alloc.page,
        offset: alloc.offset,
        len: alloc.len,
    }
}
