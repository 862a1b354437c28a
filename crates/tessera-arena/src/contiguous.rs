//! Single-buffer backend with save/restore points.
//!
//! [`ContiguousAdapter`] bump-allocates from one growable buffer. Growth
//! reallocates to at least double the current capacity, so existing data
//! moves; handles stay valid because they are offsets, not addresses. In
//! exchange the backend supports rewinding the cursor to a [`SavePoint`].

use std::io;

use crate::adapter::{invalid_handle, Adapter};
use crate::allocation::{Allocation, SavePoint};
use crate::capabilities::{align_up, Capabilities, Features, ALIGNMENT, MAX_ALLOCATION_SIZE};
use crate::config::ArenaConfig;
use crate::error::ArenaError;
use crate::raw;

/// Contiguous arena backend.
pub struct ContiguousAdapter {
    /// Backing storage. Grows on demand, never shrinks.
    data: Vec<u64>,
    /// Bump pointer in bytes.
    used: usize,
    /// Incremented on every reset; invalidates older save points.
    epoch: u64,
    /// Minimum growth step in bytes.
    page_size: usize,
}

impl ContiguousAdapter {
    /// Backend name.
    pub const NAME: &'static str = "contiguous";

    /// Capability descriptor shared by every contiguous adapter.
    pub const CAPABILITIES: Capabilities = Capabilities {
        features: Features::RESET
            .union(Features::RESERVE)
            .union(Features::SAVE_RESTORE),
        max_allocation_size: MAX_ALLOCATION_SIZE,
        alignment_guarantee: ALIGNMENT,
    };

    /// Create a contiguous adapter holding `initial_pages * page_size`
    /// bytes.
    pub fn new(config: &ArenaConfig) -> Result<Self, ArenaError> {
        config.validate()?;
        let initial = config.initial_bytes()?;
        let mut data = crate::page::try_alloc_words(initial)?;
        data.resize(initial / ALIGNMENT, 0);
        let adapter = Self {
            data,
            used: 0,
            epoch: 0,
            page_size: config.effective_page_size(),
        };
        tracing::debug!(capacity = initial, "created contiguous arena");
        Ok(adapter)
    }

    fn capacity_bytes(&self) -> usize {
        self.data.len() * ALIGNMENT
    }

    /// Grow the buffer to hold at least `required` bytes.
    fn grow_to(&mut self, required: usize) -> Result<(), ArenaError> {
        let current = self.capacity_bytes();
        // Double, or fall back to an exact fit when doubling overflows.
        let target = current
            .checked_mul(2)
            .filter(|&doubled| doubled <= MAX_ALLOCATION_SIZE)
            .unwrap_or(required)
            .max(required)
            .max(self.page_size);
        let additional = (target - current) / ALIGNMENT;
        self.data.try_reserve_exact(additional).map_err(|_| {
            tracing::warn!(bytes = target, "backing allocation failed");
            ArenaError::OutOfMemory { requested: target }
        })?;
        self.data.resize(target / ALIGNMENT, 0);
        tracing::debug!(from = current, to = target, "grew contiguous buffer");
        Ok(())
    }
}

impl Adapter for ContiguousAdapter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn capabilities(&self) -> Capabilities {
        Self::CAPABILITIES
    }

    fn push(&mut self, size: usize) -> Result<Allocation, ArenaError> {
        let too_large = ArenaError::AllocationTooLarge {
            requested: size,
            max: MAX_ALLOCATION_SIZE,
        };
        let aligned = align_up(size, ALIGNMENT).ok_or_else(|| too_large.clone())?;
        let end = self
            .used
            .checked_add(aligned)
            .filter(|&end| end <= MAX_ALLOCATION_SIZE)
            .ok_or(too_large)?;
        if end > self.capacity_bytes() {
            self.grow_to(end)?;
        }
        let offset = self.used;
        self.used = end;
        tracing::trace!(size, offset, "push");
        Ok(Allocation::new(0, offset, size))
    }

    fn allocated(&self) -> usize {
        self.used
    }

    fn capacity(&self) -> usize {
        self.capacity_bytes()
    }

    fn page_count(&self) -> usize {
        usize::from(!self.data.is_empty())
    }

    fn reserve(&mut self, min_capacity: usize) -> Result<(), ArenaError> {
        if self.capacity_bytes() >= min_capacity {
            return Ok(());
        }
        let required = align_up(min_capacity, ALIGNMENT)
            .filter(|&bytes| bytes <= MAX_ALLOCATION_SIZE)
            .ok_or(ArenaError::ReserveFailed {
                requested: min_capacity,
                capacity: self.capacity_bytes(),
            })?;
        self.grow_to(required)
    }

    fn reset(&mut self) -> Result<(), ArenaError> {
        self.used = 0;
        self.epoch += 1;
        Ok(())
    }

    fn save_point(&self) -> Result<SavePoint, ArenaError> {
        Ok(SavePoint::new(self.used, self.epoch))
    }

    fn restore_point(&mut self, point: SavePoint) -> Result<(), ArenaError> {
        if point.epoch != self.epoch || point.allocated > self.used {
            return Err(ArenaError::StaleSavePoint);
        }
        self.used = point.allocated;
        Ok(())
    }

    fn bytes(&self, alloc: &Allocation) -> Result<&[u8], ArenaError> {
        match alloc.offset.checked_add(alloc.len) {
            Some(end) if alloc.page == 0 && end <= self.used => {
                Ok(&raw::as_bytes(&self.data)[alloc.offset..end])
            }
            _ => Err(invalid_handle(alloc)),
        }
    }

    fn bytes_mut(&mut self, alloc: &Allocation) -> Result<&mut [u8], ArenaError> {
        match alloc.offset.checked_add(alloc.len) {
            Some(end) if alloc.page == 0 && end <= self.used => {
                Ok(&mut raw::as_bytes_mut(&mut self.data)[alloc.offset..end])
            }
            _ => Err(invalid_handle(alloc)),
        }
    }

    fn dump_stats(&self, out: &mut dyn io::Write, detail: bool) -> io::Result<()> {
        writeln!(out, "  min growth:       {} bytes", self.page_size)?;
        writeln!(out, "  reset epoch:      {}", self.epoch)?;
        if detail {
            writeln!(
                out,
                "    buffer: {}/{} bytes ({:.1}%)",
                self.used,
                self.capacity_bytes(),
                crate::stats::percent(self.used, self.capacity_bytes()),
            )?;
        }
        Ok(())
    }
}
