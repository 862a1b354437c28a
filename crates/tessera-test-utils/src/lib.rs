//! Test utilities and mock backends for Tessera development.
//!
//! Provides [`MockAdapter`], a fixed-capacity [`Adapter`] whose advertised
//! [`Features`] are chosen by the test, and a shared [`CallLog`] recording
//! which operations actually reached the backend. Together they let tests
//! check that the [`Arena`] facade gates unsupported operations itself.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tessera_arena::adapter::invalid_handle;
use tessera_arena::{
    Adapter, Allocation, Arena, ArenaConfig, ArenaError, Capabilities, Features, SavePoint,
};

/// Counts of operations forwarded to a [`MockAdapter`].
#[derive(Debug, Default)]
pub struct CallLog {
    push: AtomicUsize,
    reserve: AtomicUsize,
    reset: AtomicUsize,
    save_point: AtomicUsize,
    restore_point: AtomicUsize,
    prefetch: AtomicUsize,
}

impl CallLog {
    fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn pushes(&self) -> usize {
        self.push.load(Ordering::Relaxed)
    }

    pub fn reserves(&self) -> usize {
        self.reserve.load(Ordering::Relaxed)
    }

    pub fn resets(&self) -> usize {
        self.reset.load(Ordering::Relaxed)
    }

    pub fn save_points(&self) -> usize {
        self.save_point.load(Ordering::Relaxed)
    }

    pub fn restore_points(&self) -> usize {
        self.restore_point.load(Ordering::Relaxed)
    }

    pub fn prefetches(&self) -> usize {
        self.prefetch.load(Ordering::Relaxed)
    }
}

/// Fixed-capacity byte-buffer backend with test-chosen capabilities.
///
/// Never grows: a push that does not fit fails with `OutOfMemory`, and a
/// reserve beyond the fixed capacity fails with `ReserveFailed`.
pub struct MockAdapter {
    data: Vec<u8>,
    used: usize,
    features: Features,
    calls: Arc<CallLog>,
}

impl MockAdapter {
    pub const NAME: &'static str = "mock";

    /// Create a mock with `capacity` bytes advertising `features`.
    pub fn new(capacity: usize, features: Features) -> Self {
        Self {
            data: vec![0; capacity],
            used: 0,
            features,
            calls: Arc::new(CallLog::default()),
        }
    }

    /// Shared handle to the call log; keep it before boxing the mock.
    pub fn calls(&self) -> Arc<CallLog> {
        Arc::clone(&self.calls)
    }
}

impl Adapter for MockAdapter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            features: self.features,
            max_allocation_size: self.data.len(),
            alignment_guarantee: 1,
        }
    }

    fn push(&mut self, size: usize) -> Result<Allocation, ArenaError> {
        CallLog::bump(&self.calls.push);
        let end = self
            .used
            .checked_add(size)
            .filter(|&end| end <= self.data.len())
            .ok_or(ArenaError::OutOfMemory { requested: size })?;
        let alloc = Allocation::new(0, self.used, size);
        self.used = end;
        Ok(alloc)
    }

    fn allocated(&self) -> usize {
        self.used
    }

    fn capacity(&self) -> usize {
        self.data.len()
    }

    fn page_count(&self) -> usize {
        1
    }

    fn reserve(&mut self, min_capacity: usize) -> Result<(), ArenaError> {
        CallLog::bump(&self.calls.reserve);
        if min_capacity <= self.data.len() {
            Ok(())
        } else {
            Err(ArenaError::ReserveFailed {
                requested: min_capacity,
                capacity: self.data.len(),
            })
        }
    }

    fn reset(&mut self) -> Result<(), ArenaError> {
        CallLog::bump(&self.calls.reset);
        self.used = 0;
        Ok(())
    }

    fn save_point(&self) -> Result<SavePoint, ArenaError> {
        CallLog::bump(&self.calls.save_point);
        Ok(SavePoint::new(self.used, 0))
    }

    fn restore_point(&mut self, point: SavePoint) -> Result<(), ArenaError> {
        CallLog::bump(&self.calls.restore_point);
        if point.allocated() > self.used {
            return Err(ArenaError::StaleSavePoint);
        }
        self.used = point.allocated();
        Ok(())
    }

    fn prefetch(&self, _alloc: &Allocation) {
        CallLog::bump(&self.calls.prefetch);
    }

    fn bytes(&self, alloc: &Allocation) -> Result<&[u8], ArenaError> {
        match alloc.offset().checked_add(alloc.len()) {
            Some(end) if alloc.page() == 0 && end <= self.used => {
                Ok(&self.data[alloc.offset()..end])
            }
            _ => Err(invalid_handle(alloc)),
        }
    }

    fn bytes_mut(&mut self, alloc: &Allocation) -> Result<&mut [u8], ArenaError> {
        match alloc.offset().checked_add(alloc.len()) {
            Some(end) if alloc.page() == 0 && end <= self.used => {
                Ok(&mut self.data[alloc.offset()..end])
            }
            _ => Err(invalid_handle(alloc)),
        }
    }

    fn dump_stats(&self, out: &mut dyn io::Write, _detail: bool) -> io::Result<()> {
        writeln!(out, "  mock buffer:      {} bytes", self.data.len())
    }
}

/// Build an arena over a [`MockAdapter`], returning its call log.
pub fn mock_arena(capacity: usize, features: Features) -> (Arena, Arc<CallLog>) {
    let mock = MockAdapter::new(capacity, features);
    let calls = mock.calls();
    let arena = Arena::with_adapter(ArenaConfig::new().with_stats(true), Box::new(mock));
    (arena, calls)
}
