//! The arena facade.
//!
//! [`Arena`] is the only type consumers interact with. It owns exactly one
//! [`Adapter`], chosen by [`ArenaConfig::adapter`] at creation, and forwards
//! every operation to it. Capability checks for optional operations live
//! here rather than in each backend, and so do the utilisation counters.
//!
//! The lifecycle is:
//! 1. `Arena::create(config)` — construct the backend and initial pages
//! 2. `push` / `push_zero` / `reserve` — bump-allocate, growing as needed
//! 3. `reset()` — release every allocation logically, keep the memory
//! 4. `destroy()` (or drop) — release all backing memory

use std::fmt;
use std::io;
use std::mem;

use crate::adapter::Adapter;
use crate::allocation::{Allocation, SavePoint};
use crate::capabilities::{Capabilities, Features};
use crate::chained::ChainedAdapter;
use crate::config::{AdapterKind, ArenaConfig};
use crate::contiguous::ContiguousAdapter;
use crate::error::ArenaError;
use crate::stats::{percent, ArenaStats};

/// A memory arena backed by a pluggable allocation strategy.
///
/// Allocations are never freed individually; [`reset`](Arena::reset)
/// reclaims them all at once and [`destroy`](Arena::destroy) releases the
/// backing memory. The arena performs no locking: concurrent use needs
/// external synchronisation (e.g. a `Mutex<Arena>` held by the caller).
pub struct Arena {
    /// The backend every operation is forwarded to.
    adapter: Box<dyn Adapter>,
    /// Configuration the arena was created with.
    config: ArenaConfig,
    /// Counters, present only when `enable_stats` is set.
    stats: Option<ArenaStats>,
}

impl Arena {
    /// Create an arena with the backend named by `config.adapter`.
    ///
    /// Returns `Err(ArenaError::OutOfMemory)` if the initial pages cannot be
    /// allocated, or `Err(ArenaError::InvalidConfig)` for an unusable config.
    pub fn create(config: ArenaConfig) -> Result<Self, ArenaError> {
        let adapter: Box<dyn Adapter> = match config.adapter {
            AdapterKind::Chained => Box::new(ChainedAdapter::new(&config)?),
            AdapterKind::Contiguous => Box::new(ContiguousAdapter::new(&config)?),
        };
        Ok(Self::with_adapter(config, adapter))
    }

    /// Wrap an already constructed backend.
    ///
    /// `config.adapter` is ignored; the stats and debug toggles apply.
    pub fn with_adapter(config: ArenaConfig, adapter: Box<dyn Adapter>) -> Self {
        tracing::debug!(
            backend = adapter.name(),
            capacity = adapter.capacity(),
            stats = config.enable_stats,
            "arena created"
        );
        let stats = config.enable_stats.then(ArenaStats::default);
        Self {
            adapter,
            config,
            stats,
        }
    }

    /// Allocate `size` bytes.
    ///
    /// The region is exclusively the caller's until the next reset. A
    /// zero-length request returns an empty allocation without consuming
    /// space.
    pub fn push(&mut self, size: usize) -> Result<Allocation, ArenaError> {
        self.push_inner(size, false)
    }

    /// Allocate `size` bytes, zero-filled.
    pub fn push_zero(&mut self, size: usize) -> Result<Allocation, ArenaError> {
        self.push_inner(size, true)
    }

    /// Allocate room for one `T`.
    pub fn push_value<T>(&mut self) -> Result<Allocation, ArenaError> {
        self.push(mem::size_of::<T>())
    }

    /// Allocate room for `count` values of `T`.
    pub fn push_array<T>(&mut self, count: usize) -> Result<Allocation, ArenaError> {
        let size = array_size::<T>(count)?;
        self.push(size)
    }

    /// Allocate room for `count` values of `T`, zero-filled.
    pub fn push_array_zeroed<T>(&mut self, count: usize) -> Result<Allocation, ArenaError> {
        let size = array_size::<T>(count)?;
        self.push_zero(size)
    }

    fn push_inner(&mut self, size: usize, zeroed: bool) -> Result<Allocation, ArenaError> {
        if size == 0 {
            return Ok(Allocation::empty());
        }
        let before = self.adapter.capacity();
        let result = if zeroed {
            self.adapter.push_zero(size)
        } else {
            self.adapter.push(size)
        };
        if let Some(stats) = &mut self.stats {
            match &result {
                Ok(_) => stats.record_push(size, zeroed, self.adapter.allocated()),
                Err(_) => stats.failed_pushes += 1,
            }
            stats.record_capacity(before, self.adapter.capacity());
        }
        if let Err(err) = &result {
            tracing::warn!(size, backend = self.adapter.name(), error = %err, "push failed");
        }
        result
    }

    /// Bytes handed out since creation or the last reset (alignment-rounded).
    pub fn allocated(&self) -> usize {
        self.adapter.allocated()
    }

    /// Total bytes of backing storage.
    pub fn capacity(&self) -> usize {
        self.adapter.capacity()
    }

    /// Number of backing pages.
    pub fn page_count(&self) -> usize {
        self.adapter.page_count()
    }

    /// Ensure `capacity() >= min_capacity`, growing only if necessary.
    ///
    /// Calling this again with the same value is a no-op. On failure, pages
    /// added before the failure are kept.
    pub fn reserve(&mut self, min_capacity: usize) -> Result<(), ArenaError> {
        self.require(Features::RESERVE, "reserve")?;
        let before = self.adapter.capacity();
        let result = self.adapter.reserve(min_capacity);
        if let Some(stats) = &mut self.stats {
            stats.reserves += 1;
            stats.record_capacity(before, self.adapter.capacity());
        }
        result
    }

    /// Release every allocation logically without returning memory.
    ///
    /// Capacity is unchanged; later pushes reuse the existing pages.
    pub fn reset(&mut self) -> Result<(), ArenaError> {
        self.require(Features::RESET, "reset")?;
        self.adapter.reset()?;
        if let Some(stats) = &mut self.stats {
            stats.resets += 1;
        }
        tracing::debug!(
            backend = self.adapter.name(),
            capacity = self.adapter.capacity(),
            "arena reset"
        );
        Ok(())
    }

    /// Release all backing memory. Every handle from this arena becomes
    /// meaningless.
    pub fn destroy(self) {
        tracing::debug!(
            backend = self.adapter.name(),
            pages = self.adapter.page_count(),
            capacity = self.adapter.capacity(),
            "arena destroyed"
        );
    }

    /// The backend's capability descriptor.
    pub fn capabilities(&self) -> Capabilities {
        self.adapter.capabilities()
    }

    /// Name of the backend in use.
    pub fn backend_name(&self) -> &'static str {
        self.adapter.name()
    }

    /// Record the allocation cursor.
    pub fn save_point(&self) -> Result<SavePoint, ArenaError> {
        self.require(Features::SAVE_RESTORE, "save_point")?;
        self.adapter.save_point()
    }

    /// Rewind to `point`, releasing everything allocated after it.
    pub fn restore_point(&mut self, point: SavePoint) -> Result<(), ArenaError> {
        self.require(Features::SAVE_RESTORE, "restore_point")?;
        self.adapter.restore_point(point)
    }

    /// Hint that `alloc` is about to be accessed.
    pub fn prefetch(&self, alloc: &Allocation) {
        if !alloc.is_empty() {
            self.adapter.prefetch(alloc);
        }
    }

    /// The bytes of `alloc`.
    pub fn bytes(&self, alloc: &Allocation) -> Result<&[u8], ArenaError> {
        if alloc.is_empty() {
            return Ok(&[]);
        }
        self.adapter.bytes(alloc)
    }

    /// The bytes of `alloc`, mutably.
    pub fn bytes_mut(&mut self, alloc: &Allocation) -> Result<&mut [u8], ArenaError> {
        if alloc.is_empty() {
            return Ok(&mut []);
        }
        self.adapter.bytes_mut(alloc)
    }

    /// Address of the first byte of `alloc`.
    ///
    /// The address may change when a backend without zero-copy growth
    /// grows; re-resolve after any push on such backends.
    pub fn as_ptr(&self, alloc: &Allocation) -> Result<*const u8, ArenaError> {
        self.bytes(alloc).map(<[u8]>::as_ptr)
    }

    /// Configuration the arena was created with.
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Utilisation counters, if enabled.
    pub fn stats(&self) -> Option<&ArenaStats> {
        self.stats.as_ref()
    }

    /// Write human-readable utilisation statistics to `out`.
    ///
    /// Per-page lines are included when `enable_debug` is set.
    pub fn dump_stats<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        let allocated = self.adapter.allocated();
        let capacity = self.adapter.capacity();
        writeln!(
            out,
            "arena stats ({} backend, features: {})",
            self.adapter.name(),
            self.adapter.capabilities().features,
        )?;
        writeln!(out, "  allocated:        {allocated} bytes")?;
        writeln!(out, "  capacity:         {capacity} bytes")?;
        writeln!(
            out,
            "  utilization:      {:.1}%",
            percent(allocated, capacity)
        )?;
        self.adapter.dump_stats(&mut *out, self.config.enable_debug)?;
        if let Some(stats) = &self.stats {
            stats.write_to(&mut *out)?;
        }
        Ok(())
    }

    fn require(&self, feature: Features, operation: &'static str) -> Result<(), ArenaError> {
        if self.adapter.capabilities().supports(feature) {
            Ok(())
        } else {
            Err(ArenaError::UnsupportedOperation {
                operation,
                backend: self.adapter.name(),
            })
        }
    }
}

impl fmt::Debug for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("backend", &self.adapter.name())
            .field("allocated", &self.adapter.allocated())
            .field("capacity", &self.adapter.capacity())
            .field("pages", &self.adapter.page_count())
            .finish()
    }
}

fn array_size<T>(count: usize) -> Result<usize, ArenaError> {
    let element_size = mem::size_of::<T>();
    element_size
        .checked_mul(count)
        .ok_or(ArenaError::ArrayTooLarge {
            count,
            element_size,
        })
}
