//! Chained-page backend.
//!
//! [`ChainedAdapter`] keeps an insertion-ordered list of [`Page`]s and
//! bump-allocates within them. When no page has room, it appends pages:
//! either one oversized page sized exactly to a request larger than the
//! standard page size, or `max(ceil(request / page_size), growth_pages)`
//! standard pages. Existing pages never move, so growth is zero-copy.
//!
//! ```text
//! ChainedAdapter
//! ├── pages: [Page 0] → [Page 1] → [Page 2 (oversized)] → ...
//! ├── current ──────────────┘ (search starts here, wraps to head)
//! └── total_allocated / total_capacity (maintained, never re-summed)
//! ```

use std::io;

use smallvec::SmallVec;

use crate::adapter::{invalid_handle, Adapter};
use crate::allocation::Allocation;
use crate::capabilities::{align_up, Capabilities, Features, ALIGNMENT, MAX_ALLOCATION_SIZE};
use crate::config::ArenaConfig;
use crate::error::ArenaError;
use crate::page::Page;

/// Page lists rarely exceed this many entries before spilling to the heap.
const INLINE_PAGES: usize = 8;

/// Linked-page arena backend.
pub struct ChainedAdapter {
    /// Every page ever appended, in insertion order.
    pages: SmallVec<[Page; INLINE_PAGES]>,
    /// Page most recently allocated from. A search hint only.
    current: usize,
    /// Sum of `used` over all pages.
    total_allocated: usize,
    /// Sum of `size` over all pages.
    total_capacity: usize,
    /// Standard page size in bytes.
    page_size: usize,
    /// Minimum pages appended per growth event.
    growth_pages: u32,
}

impl ChainedAdapter {
    /// Backend name.
    pub const NAME: &'static str = "chained";

    /// Capability descriptor shared by every chained adapter.
    pub const CAPABILITIES: Capabilities = Capabilities {
        features: Features::ZERO_COPY_GROWTH
            .union(Features::RESET)
            .union(Features::RESERVE),
        max_allocation_size: MAX_ALLOCATION_SIZE,
        alignment_guarantee: ALIGNMENT,
    };

    /// Create a chained adapter with `config.initial_pages` standard pages.
    ///
    /// Returns `Err(ArenaError::OutOfMemory)` if any initial page cannot be
    /// allocated, or `Err(ArenaError::InvalidConfig)` for an unusable config.
    pub fn new(config: &ArenaConfig) -> Result<Self, ArenaError> {
        config.validate()?;
        let mut adapter = Self {
            pages: SmallVec::new(),
            current: 0,
            total_allocated: 0,
            total_capacity: 0,
            page_size: config.effective_page_size(),
            growth_pages: config.effective_growth_pages(),
        };
        for _ in 0..config.initial_pages {
            adapter.append_page(adapter.page_size)?;
        }
        tracing::debug!(
            initial_pages = config.initial_pages,
            page_size = adapter.page_size,
            growth_pages = adapter.growth_pages,
            "created chained arena"
        );
        Ok(adapter)
    }

    /// Standard page size in bytes.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Minimum pages appended per growth event.
    pub fn growth_pages(&self) -> u32 {
        self.growth_pages
    }

    /// Index of the page the next search starts from.
    pub fn current_page(&self) -> usize {
        self.current
    }

    /// `(used, size)` of every page, in list order.
    pub fn page_usage(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.pages.iter().map(|p| (p.used(), p.size()))
    }

    fn append_page(&mut self, size: usize) -> Result<(), ArenaError> {
        let page = Page::new(size)?;
        self.total_capacity += size;
        self.pages.push(page);
        Ok(())
    }

    /// Append enough pages for a request of `request` aligned bytes.
    ///
    /// Pages appended before a failure are kept.
    fn grow(&mut self, request: usize) -> Result<(), ArenaError> {
        if request > self.page_size {
            self.append_page(request)?;
            tracing::debug!(
                size = request,
                capacity = self.total_capacity,
                "appended oversized page"
            );
            return Ok(());
        }
        let needed = request
            .div_ceil(self.page_size)
            .max(self.growth_pages as usize);
        for _ in 0..needed {
            self.append_page(self.page_size)?;
        }
        tracing::debug!(
            pages = needed,
            page_size = self.page_size,
            capacity = self.total_capacity,
            "appended standard pages"
        );
        Ok(())
    }

    /// First page with room for `len`, searching from the cursor to the
    /// tail, then from the head up to the cursor.
    fn find_page(&self, len: usize) -> Option<usize> {
        let count = self.pages.len();
        let start = self.current.min(count);
        (start..count)
            .chain(0..start)
            .find(|&i| self.pages[i].fits(len))
    }

    fn aligned(size: usize) -> Result<usize, ArenaError> {
        align_up(size, ALIGNMENT)
            .filter(|&aligned| aligned <= MAX_ALLOCATION_SIZE)
            .ok_or(ArenaError::AllocationTooLarge {
                requested: size,
                max: MAX_ALLOCATION_SIZE,
            })
    }
}

impl Adapter for ChainedAdapter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn capabilities(&self) -> Capabilities {
        Self::CAPABILITIES
    }

    fn push(&mut self, size: usize) -> Result<Allocation, ArenaError> {
        let aligned = Self::aligned(size)?;

        let index = match self.find_page(aligned) {
            Some(index) => index,
            None => {
                // A partially failed growth may still have appended a page
                // that fits, so search again before reporting the failure.
                let grown = self.grow(aligned);
                match self.find_page(aligned) {
                    Some(index) => index,
                    None => {
                        return Err(grown.err().unwrap_or(ArenaError::ResizeFailed {
                            requested: aligned,
                            capacity: self.total_capacity,
                        }))
                    }
                }
            }
        };

        let offset = self.pages[index]
            .try_bump(aligned)
            .ok_or(ArenaError::ResizeFailed {
                requested: aligned,
                capacity: self.total_capacity,
            })?;
        self.current = index;
        self.total_allocated += aligned;
        tracing::trace!(size, page = index, offset, "push");
        Ok(Allocation::new(index, offset, size))
    }

    fn allocated(&self) -> usize {
        self.total_allocated
    }

    fn capacity(&self) -> usize {
        self.total_capacity
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn reserve(&mut self, min_capacity: usize) -> Result<(), ArenaError> {
        if self.total_capacity >= min_capacity {
            return Ok(());
        }
        let shortfall = Self::aligned(min_capacity - self.total_capacity).map_err(|_| {
            ArenaError::ReserveFailed {
                requested: min_capacity,
                capacity: self.total_capacity,
            }
        })?;
        self.grow(shortfall)?;
        if self.total_capacity < min_capacity {
            return Err(ArenaError::ReserveFailed {
                requested: min_capacity,
                capacity: self.total_capacity,
            });
        }
        tracing::debug!(
            min_capacity,
            capacity = self.total_capacity,
            "reserved capacity"
        );
        Ok(())
    }

    fn reset(&mut self) -> Result<(), ArenaError> {
        for page in &mut self.pages {
            page.reset();
        }
        self.current = 0;
        self.total_allocated = 0;
        Ok(())
    }

    fn bytes(&self, alloc: &Allocation) -> Result<&[u8], ArenaError> {
        self.pages
            .get(alloc.page)
            .and_then(|p| p.bytes(alloc.offset, alloc.len))
            .ok_or_else(|| invalid_handle(alloc))
    }

    fn bytes_mut(&mut self, alloc: &Allocation) -> Result<&mut [u8], ArenaError> {
        self.pages
            .get_mut(alloc.page)
            .and_then(|p| p.bytes_mut(alloc.offset, alloc.len))
            .ok_or_else(|| invalid_handle(alloc))
    }

    fn dump_stats(&self, out: &mut dyn io::Write, detail: bool) -> io::Result<()> {
        writeln!(out, "  page size:        {} bytes", self.page_size)?;
        writeln!(out, "  growth increment: {} page(s)", self.growth_pages)?;
        writeln!(out, "  pages:            {}", self.pages.len())?;
        if detail {
            for (i, page) in self.pages.iter().enumerate() {
                let marker = if i == self.current { " *" } else { "" };
                writeln!(
                    out,
                    "    page {i}: {}/{} bytes ({:.1}%){marker}",
                    page.used(),
                    page.size(),
                    page.utilization(),
                )?;
            }
        }
        Ok(())
    }
}
