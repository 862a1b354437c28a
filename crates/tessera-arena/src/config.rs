//! Arena configuration parameters.

use crate::capabilities::{align_up, ALIGNMENT, MAX_ALLOCATION_SIZE};
use crate::error::ArenaError;

/// Which allocation backend an [`Arena`](crate::Arena) is built on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AdapterKind {
    /// Singly linked chain of pages with zero-copy growth.
    #[default]
    Chained,
    /// One growable contiguous buffer with save/restore points.
    Contiguous,
}

/// Configuration for the arena allocator.
///
/// Consumed once by [`Arena::create`](crate::Arena::create); the arena keeps
/// its own copy and never mutates it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Backend to construct.
    pub adapter: AdapterKind,

    /// Number of pages pre-allocated at creation.
    ///
    /// For the contiguous backend this reserves
    /// `initial_pages * page_size` bytes up front.
    pub initial_pages: u32,

    /// Size of each standard page in bytes. `0` selects
    /// [`ArenaConfig::DEFAULT_PAGE_SIZE`]. Non-zero values are rounded up
    /// to the alignment guarantee.
    pub page_size: usize,

    /// Minimum number of pages appended per growth event. `0` behaves as 1.
    pub growth_pages: u32,

    /// Collect utilisation counters (see [`ArenaStats`](crate::ArenaStats)).
    pub enable_stats: bool,

    /// Include per-page detail in `dump_stats` output.
    pub enable_debug: bool,
}

impl ArenaConfig {
    /// Default page size: 4 KiB.
    pub const DEFAULT_PAGE_SIZE: usize = 4096;

    /// Default number of pages allocated at creation.
    pub const DEFAULT_INITIAL_PAGES: u32 = 1;

    /// Default number of pages appended per growth event.
    pub const DEFAULT_GROWTH_PAGES: u32 = 1;

    /// Create a chained-backend config with default values.
    pub fn new() -> Self {
        Self {
            adapter: AdapterKind::Chained,
            initial_pages: Self::DEFAULT_INITIAL_PAGES,
            page_size: 0,
            growth_pages: Self::DEFAULT_GROWTH_PAGES,
            enable_stats: false,
            enable_debug: false,
        }
    }

    /// Select the backend.
    pub fn with_adapter(mut self, adapter: AdapterKind) -> Self {
        self.adapter = adapter;
        self
    }

    /// Set the number of pages allocated at creation.
    pub fn with_initial_pages(mut self, pages: u32) -> Self {
        self.initial_pages = pages;
        self
    }

    /// Set the standard page size in bytes.
    pub fn with_page_size(mut self, bytes: usize) -> Self {
        self.page_size = bytes;
        self
    }

    /// Set the minimum pages appended per growth event.
    pub fn with_growth_pages(mut self, pages: u32) -> Self {
        self.growth_pages = pages;
        self
    }

    /// Enable or disable utilisation counters.
    pub fn with_stats(mut self, enabled: bool) -> Self {
        self.enable_stats = enabled;
        self
    }

    /// Enable or disable per-page detail in stats dumps.
    pub fn with_debug(mut self, enabled: bool) -> Self {
        self.enable_debug = enabled;
        self
    }

    /// Check that the configuration can be realised by a backend.
    pub fn validate(&self) -> Result<(), ArenaError> {
        if self.page_size > MAX_ALLOCATION_SIZE {
            return Err(ArenaError::InvalidConfig {
                reason: format!(
                    "page_size must be <= {MAX_ALLOCATION_SIZE} (got {})",
                    self.page_size,
                ),
            });
        }
        self.initial_bytes()?;
        Ok(())
    }

    /// The page size backends actually use, in bytes.
    ///
    /// Only meaningful on a validated config.
    pub fn effective_page_size(&self) -> usize {
        if self.page_size == 0 {
            Self::DEFAULT_PAGE_SIZE
        } else {
            align_up(self.page_size, ALIGNMENT).unwrap_or(MAX_ALLOCATION_SIZE)
        }
    }

    /// Pages appended per growth event, never less than one.
    pub fn effective_growth_pages(&self) -> u32 {
        self.growth_pages.max(1)
    }

    /// Bytes pre-allocated at creation (`initial_pages * page_size`).
    pub fn initial_bytes(&self) -> Result<usize, ArenaError> {
        (self.initial_pages as usize)
            .checked_mul(self.effective_page_size())
            .filter(|&bytes| bytes <= MAX_ALLOCATION_SIZE)
            .ok_or_else(|| ArenaError::InvalidConfig {
                reason: format!(
                    "initial_pages * page_size overflows ({} * {})",
                    self.initial_pages,
                    self.effective_page_size(),
                ),
            })
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_page_size_selects_default() {
        let config = ArenaConfig::new().with_page_size(0);
        assert_eq!(config.effective_page_size(), ArenaConfig::DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn page_size_rounds_up_to_alignment() {
        let config = ArenaConfig::new().with_page_size(61);
        assert_eq!(config.effective_page_size(), 64);
    }

    #[test]
    fn zero_growth_pages_behaves_as_one() {
        let config = ArenaConfig::new().with_growth_pages(0);
        assert_eq!(config.effective_growth_pages(), 1);
    }

    #[test]
    fn default_is_chained_with_one_page() {
        let config = ArenaConfig::default();
        assert_eq!(config.adapter, AdapterKind::Chained);
        assert_eq!(config.initial_pages, 1);
        assert!(!config.enable_stats);
        assert!(!config.enable_debug);
        config.validate().unwrap();
    }

    #[test]
    fn oversized_page_size_is_rejected() {
        let config = ArenaConfig::new().with_page_size(usize::MAX);
        assert!(matches!(
            config.validate(),
            Err(ArenaError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn overflowing_initial_bytes_is_rejected() {
        let config = ArenaConfig::new()
            .with_page_size(MAX_ALLOCATION_SIZE)
            .with_initial_pages(4);
        assert!(matches!(
            config.validate(),
            Err(ArenaError::InvalidConfig { .. })
        ));
    }
}
