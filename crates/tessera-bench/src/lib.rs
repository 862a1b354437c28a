//! Benchmark workloads for the Tessera arena allocator.
//!
//! Provides deterministic allocation-size streams for benchmarks and
//! stress tests:
//!
//! - [`small_objects`]: many 8–64 byte pushes, the hash-map/set pattern
//! - [`mixed_sizes`]: 16–512 byte pushes with occasional 16 KiB buffers
//!   that overflow a standard page
//! - [`allocation_sizes`]: the underlying seeded size generator

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tessera_arena::{AdapterKind, Arena, ArenaConfig, ArenaError};

/// A named stream of allocation sizes plus the config to run it on.
#[derive(Clone, Debug)]
pub struct Workload {
    /// Short identifier used as a benchmark name.
    pub name: &'static str,
    /// Arena configuration the workload is tuned for.
    pub config: ArenaConfig,
    /// Allocation sizes in push order.
    pub sizes: Vec<usize>,
}

impl Workload {
    /// The same workload on a different backend.
    pub fn on(mut self, adapter: AdapterKind) -> Self {
        self.config.adapter = adapter;
        self
    }

    /// Total bytes requested, before alignment rounding.
    pub fn total_bytes(&self) -> usize {
        self.sizes.iter().sum()
    }

    /// Push every size into `arena`. Returns `allocated()` afterwards.
    pub fn run(&self, arena: &mut Arena) -> Result<usize, ArenaError> {
        for &size in &self.sizes {
            let _ = arena.push(size)?;
        }
        Ok(arena.allocated())
    }

    /// Create a fresh arena from this workload's config.
    pub fn arena(&self) -> Result<Arena, ArenaError> {
        Arena::create(self.config.clone())
    }
}

/// Generate `count` sizes uniformly in `min..=max` from `seed`.
pub fn allocation_sizes(seed: u64, count: usize, min: usize, max: usize) -> Vec<usize> {
    assert!(min <= max, "min ({min}) must not exceed max ({max})");
    let span = (max - min) as u64 + 1;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| min + (rng.next_u64() % span) as usize)
        .collect()
}

/// 10K small pushes on 4 KiB pages.
pub fn small_objects(seed: u64) -> Workload {
    Workload {
        name: "small_objects",
        config: ArenaConfig::new().with_page_size(4096).with_initial_pages(4),
        sizes: allocation_sizes(seed, 10_000, 8, 64),
    }
}

/// 2K mixed pushes; roughly one in a hundred is a 16 KiB buffer larger than
/// the 4 KiB page size.
pub fn mixed_sizes(seed: u64) -> Workload {
    let mut rng = ChaCha8Rng::seed_from_u64(seed ^ 0x9e37_79b9_7f4a_7c15);
    let sizes = allocation_sizes(seed, 2_000, 16, 512)
        .into_iter()
        .map(|size| if rng.next_u32() % 100 == 0 { 16 * 1024 } else { size })
        .collect();
    Workload {
        name: "mixed_sizes",
        config: ArenaConfig::new()
            .with_page_size(4096)
            .with_initial_pages(1)
            .with_growth_pages(4),
        sizes,
    }
}
