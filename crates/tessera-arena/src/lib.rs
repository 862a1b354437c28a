//! Pluggable paged memory arena.
//!
//! Provides a single [`Arena`] facade that delegates allocation to one of
//! several interchangeable backends ("adapters"), selected at creation time.
//! Allocations are bump-allocated and reclaimed only in bulk, by reset or
//! destroy. This crate is the sole memory source for the data structures
//! built on top of it, which use only the facade's public operations.
//!
//! # Architecture
//!
//! ```text
//! Arena (facade, capability gate, stats)
//! └── Box<dyn Adapter>
//!     ├── ChainedAdapter → Page[] (bump-allocated word buffers, zero-copy growth)
//!     └── ContiguousAdapter → one growable buffer (save/restore points)
//! ```
//!
//! # Handles
//!
//! [`Arena::push`] returns an [`Allocation`]: a page index, offset, and
//! length. Resolve it with [`Arena::bytes`] / [`Arena::bytes_mut`]. A handle
//! is valid until the next reset; after that it may fail to resolve or may
//! observe memory handed out again.
//!
//! # Example
//!
//! ```
//! use tessera_arena::{Arena, ArenaConfig};
//!
//! let mut arena = Arena::create(ArenaConfig::new().with_page_size(64)).unwrap();
//! let a = arena.push(40).unwrap();
//! arena.bytes_mut(&a).unwrap().fill(7);
//! assert_eq!(arena.allocated(), 40);
//!
//! arena.reset().unwrap();
//! assert_eq!(arena.allocated(), 0);
//! assert_eq!(arena.capacity(), 64);
//! arena.destroy();
//! ```
//!
//! # Safety
//!
//! Pages store `u64` words so every allocation is 8-byte aligned. The only
//! `unsafe` code is the byte view in `raw.rs`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod adapter;
pub mod allocation;
pub mod arena;
pub mod capabilities;
pub mod chained;
pub mod config;
pub mod contiguous;
pub mod error;
pub mod page;
mod raw;
pub mod stats;

// Public re-exports for the primary API surface.
pub use adapter::Adapter;
pub use allocation::{Allocation, SavePoint};
pub use arena::Arena;
pub use capabilities::{Capabilities, Features, ALIGNMENT, MAX_ALLOCATION_SIZE};
pub use chained::ChainedAdapter;
pub use config::{AdapterKind, ArenaConfig};
pub use contiguous::ContiguousAdapter;
pub use error::ArenaError;
pub use stats::ArenaStats;
