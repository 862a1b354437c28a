//! Integration test: end-to-end arena lifecycles through the public facade.
//!
//! Walks the documented page-growth scenario on the chained backend, then
//! checks the allocation contract (non-overlap, alignment, accounting,
//! reset reuse, zero-fill, reserve idempotence) on every built-in backend.

use tessera_arena::{AdapterKind, Arena, ArenaConfig, ArenaError, Features};

fn arena(kind: AdapterKind, initial_pages: u32, page_size: usize) -> Arena {
    Arena::create(
        ArenaConfig::new()
            .with_adapter(kind)
            .with_initial_pages(initial_pages)
            .with_page_size(page_size)
            .with_stats(true),
    )
    .unwrap()
}

const BACKENDS: [AdapterKind; 2] = [AdapterKind::Chained, AdapterKind::Contiguous];

// ── Chained growth walkthrough ──────────────────────────────────────

#[test]
fn chained_growth_walkthrough() {
    let mut a = arena(AdapterKind::Chained, 1, 64);

    a.push(40).unwrap();
    assert_eq!(a.allocated(), 40);
    assert_eq!(a.capacity(), 64);

    // 40 > 24 remaining: one more 64-byte page.
    a.push(40).unwrap();
    assert_eq!(a.allocated(), 80);
    assert_eq!(a.capacity(), 128);

    // Larger than a page: one oversized page of exactly 200 bytes.
    a.push(200).unwrap();
    assert_eq!(a.capacity(), 328);
    assert_eq!(a.page_count(), 3);

    a.reset().unwrap();
    assert_eq!(a.allocated(), 0);
    assert_eq!(a.capacity(), 328);

    a.destroy();
}

#[test]
fn chained_reserve_walkthrough() {
    let mut a = arena(AdapterKind::Chained, 2, 64);
    assert_eq!(a.capacity(), 128);

    a.reserve(1000).unwrap();
    assert!(a.capacity() >= 1000);
    let pages = a.page_count();
    let capacity = a.capacity();

    a.reserve(1000).unwrap();
    assert_eq!(a.page_count(), pages);
    assert_eq!(a.capacity(), capacity);
    assert_eq!(a.stats().unwrap().growth_events, 1);
}

// ── Contract on every backend ───────────────────────────────────────

#[test]
fn allocations_do_not_overlap() {
    for kind in BACKENDS {
        let mut a = arena(kind, 1, 64);
        let sizes = [1, 7, 8, 9, 63, 64, 65, 200, 3, 40];
        let allocs: Vec<_> = sizes.iter().map(|&s| a.push(s).unwrap()).collect();
        for (i, alloc) in allocs.iter().enumerate() {
            a.bytes_mut(alloc).unwrap().fill(i as u8 + 1);
        }
        for (i, alloc) in allocs.iter().enumerate() {
            assert!(
                a.bytes(alloc).unwrap().iter().all(|&b| b == i as u8 + 1),
                "{kind:?}: allocation {i} was overwritten"
            );
        }
    }
}

#[test]
fn addresses_meet_alignment_guarantee() {
    for kind in BACKENDS {
        let mut a = arena(kind, 1, 64);
        let align = a.capabilities().alignment_guarantee;
        let allocs: Vec<_> = (1..40).map(|s| a.push(s).unwrap()).collect();
        for alloc in &allocs {
            let addr = a.as_ptr(alloc).unwrap() as usize;
            assert_eq!(addr % align, 0, "{kind:?}: {alloc} misaligned");
        }
    }
}

#[test]
fn allocated_sums_rounded_sizes() {
    for kind in BACKENDS {
        let mut a = arena(kind, 1, 64);
        for size in [1, 8, 13, 100, 64] {
            a.push(size).unwrap();
            assert!(a.capacity() >= a.allocated());
        }
        assert_eq!(a.allocated(), 8 + 8 + 16 + 104 + 64, "{kind:?}");
    }
}

#[test]
fn reset_reuses_capacity() {
    for kind in BACKENDS {
        let mut a = arena(kind, 1, 64);
        for _ in 0..10 {
            a.push(48).unwrap();
        }
        let capacity = a.capacity();
        a.reset().unwrap();
        assert_eq!(a.allocated(), 0);
        assert_eq!(a.capacity(), capacity);
        for _ in 0..10 {
            a.push(48).unwrap();
        }
        assert_eq!(a.capacity(), capacity, "{kind:?} grew after reset");
    }
}

#[test]
fn push_zero_after_reset_reads_zero() {
    for kind in BACKENDS {
        let mut a = arena(kind, 1, 64);
        let dirty = a.push(64).unwrap();
        a.bytes_mut(&dirty).unwrap().fill(0xff);
        a.reset().unwrap();
        let clean = a.push_zero(64).unwrap();
        assert!(a.bytes(&clean).unwrap().iter().all(|&b| b == 0), "{kind:?}");
    }
}

#[test]
fn reserve_is_idempotent() {
    for kind in BACKENDS {
        let mut a = arena(kind, 1, 64);
        a.reserve(4096).unwrap();
        let capacity = a.capacity();
        assert!(capacity >= 4096);
        a.reserve(4096).unwrap();
        assert_eq!(a.capacity(), capacity, "{kind:?}");
    }
}

#[test]
fn failed_push_leaves_arena_usable() {
    for kind in BACKENDS {
        let mut a = arena(kind, 1, 64);
        a.push(16).unwrap();
        assert!(a.push(usize::MAX).is_err());
        assert_eq!(a.allocated(), 16);
        a.push(16).unwrap();
        assert_eq!(a.allocated(), 32);
        assert_eq!(a.stats().unwrap().failed_pushes, 1);
    }
}

#[test]
fn handles_from_before_reset_do_not_resolve_past_cursor() {
    for kind in BACKENDS {
        let mut a = arena(kind, 1, 64);
        let old = a.push(32).unwrap();
        a.reset().unwrap();
        assert!(matches!(
            a.bytes(&old),
            Err(ArenaError::InvalidHandle { .. })
        ));
    }
}

#[test]
fn capability_descriptors_differ_by_backend() {
    let chained = arena(AdapterKind::Chained, 1, 64);
    let contiguous = arena(AdapterKind::Contiguous, 1, 64);
    assert!(chained.capabilities().supports(Features::ZERO_COPY_GROWTH));
    assert!(!chained.capabilities().supports(Features::SAVE_RESTORE));
    assert!(contiguous.capabilities().supports(Features::SAVE_RESTORE));
    assert!(!contiguous.capabilities().supports(Features::ZERO_COPY_GROWTH));
    for a in [&chained, &contiguous] {
        assert!(a.capabilities().supports(Features::RESET | Features::RESERVE));
        assert_eq!(a.capabilities().alignment_guarantee, 8);
    }
}

#[test]
fn create_with_impossible_initial_pages_is_out_of_memory() {
    let config = ArenaConfig::new()
        .with_initial_pages(1)
        .with_page_size(tessera_arena::MAX_ALLOCATION_SIZE);
    let err = Arena::create(config).unwrap_err();
    assert!(matches!(err, ArenaError::OutOfMemory { .. }));
}
