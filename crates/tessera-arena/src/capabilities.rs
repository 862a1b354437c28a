//! Static capability descriptors.
//!
//! Each backend declares up front what it supports. Callers that need an
//! optional operation check [`Capabilities::supports`] first; the
//! [`Arena`](crate::Arena) facade enforces the same check centrally and
//! reports [`ArenaError::UnsupportedOperation`](crate::ArenaError) instead of
//! forwarding the call.

use std::fmt;
use std::ops::BitOr;

/// Alignment guarantee of every built-in backend, in bytes.
pub const ALIGNMENT: usize = std::mem::align_of::<u64>();

/// Largest single allocation any built-in backend accepts, in bytes.
pub const MAX_ALLOCATION_SIZE: usize = (isize::MAX as usize) & !(ALIGNMENT - 1);

/// Round `size` up to the next multiple of `align` (a power of two).
///
/// Returns `None` on overflow.
pub fn align_up(size: usize, align: usize) -> Option<usize> {
    debug_assert!(align.is_power_of_two());
    Some(size.checked_add(align - 1)? & !(align - 1))
}

/// Bit set of optional backend features.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Features(u8);

impl Features {
    /// Growth never moves existing allocations.
    pub const ZERO_COPY_GROWTH: Self = Self(1 << 0);
    /// `reset` is supported.
    pub const RESET: Self = Self(1 << 1);
    /// `reserve` is supported.
    pub const RESERVE: Self = Self(1 << 2);
    /// `save_point` / `restore_point` are supported.
    pub const SAVE_RESTORE: Self = Self(1 << 3);

    const NAMES: [(Self, &'static str); 4] = [
        (Self::ZERO_COPY_GROWTH, "zero-copy-growth"),
        (Self::RESET, "reset"),
        (Self::RESERVE, "reserve"),
        (Self::SAVE_RESTORE, "save-restore"),
    ];

    /// No features.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Every feature.
    pub const fn all() -> Self {
        Self(0b1111)
    }

    /// Whether every feature in `other` is present in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Union of two feature sets.
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Whether no feature is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Features {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl fmt::Display for Features {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let mut first = true;
        for (flag, name) in Self::NAMES {
            if self.contains(flag) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// What a backend supports. Constant for the lifetime of a backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capabilities {
    /// Optional operations and growth behaviour.
    pub features: Features,
    /// Largest single allocation in bytes.
    pub max_allocation_size: usize,
    /// Every allocation address is a multiple of this many bytes.
    pub alignment_guarantee: usize,
}

impl Capabilities {
    /// Whether every feature in `features` is supported.
    pub fn supports(&self, features: Features) -> bool {
        self.features.contains(features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_requires_every_bit() {
        let set = Features::RESET | Features::RESERVE;
        assert!(set.contains(Features::RESET));
        assert!(set.contains(Features::RESET | Features::RESERVE));
        assert!(!set.contains(Features::RESET | Features::SAVE_RESTORE));
        assert!(set.contains(Features::empty()));
    }

    #[test]
    fn all_contains_each_flag() {
        for (flag, _) in Features::NAMES {
            assert!(Features::all().contains(flag));
        }
    }

    #[test]
    fn display_lists_flags() {
        assert_eq!(Features::empty().to_string(), "none");
        assert_eq!(
            (Features::RESET | Features::SAVE_RESTORE).to_string(),
            "reset|save-restore"
        );
    }

    #[test]
    fn align_up_rounds_to_multiple() {
        assert_eq!(align_up(0, 8), Some(0));
        assert_eq!(align_up(1, 8), Some(8));
        assert_eq!(align_up(8, 8), Some(8));
        assert_eq!(align_up(41, 8), Some(48));
        assert_eq!(align_up(usize::MAX, 8), None);
    }

    #[test]
    fn max_allocation_is_aligned() {
        assert_eq!(MAX_ALLOCATION_SIZE % ALIGNMENT, 0);
    }
}
