//! Arena-specific error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur during arena operations.
///
/// Every arena operation reports failure through this type; nothing in the
/// arena panics or aborts on a caller-visible failure. A failed operation
/// leaves the arena in a valid, continuable state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// An [`Allocation`](crate::Allocation) that does not resolve to live
    /// memory in this arena (wrong page, out of range, or released by a
    /// reset).
    InvalidHandle {
        /// Page index encoded in the handle.
        page: usize,
        /// Byte offset encoded in the handle.
        offset: usize,
        /// Length encoded in the handle.
        len: usize,
    },
    /// Backing storage could not be obtained at creation or growth time.
    OutOfMemory {
        /// Number of bytes the failed backing allocation asked for.
        requested: usize,
    },
    /// Growth ran during a push but no page could hold the request.
    ResizeFailed {
        /// Aligned size of the request in bytes.
        requested: usize,
        /// Total capacity after the growth attempt.
        capacity: usize,
    },
    /// Growth ran during a reserve but capacity is still short.
    ReserveFailed {
        /// Minimum capacity asked for.
        requested: usize,
        /// Total capacity after the growth attempt.
        capacity: usize,
    },
    /// The backend does not advertise the capability this operation needs.
    UnsupportedOperation {
        /// The rejected operation.
        operation: &'static str,
        /// Name of the backend that rejected it.
        backend: &'static str,
    },
    /// The request exceeds the backend's maximum allocation size.
    AllocationTooLarge {
        /// Number of bytes requested.
        requested: usize,
        /// Largest allocation the backend accepts.
        max: usize,
    },
    /// `count * size_of::<T>()` does not fit in `usize`.
    ArrayTooLarge {
        /// Number of elements requested.
        count: usize,
        /// Size of one element in bytes.
        element_size: usize,
    },
    /// The arena configuration is invalid.
    InvalidConfig {
        /// Human-readable description of the problem.
        reason: String,
    },
    /// A save point that predates a reset, or lies beyond the current cursor.
    StaleSavePoint,
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidHandle { page, offset, len } => {
                write!(
                    f,
                    "invalid allocation handle: page {page}, offset {offset}, len {len}"
                )
            }
            Self::OutOfMemory { requested } => {
                write!(f, "out of memory: backing allocation of {requested} bytes failed")
            }
            Self::ResizeFailed {
                requested,
                capacity,
            } => {
                write!(
                    f,
                    "arena growth failed: requested {requested} bytes, capacity {capacity} bytes"
                )
            }
            Self::ReserveFailed {
                requested,
                capacity,
            } => {
                write!(
                    f,
                    "arena reserve failed: requested {requested} bytes, capacity {capacity} bytes"
                )
            }
            Self::UnsupportedOperation { operation, backend } => {
                write!(f, "operation '{operation}' is not supported by the {backend} backend")
            }
            Self::AllocationTooLarge { requested, max } => {
                write!(
                    f,
                    "allocation of {requested} bytes exceeds the maximum of {max} bytes"
                )
            }
            Self::ArrayTooLarge {
                count,
                element_size,
            } => {
                write!(
                    f,
                    "array of {count} elements of {element_size} bytes overflows the address space"
                )
            }
            Self::InvalidConfig { reason } => write!(f, "invalid arena config: {reason}"),
            Self::StaleSavePoint => write!(f, "save point is stale"),
        }
    }
}

impl Error for ArenaError {}
