//! Index Allocation
//!
//! The interface, VRF and bridge managers are the only components allowed to
//! hand out identifiers. They do it through an [`IndexAllocator`] over the
//! matching [`IndexSpace`](dp_abi::IndexSpace), so every identifier that ever
//! reaches a packet record already satisfies the bounds in `dp_abi`.
//!
//! Released indices are not reused immediately: the search for a free slot
//! starts just after the last assignment and wraps around, which keeps a
//! stale reference to a retired index from silently matching its successor
//! for as long as possible.

#![no_std]

extern crate alloc;

mod allocator;
mod error;

pub use allocator::*;
pub use error::*;
