use dp_abi::{IndexError, IndexKind};
use thiserror::Error;

/// Index allocation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AllocError {
    #[error("no free {space} index left")]
    Exhausted { space: IndexKind },
    #[error(transparent)]
    OutOfRange(#[from] IndexError),
    #[error("{space} index {value} is already allocated")]
    AlreadyAllocated { space: IndexKind, value: u32 },
    #[error("{space} index {value} is not allocated")]
    NotAllocated { space: IndexKind, value: u32 },
}

/// Result type for allocator operations.
pub type AllocResult<T> = Result<T, AllocError>;
