use thiserror::Error;

use crate::IndexKind;

/// Raised by the checked index constructors.
///
/// Consumers that hit this on a value read from a packet record must drop
/// the packet or divert it to an error path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IndexError {
    #[error("{space} index {value} is outside {}..={}", .space.min(), .space.max())]
    OutOfRange { space: IndexKind, value: u32 },
    #[error("broadcast target does not fit a 16-bit vif field")]
    NarrowBroadcast,
}
