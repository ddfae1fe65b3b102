use core::fmt;

use crate::{IndexError, IndexKind, VIF_BROADCAST, VifIndex};

/// An egress decision in its wide (32-bit) form.
///
/// The broadcast sentinel only exists here. Narrow `in_vif`/`out_vif`
/// fields hold a [`VifIndex`], and [`EgressTarget::narrow`] refuses to
/// squeeze `Broadcast` into one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EgressTarget {
    Vif(VifIndex),
    /// Flood to every interface.
    Broadcast,
}

impl EgressTarget {
    /// Decodes a wide value. `0` (unset) and anything outside the VIF range
    /// other than [`VIF_BROADCAST`] is rejected.
    pub const fn from_wide(raw: u32) -> Result<Self, IndexError> {
        if raw == VIF_BROADCAST {
            return Ok(Self::Broadcast);
        }
        if raw > u16::MAX as u32 {
            return Err(IndexError::OutOfRange {
                space: IndexKind::Vif,
                value: raw,
            });
        }
        match VifIndex::new(raw as u16) {
            Ok(vif) => Ok(Self::Vif(vif)),
            Err(e) => Err(e),
        }
    }

    pub const fn to_wide(self) -> u32 {
        match self {
            Self::Vif(vif) => vif.as_u16() as u32,
            Self::Broadcast => VIF_BROADCAST,
        }
    }

    pub const fn is_broadcast(self) -> bool {
        matches!(self, Self::Broadcast)
    }

    /// The single interface this target names.
    pub const fn narrow(self) -> Result<VifIndex, IndexError> {
        match self {
            Self::Vif(vif) => Ok(vif),
            Self::Broadcast => Err(IndexError::NarrowBroadcast),
        }
    }
}

impl From<VifIndex> for EgressTarget {
    fn from(vif: VifIndex) -> Self {
        Self::Vif(vif)
    }
}

impl TryFrom<u32> for EgressTarget {
    type Error = IndexError;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        Self::from_wide(raw)
    }
}

impl fmt::Display for EgressTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vif(vif) => write!(f, "{vif}"),
            Self::Broadcast => write!(f, "broadcast"),
        }
    }
}
