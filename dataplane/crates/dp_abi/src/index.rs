use core::fmt;

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::IndexError;

pub const VIF_INVALID_INDEX: u16 = 0;
/// Valid VIF indices are `1..=VIF_MAX_INDEX`.
pub const VIF_MAX_INDEX: u16 = 4095;
/// Wide egress value meaning "all interfaces". Never fits a 16-bit VIF field.
pub const VIF_BROADCAST: u32 = 0xffff_fffc;

/// Maximum number of live VRF entries.
pub const VRF_MAX_ENTRY: usize = 256;

pub const BRIDGE_INVALID_ID: u16 = 0;
/// Valid bridge IDs are `1..=BRIDGE_MAX_ID`.
pub const BRIDGE_MAX_ID: u16 = 1023;

/// Returns true iff `v` is a usable VIF index (`1..=4095`).
#[inline]
pub const fn is_valid_vif(v: u32) -> bool {
    v >= 1 && v <= VIF_MAX_INDEX as u32
}

/// Returns true iff `v` is below [`VRF_MAX_ENTRY`].
///
/// Whether VRF 0 is usable is decided by the VRF table, not here.
#[inline]
pub const fn is_valid_vrf(v: u32) -> bool {
    v < VRF_MAX_ENTRY as u32
}

/// Returns true iff `b` is a usable bridge ID (`1..=1023`).
#[inline]
pub const fn is_valid_bridge(b: u32) -> bool {
    b >= 1 && b <= BRIDGE_MAX_ID as u32
}

/// Names one of the three bounded index spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexKind {
    Vif,
    Vrf,
    Bridge,
}

impl IndexKind {
    /// Smallest valid raw value.
    pub const fn min(self) -> u32 {
        match self {
            Self::Vif => 1,
            Self::Vrf => 0,
            Self::Bridge => 1,
        }
    }

    /// Largest valid raw value.
    pub const fn max(self) -> u32 {
        match self {
            Self::Vif => VIF_MAX_INDEX as u32,
            Self::Vrf => VRF_MAX_ENTRY as u32 - 1,
            Self::Bridge => BRIDGE_MAX_ID as u32,
        }
    }

    pub const fn contains(self, raw: u32) -> bool {
        match self {
            Self::Vif => is_valid_vif(raw),
            Self::Vrf => is_valid_vrf(raw),
            Self::Bridge => is_valid_bridge(raw),
        }
    }

    const fn check(self, raw: u32) -> Result<u16, IndexError> {
        if self.contains(raw) {
            Ok(raw as u16)
        } else {
            Err(IndexError::OutOfRange {
                space: self,
                value: raw,
            })
        }
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vif => write!(f, "vif"),
            Self::Vrf => write!(f, "vrf"),
            Self::Bridge => write!(f, "bridge"),
        }
    }
}

mod sealed {
    pub trait Sealed {}
}

/// A bounded index space with a typed index.
///
/// Sealed: the only spaces are [`Vif`], [`Vrf`] and [`Bridge`]. Generic code
/// such as the allocators in `dp_index` is written against this trait so that
/// every space goes through the same bounds.
pub trait IndexSpace: sealed::Sealed + 'static {
    /// Typed index handed out for this space.
    type Index: Copy + Eq + fmt::Debug + fmt::Display;

    const KIND: IndexKind;
    const MIN: u32 = Self::KIND.min();
    const MAX: u32 = Self::KIND.max();

    /// Wraps a raw value without checking it.
    fn from_raw(raw: u16) -> Self::Index;

    fn to_raw(index: Self::Index) -> u16;

    #[inline]
    fn is_valid(raw: u32) -> bool {
        Self::KIND.contains(raw)
    }

    /// Number of valid indices in the space.
    #[inline]
    fn capacity() -> usize {
        (Self::MAX - Self::MIN + 1) as usize
    }

    #[inline]
    fn checked(raw: u32) -> Result<Self::Index, IndexError> {
        Self::KIND.check(raw).map(Self::from_raw)
    }
}

/// VIF index space marker.
pub struct Vif;
/// VRF index space marker.
pub struct Vrf;
/// Bridge ID space marker.
pub struct Bridge;

impl sealed::Sealed for Vif {}
impl sealed::Sealed for Vrf {}
impl sealed::Sealed for Bridge {}

impl IndexSpace for Vif {
    type Index = VifIndex;
    const KIND: IndexKind = IndexKind::Vif;

    fn from_raw(raw: u16) -> VifIndex {
        VifIndex::from_raw(raw)
    }

    fn to_raw(index: VifIndex) -> u16 {
        index.as_u16()
    }
}

impl IndexSpace for Vrf {
    type Index = VrfIndex;
    const KIND: IndexKind = IndexKind::Vrf;

    fn from_raw(raw: u16) -> VrfIndex {
        VrfIndex::from_raw(raw)
    }

    fn to_raw(index: VrfIndex) -> u16 {
        index.as_u16()
    }
}

impl IndexSpace for Bridge {
    type Index = BridgeId;
    const KIND: IndexKind = IndexKind::Bridge;

    fn from_raw(raw: u16) -> BridgeId {
        BridgeId::from_raw(raw)
    }

    fn to_raw(index: BridgeId) -> u16 {
        index.as_u16()
    }
}

macro_rules! raw_u16_conversions {
    ($ty:ident, $kind:expr) => {
        impl $ty {
            /// Wraps a raw value as read from a record, without checking it.
            #[inline]
            pub const fn from_raw(raw: u16) -> Self {
                Self(raw)
            }

            /// Wraps `raw` if it lies inside the index space.
            #[inline]
            pub const fn new(raw: u16) -> Result<Self, IndexError> {
                match $kind.check(raw as u32) {
                    Ok(v) => Ok(Self(v)),
                    Err(e) => Err(e),
                }
            }

            #[inline]
            pub const fn as_u16(self) -> u16 {
                self.0
            }

            #[inline]
            pub const fn is_valid(self) -> bool {
                $kind.contains(self.0 as u32)
            }
        }

        impl TryFrom<u32> for $ty {
            type Error = IndexError;

            fn try_from(raw: u32) -> Result<Self, Self::Error> {
                $kind.check(raw).map(Self)
            }
        }

        impl From<$ty> for u16 {
            fn from(v: $ty) -> u16 {
                v.0
            }
        }

        impl From<$ty> for u32 {
            fn from(v: $ty) -> u32 {
                v.0 as u32
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $kind, self.0)
            }
        }
    };
}

/// Virtual interface index.
///
/// Only 16 bits wide, so it can never hold [`VIF_BROADCAST`]; see
/// [`EgressTarget`](crate::EgressTarget) for the wide form.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, FromBytes, IntoBytes, KnownLayout, Immutable,
)]
#[repr(transparent)]
pub struct VifIndex(u16);

impl VifIndex {
    pub const INVALID: Self = Self(VIF_INVALID_INDEX);
    pub const MAX: Self = Self(VIF_MAX_INDEX);

    #[inline]
    pub const fn is_invalid(self) -> bool {
        self.0 == VIF_INVALID_INDEX
    }
}

raw_u16_conversions!(VifIndex, IndexKind::Vif);

/// VRF index. Upper bound only; see [`is_valid_vrf`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, FromBytes, IntoBytes, KnownLayout, Immutable,
)]
#[repr(transparent)]
pub struct VrfIndex(u16);

impl VrfIndex {
    pub const MAX: Self = Self(VRF_MAX_ENTRY as u16 - 1);
}

raw_u16_conversions!(VrfIndex, IndexKind::Vrf);

/// Layer-2 bridge domain identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, FromBytes, IntoBytes, KnownLayout, Immutable,
)]
#[repr(transparent)]
pub struct BridgeId(u16);

impl BridgeId {
    pub const INVALID: Self = Self(BRIDGE_INVALID_ID);
    pub const MAX: Self = Self(BRIDGE_MAX_ID);

    #[inline]
    pub const fn is_invalid(self) -> bool {
        self.0 == BRIDGE_INVALID_ID
    }
}

raw_u16_conversions!(BridgeId, IndexKind::Bridge);
