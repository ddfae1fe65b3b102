use core::fmt;
use core::mem::offset_of;

use dp_abi::{IndexError, IndexKind, MdFlags, VifIndex, VrfIndex};
use zerocopy::{FromZeros, Immutable, IntoBytes, KnownLayout};

use crate::PACKET_METADATA_SIZE;

/// Layout revision of the fixed prefix.
///
/// 1 still carries the deprecated 64-bit VRF slot at offset 0; 2 drops it.
#[cfg(feature = "legacy-vrf")]
pub const METADATA_LAYOUT_VERSION: u32 = 1;
#[cfg(not(feature = "legacy-vrf"))]
pub const METADATA_LAYOUT_VERSION: u32 = 2;

/// Fixed forwarding prefix of [`PacketMetadata`].
#[cfg(feature = "legacy-vrf")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromZeros, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct VifMetadata {
    vrf: u64,
    in_vif: VifIndex,
    out_vif: VifIndex,
    flags: MdFlags,
    local: bool,
    _pad0: u8,
    vrf_index: VrfIndex,
    _pad1: [u8; 4],
}

/// Fixed forwarding prefix of [`PacketMetadata`].
#[cfg(not(feature = "legacy-vrf"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromZeros, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct VifMetadata {
    in_vif: VifIndex,
    out_vif: VifIndex,
    flags: MdFlags,
    vrf_index: VrfIndex,
    local: bool,
    _pad: [u8; 5],
}

/// Size of the fixed prefix.
pub const VIF_METADATA_SIZE: usize = size_of::<VifMetadata>();
/// Size of the opaque stage-private region: whatever the prefix leaves of the budget.
pub const UDATA_SIZE: usize = PACKET_METADATA_SIZE - VIF_METADATA_SIZE;

/// Position of one prefix field, for layout dumps and ABI checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLayout {
    pub name: &'static str,
    pub offset: usize,
    pub size: usize,
}

#[cfg(feature = "legacy-vrf")]
static FIXED_FIELDS: [FieldLayout; 6] = [
    FieldLayout { name: "vrf", offset: offset_of!(VifMetadata, vrf), size: 8 },
    FieldLayout { name: "in_vif", offset: offset_of!(VifMetadata, in_vif), size: 2 },
    FieldLayout { name: "out_vif", offset: offset_of!(VifMetadata, out_vif), size: 2 },
    FieldLayout { name: "flags", offset: offset_of!(VifMetadata, flags), size: 4 },
    FieldLayout { name: "local", offset: offset_of!(VifMetadata, local), size: 1 },
    FieldLayout { name: "vrf_index", offset: offset_of!(VifMetadata, vrf_index), size: 2 },
];

#[cfg(not(feature = "legacy-vrf"))]
static FIXED_FIELDS: [FieldLayout; 5] = [
    FieldLayout { name: "in_vif", offset: offset_of!(VifMetadata, in_vif), size: 2 },
    FieldLayout { name: "out_vif", offset: offset_of!(VifMetadata, out_vif), size: 2 },
    FieldLayout { name: "flags", offset: offset_of!(VifMetadata, flags), size: 4 },
    FieldLayout { name: "vrf_index", offset: offset_of!(VifMetadata, vrf_index), size: 2 },
    FieldLayout { name: "local", offset: offset_of!(VifMetadata, local), size: 1 },
];

/// Named fields of the fixed prefix in offset order.
pub fn fixed_layout() -> &'static [FieldLayout] {
    &FIXED_FIELDS
}

/// Per-packet private record.
///
/// Lives in the buffer's private area; see [`metadata_of`](crate::metadata_of).
/// The prefix is only meaningful after the pool has reset it, which it
/// does on every allocation.
#[derive(FromZeros, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct PacketMetadata {
    md_vif: VifMetadata,
    udata: [u8; UDATA_SIZE],
}

const _: () = assert!(VIF_METADATA_SIZE <= PACKET_METADATA_SIZE);
const _: () = assert!(size_of::<PacketMetadata>() == PACKET_METADATA_SIZE);
const _: () = assert!(VIF_METADATA_SIZE + UDATA_SIZE == PACKET_METADATA_SIZE);
const _: () = assert!(offset_of!(PacketMetadata, udata) == VIF_METADATA_SIZE);

impl PacketMetadata {
    /// A record in its allocation state.
    pub fn new(local: bool) -> Self {
        let mut md = Self::new_zeroed();
        md.md_vif.local = local;
        md
    }

    #[inline]
    pub fn in_vif(&self) -> VifIndex {
        self.md_vif.in_vif
    }

    #[inline]
    pub fn set_in_vif(&mut self, vif: VifIndex) {
        self.md_vif.in_vif = vif;
    }

    #[inline]
    pub fn out_vif(&self) -> VifIndex {
        self.md_vif.out_vif
    }

    #[inline]
    pub fn set_out_vif(&mut self, vif: VifIndex) {
        self.md_vif.out_vif = vif;
    }

    #[inline]
    pub fn flags(&self) -> MdFlags {
        self.md_vif.flags
    }

    /// ORs `flags` into the record. Stages can add outcomes, never retract them.
    #[inline]
    pub fn insert_flags(&mut self, flags: MdFlags) {
        self.md_vif.flags |= flags;
    }

    /// True iff the router itself generated the packet.
    #[inline]
    pub fn is_local(&self) -> bool {
        self.md_vif.local
    }

    #[inline]
    pub fn vrf(&self) -> VrfIndex {
        self.md_vif.vrf_index
    }

    /// Sets the VRF. With `legacy-vrf` the old 64-bit slot is kept in step.
    #[inline]
    pub fn set_vrf(&mut self, vrf: VrfIndex) {
        self.md_vif.vrf_index = vrf;
        #[cfg(feature = "legacy-vrf")]
        {
            self.md_vif.vrf = u64::from(vrf.as_u16());
        }
    }

    #[cfg(feature = "legacy-vrf")]
    #[deprecated(note = "read `vrf()`; the 64-bit slot goes away with layout version 2")]
    pub fn legacy_vrf(&self) -> u64 {
        self.md_vif.vrf
    }

    #[cfg(feature = "legacy-vrf")]
    #[deprecated(note = "use `set_vrf()`; the 64-bit slot goes away with layout version 2")]
    pub fn set_legacy_vrf(&mut self, vrf: u64) {
        self.md_vif.vrf = vrf;
    }

    /// Raw bytes of the fixed prefix, in ABI order.
    pub fn prefix_bytes(&self) -> &[u8] {
        self.md_vif.as_bytes()
    }

    /// Opaque region for stage-private extensions.
    pub fn udata(&self) -> &[u8; UDATA_SIZE] {
        &self.udata
    }

    pub fn udata_mut(&mut self) -> &mut [u8; UDATA_SIZE] {
        &mut self.udata
    }

    /// Checks the indices a consumer is about to act on.
    ///
    /// `in_vif`/`out_vif` must be invalid (0) or in `1..=4095`, the VRF below
    /// 256. The first violation is returned; the caller decides whether to
    /// drop the packet.
    pub fn check_indices(&self) -> Result<(), IndexError> {
        for vif in [self.md_vif.in_vif, self.md_vif.out_vif] {
            if !vif.is_invalid() && !vif.is_valid() {
                return Err(IndexError::OutOfRange {
                    space: IndexKind::Vif,
                    value: vif.as_u16().into(),
                });
            }
        }
        if !self.md_vif.vrf_index.is_valid() {
            return Err(IndexError::OutOfRange {
                space: IndexKind::Vrf,
                value: self.md_vif.vrf_index.as_u16().into(),
            });
        }
        Ok(())
    }

    pub(crate) fn reset(&mut self, local: bool, zero_udata: bool) {
        self.md_vif.zero();
        self.md_vif.local = local;
        if zero_udata {
            self.udata.zero();
        }
    }
}

impl Default for PacketMetadata {
    fn default() -> Self {
        Self::new(false)
    }
}

impl fmt::Debug for PacketMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PacketMetadata")
            .field("in_vif", &self.md_vif.in_vif)
            .field("out_vif", &self.md_vif.out_vif)
            .field("flags", &self.md_vif.flags)
            .field("local", &self.md_vif.local)
            .field("vrf", &self.md_vif.vrf_index)
            .field("udata_len", &UDATA_SIZE)
            .finish()
    }
}
