use zerocopy::FromZeros;

use crate::{PACKET_METADATA_SIZE, PacketMetadata};

/// Size of the core buffer descriptor. The metadata record starts here.
pub const PACKET_DESC_SIZE: usize = 128;
/// Bytes reserved in front of the packet data for header pushes.
pub const PACKET_HEADROOM: usize = 128;
/// Largest packet a single buffer holds.
pub const MAX_PACKET_SIZE: usize = 4096;
/// Data room following the metadata record.
pub const DATA_ROOM_SIZE: usize = PACKET_HEADROOM + MAX_PACKET_SIZE;

/// Core per-packet descriptor, two cache lines wide.
#[derive(Debug, FromZeros)]
#[repr(C, align(64))]
pub struct PacketDesc {
    pub(crate) slot: u32,
    pub(crate) data_off: u16,
    pub(crate) data_len: u16,
    pub(crate) pkt_len: u32,
    pub(crate) port: u16,
    /// Size of the private area that follows. Always [`PACKET_METADATA_SIZE`].
    pub(crate) priv_size: u16,
    _reserved: [u8; 112],
}

const _: () = assert!(size_of::<PacketDesc>() == PACKET_DESC_SIZE);
const _: () = assert!(PACKET_METADATA_SIZE <= u16::MAX as usize);

impl PacketDesc {
    /// Index of the buffer inside its pool.
    pub fn slot(&self) -> u32 {
        self.slot
    }

    pub fn data_off(&self) -> u16 {
        self.data_off
    }

    pub fn data_len(&self) -> u16 {
        self.data_len
    }

    pub fn pkt_len(&self) -> u32 {
        self.pkt_len
    }

    /// Hardware port the packet arrived on.
    pub fn port(&self) -> u16 {
        self.port
    }

    pub(crate) fn set_port(&mut self, port: u16) {
        self.port = port;
    }

    pub fn priv_size(&self) -> u16 {
        self.priv_size
    }
}

/// Locates the metadata record of the buffer whose descriptor is at `desc`.
///
/// Pure address arithmetic: the record sits exactly [`PACKET_DESC_SIZE`]
/// bytes after the descriptor. Computing the address is always safe;
/// dereferencing it is only sound when `desc` points into a live
/// [`PacketBuf`]. Code holding a [`Packet`](crate::Packet) should use its
/// accessors instead.
#[inline]
pub const fn metadata_of(desc: *const PacketDesc) -> *mut PacketMetadata {
    desc.cast::<u8>()
        .cast_mut()
        .wrapping_add(PACKET_DESC_SIZE)
        .cast::<PacketMetadata>()
}

/// A whole packet buffer: descriptor, private metadata area, data room.
#[derive(FromZeros)]
#[repr(C)]
pub struct PacketBuf {
    pub(crate) desc: PacketDesc,
    pub(crate) meta: PacketMetadata,
    pub(crate) data: [u8; DATA_ROOM_SIZE],
}

const _: () = assert!(core::mem::offset_of!(PacketBuf, meta) == PACKET_DESC_SIZE);
const _: () = assert!(core::mem::offset_of!(PacketBuf, data) == PACKET_DESC_SIZE + PACKET_METADATA_SIZE);

impl PacketBuf {
    pub fn desc(&self) -> &PacketDesc {
        &self.desc
    }

    pub fn metadata(&self) -> &PacketMetadata {
        &self.meta
    }

    pub fn metadata_mut(&mut self) -> &mut PacketMetadata {
        &mut self.meta
    }

    /// Prepares the buffer for a new packet.
    ///
    /// The fixed metadata prefix is always cleared; the opaque region
    /// unless `zero_udata` is off.
    pub(crate) fn reset(&mut self, slot: u32, local: bool, zero_udata: bool) {
        self.desc.slot = slot;
        self.desc.data_off = PACKET_HEADROOM as u16;
        self.desc.data_len = 0;
        self.desc.pkt_len = 0;
        self.desc.port = 0;
        self.desc.priv_size = PACKET_METADATA_SIZE as u16;
        self.meta.reset(local, zero_udata);
    }

    pub(crate) fn payload(&self) -> &[u8] {
        let start = self.desc.data_off as usize;
        &self.data[start..start + self.desc.data_len as usize]
    }

    pub(crate) fn payload_mut(&mut self) -> &mut [u8] {
        let start = self.desc.data_off as usize;
        &mut self.data[start..start + self.desc.data_len as usize]
    }

    /// Copies as much of `bytes` as fits behind the headroom.
    pub(crate) fn set_payload(&mut self, bytes: &[u8]) -> usize {
        let start = self.desc.data_off as usize;
        let len = core::cmp::min(DATA_ROOM_SIZE - start, bytes.len());
        self.data[start..start + len].copy_from_slice(&bytes[..len]);
        self.desc.data_len = len as u16;
        self.desc.pkt_len = len as u32;
        len
    }
}
