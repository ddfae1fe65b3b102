//! Packet Buffer Pool
//!
//! Preallocated buffers, each with its metadata record in place. A buffer
//! and its record are handed out together as one [`Packet`], so no stage
//! ever recomputes the record address on its own.
//!
//! # Allocation Contract
//!
//! - The fixed metadata prefix is cleared on every allocation, so nothing
//!   from the previous packet leaks into the new one.
//! - `local` is set once, by choosing [`PacketPool::alloc`] or
//!   [`PacketPool::alloc_local`].
//! - The opaque region is cleared too, unless the pool was built with
//!   [`PoolConfig::with_zero_udata`]`(false)`.
//!
//! # Ownership
//!
//! A [`Packet`] is the only way to reach its buffer. It is `Send`, so it can
//! move from one pipeline worker to the next, and the buffer returns to the
//! pool when the handle is dropped. A buffer can therefore never be recycled
//! while a stage still holds it. The handle remembers its own slot and the
//! descriptor is only reachable through narrow setters, so nothing a stage
//! writes can make a drop release someone else's buffer.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::cell::UnsafeCell;

use spin::Mutex;
use thiserror::Error;
use zerocopy::FromZeros;

use crate::{PacketBuf, PacketDesc, PacketMetadata};

/// Largest pool a single [`PoolConfig`] may describe.
pub const MAX_POOL_CAPACITY: usize = u16::MAX as usize;

/// Pool construction errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PoolError {
    #[error("pool capacity must be at least one buffer")]
    ZeroCapacity,
    #[error("pool capacity {requested} exceeds {max}")]
    CapacityTooLarge { requested: usize, max: usize },
}

/// Pool definition.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Name used in log messages.
    pub name: &'static str,
    /// Number of buffers
    pub capacity: usize,
    /// Clear the opaque metadata region on allocation. On by default.
    pub zero_udata: bool,
}

impl PoolConfig {
    pub const fn new(name: &'static str, capacity: usize) -> Self {
        Self {
            name,
            capacity,
            zero_udata: true,
        }
    }

    /// `false` leaves the opaque region as the previous packet left it.
    /// Only for pools whose stages overwrite every opaque byte they read.
    pub const fn with_zero_udata(mut self, zero_udata: bool) -> Self {
        self.zero_udata = zero_udata;
        self
    }

    fn validate(&self) -> Result<(), PoolError> {
        if self.capacity == 0 {
            return Err(PoolError::ZeroCapacity);
        }
        if self.capacity > MAX_POOL_CAPACITY {
            return Err(PoolError::CapacityTooLarge {
                requested: self.capacity,
                max: MAX_POOL_CAPACITY,
            });
        }
        Ok(())
    }
}

/// Fixed-size pool of packet buffers.
pub struct PacketPool {
    config: PoolConfig,
    bufs: Box<[UnsafeCell<PacketBuf>]>,
    /// Slots not currently owned by a [`Packet`]. Popped from the back.
    free: Mutex<Vec<u32>>,
}

// Safety: a slot's UnsafeCell is only dereferenced by the single Packet that
// popped the slot off the free list, and the slot is pushed back only when
// that Packet is dropped.
unsafe impl Sync for PacketPool {}

impl PacketPool {
    pub fn new(config: PoolConfig) -> Result<Self, PoolError> {
        config.validate()?;

        let bufs = (0..config.capacity)
            .map(|_| UnsafeCell::new(PacketBuf::new_zeroed()))
            .collect::<Box<[_]>>();
        // lowest slot is handed out first
        let free = (0..config.capacity as u32).rev().collect::<Vec<_>>();

        log::debug!(
            "pool {}: {} buffers, {} bytes of metadata each",
            config.name,
            config.capacity,
            crate::PACKET_METADATA_SIZE
        );

        Ok(Self {
            config,
            bufs,
            free: Mutex::new(free),
        })
    }

    /// Allocates a buffer for a packet received from the network.
    pub fn alloc(&self) -> Option<Packet<'_>> {
        self.alloc_with(false)
    }

    /// Allocates a buffer for a packet the router generates itself.
    pub fn alloc_local(&self) -> Option<Packet<'_>> {
        self.alloc_with(true)
    }

    fn alloc_with(&self, local: bool) -> Option<Packet<'_>> {
        let Some(slot) = self.free.lock().pop() else {
            log::warn!("pool {}: exhausted", self.config.name);
            return None;
        };

        // Safety: the slot just left the free list, so nothing else refers
        // to this buffer until the returned Packet is dropped.
        let buf = unsafe { &mut *self.bufs[slot as usize].get() };
        buf.reset(slot, local, self.config.zero_udata);

        Some(Packet { pool: self, slot, buf })
    }

    fn release(&self, slot: u32) {
        self.free.lock().push(slot);
    }

    pub fn name(&self) -> &'static str {
        self.config.name
    }

    pub fn capacity(&self) -> usize {
        self.bufs.len()
    }

    /// Buffers ready to be allocated.
    pub fn available(&self) -> usize {
        self.free.lock().len()
    }

    /// Buffers currently owned by a [`Packet`].
    pub fn in_use(&self) -> usize {
        self.capacity() - self.available()
    }
}

/// Exclusive handle to one pooled buffer and its metadata record.
pub struct Packet<'pool> {
    pool: &'pool PacketPool,
    slot: u32,
    buf: &'pool mut PacketBuf,
}

impl Packet<'_> {
    pub fn desc(&self) -> &PacketDesc {
        self.buf.desc()
    }

    /// Records the hardware port the packet arrived on.
    pub fn set_port(&mut self, port: u16) {
        self.buf.desc.set_port(port);
    }

    pub fn metadata(&self) -> &PacketMetadata {
        self.buf.metadata()
    }

    pub fn metadata_mut(&mut self) -> &mut PacketMetadata {
        self.buf.metadata_mut()
    }

    pub fn payload(&self) -> &[u8] {
        self.buf.payload()
    }

    pub fn payload_mut(&mut self) -> &mut [u8] {
        self.buf.payload_mut()
    }

    /// Copies `bytes` into the data room, truncating to
    /// [`MAX_PACKET_SIZE`](crate::MAX_PACKET_SIZE). Returns the bytes copied.
    pub fn set_payload(&mut self, bytes: &[u8]) -> usize {
        self.buf.set_payload(bytes)
    }
}

impl Drop for Packet<'_> {
    fn drop(&mut self) {
        log::trace!("pool {}: release slot {}", self.pool.name(), self.slot);
        self.pool.release(self.slot);
    }
}
