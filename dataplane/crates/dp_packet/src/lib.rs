//! Packet Metadata
//!
//! Every packet buffer handed out by a [`PacketPool`] carries a fixed-size
//! private record, the [`PacketMetadata`], placed directly after the buffer's
//! [`PacketDesc`]. Pipeline stages use it to pass forwarding context along
//! without allocating or copying:
//!
//! | Field     | Written by                  | Rule                          |
//! |-----------|-----------------------------|-------------------------------|
//! | `in_vif`  | classification              | invalid (0) or `1..=4095`     |
//! | `out_vif` | forwarding                  | invalid (0) or `1..=4095`     |
//! | `flags`   | any stage                   | bits are only ever added      |
//! | `local`   | the pool, at allocation     | write-once                    |
//! | `udata`   | stage-private conventions   | opaque to this crate          |
//!
//! # Build-Time Budget
//!
//! The total record size is the platform's private-metadata budget,
//! `PRIV_ALIGN << 6` bytes, selected with exactly one of the
//! `priv-align-8` (default) or `priv-align-16` features. The opaque region
//! is whatever the fixed prefix leaves over; a prefix that outgrows the
//! budget fails the build.
//!
//! # Layout Versions
//!
//! With `legacy-vrf` (default) the prefix still starts with the deprecated
//! 64-bit VRF slot. Without it the slot is gone and the prefix shrinks.
//! [`METADATA_LAYOUT_VERSION`] tells the two apart.
//!
//! # Example
//!
//! ```rust
//! use dp_abi::{MdFlags, VifIndex};
//! use dp_packet::{PacketPool, PoolConfig};
//!
//! let pool = PacketPool::new(PoolConfig::new("rx0", 4)).unwrap();
//! let mut pkt = pool.alloc().unwrap();
//!
//! let md = pkt.metadata_mut();
//! md.set_in_vif(VifIndex::new(42).unwrap());
//! md.insert_flags(MdFlags::SELF);
//! assert!(!md.is_local());
//! ```

#![no_std]

extern crate alloc;

#[cfg(all(feature = "priv-align-8", feature = "priv-align-16"))]
compile_error!(
    "Cannot enable both `priv-align-8` and `priv-align-16`. \
     Select exactly one private-area alignment at build time."
);

#[cfg(not(any(feature = "priv-align-8", feature = "priv-align-16")))]
compile_error!(
    "Must enable either `priv-align-8` or `priv-align-16`. \
     Use `--features priv-align-16` together with `--no-default-features` to change it."
);

mod desc;
mod metadata;
mod pool;
pub mod profile;

pub use desc::*;
pub use metadata::*;
pub use pool::*;
pub use profile::{ActiveProfile, PACKET_METADATA_SIZE, PlatformProfile};
