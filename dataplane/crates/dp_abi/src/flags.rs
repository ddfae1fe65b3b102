use core::fmt;

use bitflags::bitflags;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Classification outcomes accumulated on a packet.
///
/// Bit positions are part of the record ABI. New outcomes get new bits;
/// existing ones are never renumbered. Bits this build does not know about
/// are kept as-is so records written by newer stages survive a round trip.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(transparent)]
pub struct MdFlags(u32);

bitflags! {
    impl MdFlags: u32 {
        /// The packet is addressed to the router itself.
        const SELF = 1 << 0;
        /// The packet must be run through the match-action table.
        /// Only the bridge stage looks at this bit.
        const MAT = 1 << 1;
    }
}

impl fmt::Debug for MdFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "MdFlags({:#x})", self.bits());
        }
        f.write_str("MdFlags(")?;
        bitflags::parser::to_writer(self, &mut *f)?;
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    extern crate alloc;

    use alloc::format;

    use super::*;

    #[test]
    fn stable_bit_positions() {
        assert_eq!(MdFlags::SELF.bits(), 0x1);
        assert_eq!(MdFlags::MAT.bits(), 0x2);
        assert_eq!(MdFlags::default(), MdFlags::empty());
    }

    #[test]
    fn combination_is_commutative() {
        let mut a = MdFlags::empty();
        a.insert(MdFlags::SELF);
        a.insert(MdFlags::MAT);

        let mut b = MdFlags::empty();
        b.insert(MdFlags::MAT);
        b.insert(MdFlags::SELF);

        assert_eq!(a, b);
        assert_eq!(a, MdFlags::SELF | MdFlags::MAT);
    }

    #[test]
    fn combination_is_idempotent() {
        let mut once = MdFlags::empty();
        once.insert(MdFlags::SELF);

        let mut twice = once;
        twice.insert(MdFlags::SELF);

        assert_eq!(once, twice);
    }

    #[test]
    fn setting_one_never_clears_another() {
        let mut flags = MdFlags::MAT;
        flags |= MdFlags::SELF;
        assert!(flags.contains(MdFlags::MAT));
        assert!(flags.contains(MdFlags::SELF));
    }

    #[test]
    fn unknown_bits_are_retained() {
        let flags = MdFlags::from_bits_retain(0x8000_0001);
        assert!(flags.contains(MdFlags::SELF));
        assert_eq!(flags.bits(), 0x8000_0001);
        assert_eq!(MdFlags::from_bits(0x8000_0001), None);
    }

    #[test]
    fn debug_names_flags() {
        assert_eq!(format!("{:?}", MdFlags::SELF | MdFlags::MAT), "MdFlags(SELF | MAT)");
        assert_eq!(format!("{:?}", MdFlags::empty()), "MdFlags(0x0)");
    }
}
