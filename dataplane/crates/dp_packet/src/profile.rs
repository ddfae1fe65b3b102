//! Platform Profiles
//!
//! The packet I/O layer reserves a fixed private area after every buffer
//! descriptor. Its size is `PRIV_ALIGN << 6`, where `PRIV_ALIGN` is the
//! alignment the platform enforces on that area. The profile is picked at
//! build time, so every size derived from it is a constant.
//!
//! ```rust,ignore
//! use dp_packet::profile::{ActiveProfile, PlatformProfile};
//!
//! const BUDGET: usize = ActiveProfile::METADATA_SIZE;
//! ```

mod sealed {
    pub trait Sealed {}
}

/// Build-time description of the private metadata area.
///
/// Sealed: only [`Align8Profile`] and [`Align16Profile`] exist.
pub trait PlatformProfile: sealed::Sealed + 'static {
    /// Alignment of the private area in bytes.
    const PRIV_ALIGN: usize;

    /// Per-buffer private metadata budget in bytes.
    const METADATA_SIZE: usize = Self::PRIV_ALIGN << 6;

    /// Profile name for diagnostics and logging.
    const NAME: &'static str;
}

/// 8-byte private alignment, 512-byte budget.
///
/// ```bash
/// cargo build --features priv-align-8
/// ```
pub struct Align8Profile;

impl sealed::Sealed for Align8Profile {}

impl PlatformProfile for Align8Profile {
    const PRIV_ALIGN: usize = 8;
    const NAME: &'static str = "priv-align-8";
}

/// 16-byte private alignment, 1024-byte budget.
///
/// ```bash
/// cargo build --no-default-features --features priv-align-16,legacy-vrf
/// ```
pub struct Align16Profile;

impl sealed::Sealed for Align16Profile {}

impl PlatformProfile for Align16Profile {
    const PRIV_ALIGN: usize = 16;
    const NAME: &'static str = "priv-align-16";
}

#[cfg(feature = "priv-align-8")]
pub type ActiveProfile = Align8Profile;

#[cfg(feature = "priv-align-16")]
pub type ActiveProfile = Align16Profile;

/// Private metadata budget of the active profile.
pub const PACKET_METADATA_SIZE: usize = ActiveProfile::METADATA_SIZE;

const _: () = assert!(PACKET_METADATA_SIZE % ActiveProfile::PRIV_ALIGN == 0);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budgets() {
        assert_eq!(Align8Profile::METADATA_SIZE, 512);
        assert_eq!(Align16Profile::METADATA_SIZE, 1024);
        assert_eq!(PACKET_METADATA_SIZE, ActiveProfile::PRIV_ALIGN * 64);
    }

    #[test]
    #[cfg(feature = "priv-align-8")]
    fn align8_is_active() {
        use core::any::TypeId;

        assert_eq!(TypeId::of::<ActiveProfile>(), TypeId::of::<Align8Profile>());
        assert_eq!(ActiveProfile::NAME, "priv-align-8");
    }

    #[test]
    #[cfg(feature = "priv-align-16")]
    fn align16_is_active() {
        use core::any::TypeId;

        assert_eq!(TypeId::of::<ActiveProfile>(), TypeId::of::<Align16Profile>());
        assert_eq!(ActiveProfile::NAME, "priv-align-16");
    }
}
