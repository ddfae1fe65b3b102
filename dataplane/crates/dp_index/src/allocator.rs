use alloc::vec;
use alloc::vec::Vec;
use core::marker::PhantomData;

use dp_abi::{Bridge, IndexSpace, Vif, Vrf};
use spin::Mutex;

use crate::{AllocError, AllocResult};

pub type VifAllocator = IndexAllocator<Vif>;
pub type VrfAllocator = IndexAllocator<Vrf>;
pub type BridgeAllocator = IndexAllocator<Bridge>;

const WORD_BITS: usize = u64::BITS as usize;

/// Thread-safe allocator over one bounded index space.
pub struct IndexAllocator<S: IndexSpace> {
    state: Mutex<AllocatorState>,
    /// Space marker (fn pointer keeps the allocator Send + Sync)
    _space: PhantomData<fn() -> S>,
}

/// Occupancy bitmap, indexed by offset from the space's lowest index.
struct AllocatorState {
    used: Vec<u64>,
    capacity: usize,
    /// Offset where the next search starts.
    next: usize,
    count: usize,
}

impl AllocatorState {
    fn new(capacity: usize) -> Self {
        Self {
            used: vec![0; capacity.div_ceil(WORD_BITS)],
            capacity,
            next: 0,
            count: 0,
        }
    }

    fn is_set(&self, offset: usize) -> bool {
        self.used[offset / WORD_BITS] & (1 << (offset % WORD_BITS)) != 0
    }

    fn set(&mut self, offset: usize) {
        self.used[offset / WORD_BITS] |= 1 << (offset % WORD_BITS);
        self.count += 1;
    }

    fn clear(&mut self, offset: usize) {
        self.used[offset / WORD_BITS] &= !(1 << (offset % WORD_BITS));
        self.count -= 1;
    }

    fn find_free(&self, from: usize, to: usize) -> Option<usize> {
        (from..to).find(|&offset| !self.is_set(offset))
    }

    /// First free offset at or after `next`, wrapping to the start.
    fn take(&mut self) -> Option<usize> {
        let offset = self
            .find_free(self.next, self.capacity)
            .or_else(|| self.find_free(0, self.next))?;
        self.set(offset);
        self.next = (offset + 1) % self.capacity;
        Some(offset)
    }
}

impl<S: IndexSpace> IndexAllocator<S> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(AllocatorState::new(S::capacity())),
            _space: PhantomData,
        }
    }

    /// Hands out the next free index.
    pub fn alloc(&self) -> AllocResult<S::Index> {
        let Some(offset) = self.state.lock().take() else {
            log::warn!("{} index space exhausted", S::KIND);
            return Err(AllocError::Exhausted { space: S::KIND });
        };
        let index = S::from_raw(Self::raw_of(offset));
        log::trace!("assigned {}", index);
        Ok(index)
    }

    /// Claims a specific index, e.g. one fixed by configuration.
    pub fn reserve(&self, index: S::Index) -> AllocResult<()> {
        let offset = Self::offset_of(index)?;
        let mut state = self.state.lock();
        if state.is_set(offset) {
            return Err(AllocError::AlreadyAllocated {
                space: S::KIND,
                value: S::to_raw(index).into(),
            });
        }
        state.set(offset);
        log::trace!("reserved {}", index);
        Ok(())
    }

    /// Returns an index to the space.
    pub fn free(&self, index: S::Index) -> AllocResult<()> {
        let offset = Self::offset_of(index)?;
        let mut state = self.state.lock();
        if !state.is_set(offset) {
            log::warn!("rejected release of unallocated {}", index);
            return Err(AllocError::NotAllocated {
                space: S::KIND,
                value: S::to_raw(index).into(),
            });
        }
        state.clear(offset);
        log::trace!("released {}", index);
        Ok(())
    }

    /// Returns true if `index` is currently handed out. Out-of-range
    /// indices are never allocated.
    pub fn is_allocated(&self, index: S::Index) -> bool {
        Self::offset_of(index)
            .map(|offset| self.state.lock().is_set(offset))
            .unwrap_or(false)
    }

    /// Number of indices currently handed out.
    pub fn len(&self) -> usize {
        self.state.lock().count
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        S::capacity()
    }

    fn offset_of(index: S::Index) -> AllocResult<usize> {
        let raw = u32::from(S::to_raw(index));
        S::checked(raw)?;
        Ok((raw - S::MIN) as usize)
    }

    fn raw_of(offset: usize) -> u16 {
        // capacity never exceeds the 16-bit index width
        (offset as u32 + S::MIN) as u16
    }
}

impl<S: IndexSpace> Default for IndexAllocator<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use dp_abi::{BridgeId, IndexError, IndexKind, VifIndex, VrfIndex};

    use super::*;

    fn vif(raw: u16) -> VifIndex {
        VifIndex::new(raw).unwrap()
    }

    #[test]
    fn vif_starts_at_one() {
        let vifs = VifAllocator::new();
        assert_eq!(vifs.alloc(), Ok(vif(1)));
        assert_eq!(vifs.alloc(), Ok(vif(2)));
        assert_eq!(vifs.len(), 2);
        assert_eq!(vifs.capacity(), 4095);
    }

    #[test]
    fn vrf_starts_at_zero() {
        let vrfs = VrfAllocator::new();
        assert_eq!(vrfs.alloc(), Ok(VrfIndex::new(0).unwrap()));
        assert_eq!(vrfs.capacity(), 256);
    }

    #[test]
    fn released_index_is_not_reused_immediately() {
        let vifs = VifAllocator::new();
        let a = vifs.alloc().unwrap();
        let b = vifs.alloc().unwrap();
        vifs.free(a).unwrap();

        let c = vifs.alloc().unwrap();
        assert_ne!(c, a);
        assert_eq!(c.as_u16(), b.as_u16() + 1);
    }

    #[test]
    fn search_wraps_around() {
        let bridges = BridgeAllocator::new();
        let all: Vec<BridgeId> = (0..1023).map(|_| bridges.alloc().unwrap()).collect();
        assert_eq!(all[0], BridgeId::new(1).unwrap());
        assert_eq!(all[1022], BridgeId::MAX);
        assert_eq!(
            bridges.alloc(),
            Err(AllocError::Exhausted {
                space: IndexKind::Bridge
            })
        );

        bridges.free(BridgeId::new(5).unwrap()).unwrap();
        assert_eq!(bridges.alloc(), Ok(BridgeId::new(5).unwrap()));
        assert!(bridges.alloc().is_err());
    }

    #[test]
    fn every_handed_out_index_is_valid() {
        let vifs = VifAllocator::new();
        while let Ok(v) = vifs.alloc() {
            assert!(v.is_valid());
        }
        assert_eq!(vifs.len(), 4095);
    }

    #[test]
    fn reserve_claims_specific_index() {
        let vifs = VifAllocator::new();
        vifs.reserve(vif(1)).unwrap();
        assert!(vifs.is_allocated(vif(1)));
        assert_eq!(vifs.alloc(), Ok(vif(2)));
        assert_eq!(
            vifs.reserve(vif(2)),
            Err(AllocError::AlreadyAllocated {
                space: IndexKind::Vif,
                value: 2
            })
        );
    }

    #[test]
    fn double_free_is_rejected() {
        let vifs = VifAllocator::new();
        let v = vifs.alloc().unwrap();
        vifs.free(v).unwrap();
        assert_eq!(
            vifs.free(v),
            Err(AllocError::NotAllocated {
                space: IndexKind::Vif,
                value: 1
            })
        );
        assert!(vifs.is_empty());
    }

    #[test]
    fn out_of_range_indices_are_rejected() {
        let vifs = VifAllocator::new();
        assert_eq!(
            vifs.free(VifIndex::INVALID),
            Err(AllocError::OutOfRange(IndexError::OutOfRange {
                space: IndexKind::Vif,
                value: 0
            }))
        );
        assert!(vifs.reserve(VifIndex::from_raw(4096)).is_err());
        assert!(!vifs.is_allocated(VifIndex::from_raw(4096)));

        let vrfs = VrfAllocator::new();
        assert!(vrfs.free(VrfIndex::from_raw(256)).is_err());
    }
}
