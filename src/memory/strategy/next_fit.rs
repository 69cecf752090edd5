use super::first_run_from;
use super::PlacementStrategy;
use crate::core::types::{Address, Size};
use crate::memory::region::MemoryRegion;
use crate::memory::traits::Placement;

/// First-fit that resumes from the offset of the previous successful allocation
///
/// When nothing fits between the cursor and the end of memory the scan wraps
/// to the first allocatable unit. The cursor only moves on success.
#[derive(Debug, Clone, Copy)]
pub struct NextFit {
    cursor: Address,
}

impl NextFit {
    pub fn new(cursor: Address) -> Self {
        Self { cursor }
    }

    #[inline]
    pub fn cursor(&self) -> Address {
        self.cursor
    }
}

impl Placement for NextFit {
    fn find_slot(&mut self, region: &MemoryRegion, size: Size) -> Option<Address> {
        let slot = first_run_from(region, self.cursor, size)
            .or_else(|| first_run_from(region, region.user_start(), size))?;
        self.cursor = slot;
        Some(slot)
    }

    fn kind(&self) -> PlacementStrategy {
        PlacementStrategy::NextFit
    }
}
