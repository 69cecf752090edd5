use super::first_run_from;
use super::PlacementStrategy;
use crate::core::types::{Address, Size};
use crate::memory::region::MemoryRegion;
use crate::memory::traits::Placement;

/// Scan from the lowest allocatable address and take the first run that fits
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstFit;

impl Placement for FirstFit {
    fn find_slot(&mut self, region: &MemoryRegion, size: Size) -> Option<Address> {
        first_run_from(region, region.user_start(), size)
    }

    fn kind(&self) -> PlacementStrategy {
        PlacementStrategy::FirstFit
    }
}
