use super::PlacementStrategy;
use crate::core::types::{Address, Size};
use crate::memory::region::MemoryRegion;
use crate::memory::traits::Placement;

/// Tightest free run that still holds the request; lowest offset on ties
#[derive(Debug, Clone, Copy, Default)]
pub struct BestFit;

impl Placement for BestFit {
    fn find_slot(&mut self, region: &MemoryRegion, size: Size) -> Option<Address> {
        region
            .free_runs()
            .into_iter()
            .filter(|run| run.fits(size))
            // min_by_key keeps the first of equal minima, i.e. the lowest offset
            .min_by_key(|run| run.len)
            .map(|run| run.offset)
    }

    fn kind(&self) -> PlacementStrategy {
        PlacementStrategy::BestFit
    }
}
