use super::PlacementStrategy;
use crate::core::types::{Address, Size};
use crate::memory::region::MemoryRegion;
use crate::memory::traits::Placement;

/// Largest free run that holds the request; lowest offset on ties
#[derive(Debug, Clone, Copy, Default)]
pub struct WorstFit;

impl Placement for WorstFit {
    fn find_slot(&mut self, region: &MemoryRegion, size: Size) -> Option<Address> {
        region
            .free_runs()
            .into_iter()
            .filter(|run| run.fits(size))
            .max_by(|a, b| a.len.cmp(&b.len).then_with(|| b.offset.cmp(&a.offset)))
            .map(|run| run.offset)
    }

    fn kind(&self) -> PlacementStrategy {
        PlacementStrategy::WorstFit
    }
}
