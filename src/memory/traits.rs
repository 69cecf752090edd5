/*!
 * Memory Traits
 * Placement abstraction shared by every fit strategy
 */

use super::region::MemoryRegion;
use super::strategy::PlacementStrategy;
use crate::core::types::{Address, Size};

/// Chooses where a request of `size` units should start
pub trait Placement: Send + std::fmt::Debug {
    /// Offset of a run of `size` free units, or `None` when nothing fits
    ///
    /// Must never mutate the region and never return a run that overlaps the
    /// reserved prefix or extends past the end of memory.
    fn find_slot(&mut self, region: &MemoryRegion, size: Size) -> Option<Address>;

    /// Which strategy this is
    fn kind(&self) -> PlacementStrategy;
}
