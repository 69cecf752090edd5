/*!
 * Memory Module
 * Simulated main memory, placement strategies and compaction
 */

pub mod compaction;
pub mod region;
pub mod strategy;
pub mod traits;
pub mod types;

// Re-export for convenience
pub use compaction::{CompactionReport, Compactor};
pub use region::MemoryRegion;
pub use strategy::{BestFit, FirstFit, NextFit, PlacementStrategy, WorstFit};
pub use traits::Placement;
pub use types::*;
