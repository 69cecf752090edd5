/*!
 * Memory Compaction
 * Slides every live allocation toward the kernel prefix so free space merges
 * into one block at the high end of memory
 */

use super::region::MemoryRegion;
use crate::core::types::{ProcessId, Size};
use ahash::AHashSet;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Outcome of a single compaction pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompactionReport {
    /// Processes whose units moved, in address order
    pub relocated: Vec<ProcessId>,
    /// Units copied during the pass
    pub units_moved: Size,
    /// Size of the free block left at the high end
    pub free_block_size: Size,
    /// Total region size, reserved prefix included
    pub total_size: Size,
}

impl CompactionReport {
    #[inline]
    pub fn relocated_count(&self) -> usize {
        self.relocated.len()
    }

    /// Free block as a percentage of the whole region (0-100)
    pub fn free_percentage(&self) -> f64 {
        if self.total_size == 0 {
            return 0.0;
        }
        self.free_block_size as f64 / self.total_size as f64 * 100.0
    }
}

impl fmt::Display for CompactionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Relocated {} processes to create a free memory block of {} units ({:.2}% of total memory).",
            self.relocated_count(),
            self.free_block_size,
            self.free_percentage()
        )
    }
}

/// Defragmenter with lifetime counters
#[derive(Debug, Clone, Default)]
pub struct Compactor {
    passes: usize,
    units_moved: usize,
}

impl Compactor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one compaction pass over `region`
    ///
    /// Owned units are copied down to a destination cursor that starts at the
    /// end of the reserved prefix, so relative order and per-process contiguity
    /// survive. A process counts as relocated when any of its units moved.
    pub fn compact(&mut self, region: &mut MemoryRegion) -> CompactionReport {
        debug!(used = region.used_units(), "Compaction pass starting");

        let mut destination = region.user_start();
        let mut relocated = Vec::new();
        let mut seen: AHashSet<ProcessId> = AHashSet::new();
        let mut units_moved = 0;

        for address in region.user_start()..region.capacity() {
            let Some(owner) = region.units()[address].owner() else {
                continue;
            };
            if address != destination {
                if seen.insert(owner.clone()) {
                    relocated.push(owner.clone());
                }
                region.relocate_unit(address, destination);
                units_moved += 1;
            }
            destination += 1;
        }

        debug_assert!(region.verify().is_ok(), "compaction broke contiguity");

        self.passes += 1;
        self.units_moved += units_moved;

        let report = CompactionReport {
            relocated,
            units_moved,
            free_block_size: region.capacity() - destination,
            total_size: region.capacity(),
        };

        debug!(
            relocated = ?report.relocated,
            units_moved,
            free_block = report.free_block_size,
            "Compaction pass finished"
        );
        report
    }

    /// Passes run so far
    pub fn passes(&self) -> usize {
        self.passes
    }

    /// Units moved across all passes
    pub fn units_moved(&self) -> usize {
        self.units_moved
    }
}
