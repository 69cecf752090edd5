/*!
 * Memory Types
 * Common types for the simulated memory region
 */

use crate::core::limits::{FREE_GLYPH, RESERVED_GLYPH, ROW_WIDTH};
use crate::core::types::{Address, ProcessId, Size, Time};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Memory operation result
pub type MemoryResult<T> = Result<T, MemoryError>;

/// Memory errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum MemoryError {
    #[error("Range [{offset}, {offset}+{size}) lies outside usable memory [{start}, {end})")]
    #[diagnostic(
        code(memory::out_of_bounds),
        help("Placement strategies must only return offsets inside the non-reserved region.")
    )]
    RangeOutOfBounds {
        offset: Address,
        size: Size,
        start: Address,
        end: Address,
    },

    #[error("Unit 0x{address:x} is not free (requested by {requester})")]
    #[diagnostic(
        code(memory::double_allocation),
        help("A placement strategy returned a slot overlapping a live allocation.")
    )]
    RangeNotFree {
        address: Address,
        requester: ProcessId,
    },

    #[error("Zero-sized allocation requested by {0}")]
    #[diagnostic(code(memory::zero_size))]
    ZeroSize(ProcessId),

    #[error("Invalid geometry: {reserved} reserved units in a region of {capacity}")]
    #[diagnostic(
        code(memory::invalid_geometry),
        help("The region needs at least one unit and no more reserved units than it holds.")
    )]
    InvalidGeometry { capacity: Size, reserved: Size },

    #[error("Memory corruption detected at 0x{address:x}: {reason}")]
    #[diagnostic(code(memory::corruption))]
    CorruptionDetected { address: Address, reason: String },
}

/// State of a single memory unit
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", content = "owner", rename_all = "snake_case")]
pub enum UnitState {
    /// Kernel prefix, never allocated
    Reserved,
    Free,
    Owned(ProcessId),
}

impl UnitState {
    #[inline(always)]
    pub fn is_free(&self) -> bool {
        matches!(self, UnitState::Free)
    }

    #[inline(always)]
    pub fn is_reserved(&self) -> bool {
        matches!(self, UnitState::Reserved)
    }

    #[inline]
    pub fn owner(&self) -> Option<&ProcessId> {
        match self {
            UnitState::Owned(id) => Some(id),
            _ => None,
        }
    }

    /// Console symbol for this unit
    #[inline]
    pub fn glyph(&self) -> char {
        match self {
            UnitState::Reserved => RESERVED_GLYPH,
            UnitState::Free => FREE_GLYPH,
            UnitState::Owned(id) => id.glyph(),
        }
    }
}

/// Read-only copy of memory at a point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemorySnapshot {
    pub time: Time,
    pub units: Vec<UnitState>,
}

impl MemorySnapshot {
    /// Grid rows of `row_width` glyphs each
    pub fn rows(&self, row_width: usize) -> Vec<String> {
        self.units
            .chunks(row_width.max(1))
            .map(|row| row.iter().map(UnitState::glyph).collect())
            .collect()
    }
}

impl fmt::Display for MemorySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Memory at time {}:", self.time)?;
        for row in self.rows(ROW_WIDTH) {
            write!(f, "\n{}", row)?;
        }
        Ok(())
    }
}

/// Memory statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryStats {
    pub total_units: Size,
    pub reserved_units: Size,
    pub used_units: Size,
    pub free_units: Size,
    pub free_runs: usize,
    pub largest_free_run: Size,
    /// Share of free memory outside the largest free run (0-100)
    pub fragmentation_percentage: f64,
}

impl MemoryStats {
    /// Usage of the allocatable (non-reserved) part of memory, 0-100
    pub fn usage_percentage(&self) -> f64 {
        let usable = self.total_units - self.reserved_units;
        if usable == 0 {
            return 100.0;
        }
        (self.used_units as f64 / usable as f64) * 100.0
    }

    pub fn memory_pressure(&self) -> MemoryPressure {
        let usage = self.usage_percentage();
        if usage >= 95.0 {
            MemoryPressure::Critical
        } else if usage >= 80.0 {
            MemoryPressure::High
        } else if usage >= 60.0 {
            MemoryPressure::Medium
        } else {
            MemoryPressure::Low
        }
    }
}

/// Memory pressure levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemoryPressure {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for MemoryPressure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MemoryPressure::Low => write!(f, "LOW"),
            MemoryPressure::Medium => write!(f, "MEDIUM"),
            MemoryPressure::High => write!(f, "HIGH"),
            MemoryPressure::Critical => write!(f, "CRITICAL"),
        }
    }
}
