/*!
 * System Limits and Constants
 *
 * Fixed geometry of the simulated machine and the glyphs used to draw it.
 * None of these are runtime-configurable.
 */

use super::types::{Size, Time};

// =============================================================================
// MEMORY GEOMETRY
// =============================================================================

/// Total units in main memory
pub const MEM_SIZE: Size = 560;

/// Units permanently held by the kernel at the low end of memory
pub const RESERVED_SIZE: Size = 80;

// =============================================================================
// RENDERING
// =============================================================================

/// Units per printed row of the memory grid
pub const ROW_WIDTH: usize = 80;

/// Glyph for a free unit
pub const FREE_GLYPH: char = '.';

/// Glyph for a reserved unit
pub const RESERVED_GLYPH: char = '#';

// =============================================================================
// TIMELINE
// =============================================================================

/// Engine time before the first step; the first advance lands on time 0
pub const START_TIME: Time = -1;

// =============================================================================
// PROCESS EXIT CODES
// =============================================================================

/// Generic failure
pub const EXIT_FAILURE: u8 = 1;

/// A process could not be placed even after compaction
pub const EXIT_OUT_OF_MEMORY: u8 = 2;
