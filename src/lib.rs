/*!
 * Memory Allocation Simulator Library
 * Fixed-size main memory driven by a timeline of process arrivals and departures,
 * placed with first-fit, next-fit, best-fit or worst-fit and compacted on demand
 */

pub mod core;
pub mod memory;
pub mod monitoring;
pub mod process;
pub mod simulation;

// Re-exports
pub use crate::core::{MemsimError, MemsimResult, ProcessId, Span};
pub use memory::{CompactionReport, Compactor, MemoryRegion, Placement, PlacementStrategy};
pub use monitoring::init_tracing;
pub use process::{load_workload, Process, ProcessRegistry};
pub use simulation::{RunSummary, SimulationConfig, SimulationEngine, SimulationError, StepReport};
