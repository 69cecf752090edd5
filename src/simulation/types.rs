/*!
 * Simulation Types
 * Step reports, run summaries and simulation errors
 */

use crate::core::types::{Address, ProcessId, Size, Time};
use crate::memory::{CompactionReport, MemoryError, MemorySnapshot, PlacementStrategy};
use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

/// Simulation operation result
pub type SimulationResult<T> = Result<T, SimulationError>;

/// Simulation errors
#[derive(Error, Debug, Clone, Diagnostic)]
pub enum SimulationError {
    #[error(
        "Out of memory at time {time}: process {id} needs {requested} units, \
         {free} free after compaction (largest run {largest_run})"
    )]
    #[diagnostic(
        code(simulation::out_of_memory),
        help("The workload needs more memory than the region has left. The run cannot continue.")
    )]
    OutOfMemory {
        id: ProcessId,
        requested: Size,
        free: Size,
        largest_run: Size,
        time: Time,
        /// The compaction pass that ran just before giving up
        compaction: Box<CompactionReport>,
    },

    #[error("Simulation halted after a fatal error")]
    #[diagnostic(
        code(simulation::halted),
        help("Create a new engine to start another run.")
    )]
    Halted,

    #[error("Memory invariant violated: {0}")]
    #[diagnostic(code(simulation::invariant))]
    Invariant(#[from] MemoryError),
}

/// Successful placement of an arriving process
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Admission {
    pub id: ProcessId,
    pub offset: Address,
    pub size: Size,
    /// Whether compaction was needed before the slot was found
    pub after_compaction: bool,
}

/// Everything that happened at one event time
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub time: Time,
    pub departed: Vec<ProcessId>,
    pub admitted: Vec<Admission>,
    pub compactions: Vec<CompactionReport>,
    pub snapshot: MemorySnapshot,
}

impl StepReport {
    /// Report for a time with no arrivals or departures
    pub fn idle(snapshot: MemorySnapshot) -> Self {
        Self {
            time: snapshot.time,
            departed: Vec::new(),
            admitted: Vec::new(),
            compactions: Vec::new(),
            snapshot,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.departed.is_empty() && self.admitted.is_empty()
    }
}

/// Counters accumulated over a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SimulationStats {
    /// Event times processed
    pub event_steps: usize,
    /// Empty time steps skipped by fast-forwarding
    pub skipped_steps: u64,
    pub admitted: usize,
    pub departed: usize,
    pub compactions: usize,
    pub units_relocated: usize,
    pub peak_used_units: Size,
}

/// Result of running a workload to completion
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub strategy: PlacementStrategy,
    pub final_time: Time,
    pub steps: Vec<StepReport>,
    pub stats: SimulationStats,
}
