/*!
 * Error Types
 * Centralized error handling with thiserror and miette
 */

use super::limits::{EXIT_FAILURE, EXIT_OUT_OF_MEMORY};
use miette::Diagnostic;
use thiserror::Error;

// Re-export subsystem errors so callers can match on them from one place
pub use crate::memory::MemoryError;
pub use crate::process::{ProcessError, WorkloadError};
pub use crate::simulation::{ConfigError, SimulationError};

/// Unified simulator error type with miette diagnostics
#[derive(Error, Debug, Diagnostic)]
pub enum MemsimError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Memory(#[from] MemoryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Process(#[from] ProcessError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Workload(#[from] WorkloadError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Simulation(#[from] SimulationError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    #[diagnostic(
        code(memsim::io_error),
        help("Reading from the terminal or writing output failed.")
    )]
    Io(#[from] std::io::Error),
}

impl MemsimError {
    /// Process exit status for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            MemsimError::Simulation(SimulationError::OutOfMemory { .. }) => EXIT_OUT_OF_MEMORY,
            _ => EXIT_FAILURE,
        }
    }
}

/// Common result type for top-level operations
pub type MemsimResult<T> = Result<T, MemsimError>;
