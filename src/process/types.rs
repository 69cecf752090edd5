/*!
 * Process Types
 * Process descriptors and their validation
 */

use crate::core::types::{ProcessId, Size, Time};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Process operation result
pub type ProcessResult<T> = Result<T, ProcessError>;

/// Process errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum ProcessError {
    #[error("Invalid process identifier '{0}'")]
    #[diagnostic(
        code(process::invalid_id),
        help("Identifiers must be non-empty and contain no whitespace.")
    )]
    InvalidId(String),

    #[error("Process {id} has invalid size {size}")]
    #[diagnostic(code(process::invalid_size), help("Sizes must be at least one unit."))]
    InvalidSize { id: ProcessId, size: Size },

    #[error("Process {id} arrives at negative time {arrival}")]
    #[diagnostic(code(process::invalid_arrival))]
    InvalidArrival { id: ProcessId, arrival: Time },

    #[error("Process {id} departs at {departure}, not after its arrival at {arrival}")]
    #[diagnostic(
        code(process::invalid_lifetime),
        help("Departure time must be strictly greater than arrival time.")
    )]
    InvalidLifetime {
        id: ProcessId,
        arrival: Time,
        departure: Time,
    },

    #[error("Duplicate process identifier {0}")]
    #[diagnostic(
        code(process::duplicate_id),
        help("Each process in a workload needs its own identifier.")
    )]
    DuplicateId(ProcessId),
}

/// Lifecycle state while tracked by the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    /// Arrival time not reached yet
    Pending,
    /// Admitted and holding memory
    Resident,
}

/// Immutable process descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Process {
    id: ProcessId,
    size: Size,
    arrival: Time,
    departure: Time,
}

impl Process {
    pub fn new(id: ProcessId, size: Size, arrival: Time, departure: Time) -> ProcessResult<Self> {
        if size == 0 {
            return Err(ProcessError::InvalidSize { id, size });
        }
        if arrival < 0 {
            return Err(ProcessError::InvalidArrival { id, arrival });
        }
        if departure <= arrival {
            return Err(ProcessError::InvalidLifetime {
                id,
                arrival,
                departure,
            });
        }
        Ok(Self {
            id,
            size,
            arrival,
            departure,
        })
    }

    #[inline]
    pub fn id(&self) -> &ProcessId {
        &self.id
    }

    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    #[inline]
    pub fn arrival(&self) -> Time {
        self.arrival
    }

    #[inline]
    pub fn departure(&self) -> Time {
        self.departure
    }

    /// Whether this process arrives or departs at `time`
    #[inline]
    pub fn has_event_at(&self, time: Time) -> bool {
        self.arrival == time || self.departure == time
    }
}
