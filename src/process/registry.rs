/*!
 * Process Registry
 * Processes with arrivals or departures still ahead, ordered by arrival then id
 */

use super::types::{Process, ProcessError, ProcessResult, ProcessState};
use crate::core::types::{ProcessId, Time};
use ahash::AHashSet;

#[derive(Debug, Clone)]
struct Entry {
    process: Process,
    state: ProcessState,
}

impl Entry {
    #[inline]
    fn sort_key(&self) -> (Time, &ProcessId) {
        (self.process.arrival(), self.process.id())
    }
}

/// Registry of pending and resident processes
#[derive(Debug, Clone, Default)]
pub struct ProcessRegistry {
    entries: Vec<Entry>,
}

impl ProcessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a workload, rejecting duplicate identifiers
    pub fn from_processes(processes: impl IntoIterator<Item = Process>) -> ProcessResult<Self> {
        let mut seen = AHashSet::new();
        let mut entries = Vec::new();
        for process in processes {
            if !seen.insert(process.id().clone()) {
                return Err(ProcessError::DuplicateId(process.id().clone()));
            }
            entries.push(Entry {
                process,
                state: ProcessState::Pending,
            });
        }
        entries.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        Ok(Self { entries })
    }

    /// Add one pending process, keeping arrival/id order
    pub fn insert(&mut self, process: Process) -> ProcessResult<()> {
        if self.contains(process.id()) {
            return Err(ProcessError::DuplicateId(process.id().clone()));
        }
        let entry = Entry {
            process,
            state: ProcessState::Pending,
        };
        let index = self
            .entries
            .partition_point(|e| e.sort_key() < entry.sort_key());
        self.entries.insert(index, entry);
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &ProcessId) -> bool {
        self.entries.iter().any(|e| e.process.id() == id)
    }

    /// Processes in arrival/id order
    pub fn iter(&self) -> impl Iterator<Item = &Process> {
        self.entries.iter().map(|e| &e.process)
    }

    pub fn pending_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.state == ProcessState::Pending)
            .count()
    }

    pub fn resident_count(&self) -> usize {
        self.len() - self.pending_count()
    }

    /// Whether any tracked process arrives or departs at `time`
    pub fn has_event_at(&self, time: Time) -> bool {
        self.entries.iter().any(|e| e.process.has_event_at(time))
    }

    /// Earliest arrival or departure strictly after `time`
    pub fn next_event_after(&self, time: Time) -> Option<Time> {
        self.entries
            .iter()
            .flat_map(|e| [e.process.arrival(), e.process.departure()])
            .filter(|&t| t > time)
            .min()
    }

    /// Processes departing at `time`, in identifier order
    pub fn departing_at(&self, time: Time) -> Vec<Process> {
        let mut leaving: Vec<Process> = self
            .entries
            .iter()
            .filter(|e| e.process.departure() == time)
            .map(|e| e.process.clone())
            .collect();
        leaving.sort_by(|a, b| a.id().cmp(b.id()));
        leaving
    }

    /// Pending processes arriving at `time`, in identifier order
    pub fn arriving_at(&self, time: Time) -> Vec<Process> {
        // Entries are sorted by (arrival, id) so this is already id-ordered
        self.entries
            .iter()
            .filter(|e| e.state == ProcessState::Pending && e.process.arrival() == time)
            .map(|e| e.process.clone())
            .collect()
    }

    /// Flag a process as admitted; false when it is unknown
    pub fn mark_resident(&mut self, id: &ProcessId) -> bool {
        match self.entries.iter_mut().find(|e| e.process.id() == id) {
            Some(entry) => {
                entry.state = ProcessState::Resident;
                true
            }
            None => false,
        }
    }

    /// Drop a process for good
    pub fn remove(&mut self, id: &ProcessId) -> Option<Process> {
        let index = self.entries.iter().position(|e| e.process.id() == id)?;
        Some(self.entries.remove(index).process)
    }
}
