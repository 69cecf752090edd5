/*!
 * Simulation Engine
 * Discrete-time event loop driving admissions, evictions and compaction
 *
 * At every event time all departures are processed before any arrival, so
 * memory released in a step is available to processes arriving in that step.
 * Times with no events are skipped without side effects.
 */

use super::config::SimulationConfig;
use super::types::{
    Admission, RunSummary, SimulationError, SimulationResult, SimulationStats, StepReport,
};
use crate::core::limits::START_TIME;
use crate::core::types::{Address, ProcessId, Time};
use crate::memory::{
    CompactionReport, Compactor, MemoryRegion, MemorySnapshot, Placement, PlacementStrategy,
};
use crate::process::{Process, ProcessRegistry, ProcessResult};
use tracing::{debug, error, info, instrument, warn};

/// Per-step chatter: INFO when the run is verbose, DEBUG otherwise
macro_rules! chatter {
    ($verbose:expr, $($arg:tt)+) => {
        if $verbose {
            info!($($arg)+)
        } else {
            debug!($($arg)+)
        }
    };
}

/// Memory allocation simulator
pub struct SimulationEngine {
    config: SimulationConfig,
    current_time: Time,
    region: MemoryRegion,
    registry: ProcessRegistry,
    strategy: Box<dyn Placement>,
    compactor: Compactor,
    stats: SimulationStats,
    halted: bool,
}

impl SimulationEngine {
    /// Create an engine over the standard memory geometry
    pub fn new(
        strategy: PlacementStrategy,
        processes: impl IntoIterator<Item = Process>,
    ) -> ProcessResult<Self> {
        Self::with_config(strategy, processes, SimulationConfig::default())
    }

    pub fn with_config(
        strategy: PlacementStrategy,
        processes: impl IntoIterator<Item = Process>,
        config: SimulationConfig,
    ) -> ProcessResult<Self> {
        Self::with_region(strategy, processes, config, MemoryRegion::new())
    }

    /// Create an engine over a caller-supplied region (useful for testing)
    pub fn with_region(
        strategy: PlacementStrategy,
        processes: impl IntoIterator<Item = Process>,
        config: SimulationConfig,
        region: MemoryRegion,
    ) -> ProcessResult<Self> {
        let registry = ProcessRegistry::from_processes(processes)?;

        for process in registry.iter() {
            chatter!(
                config.verbose,
                "Process {} (size {}) start {} end {}",
                process.id(),
                process.size(),
                process.arrival(),
                process.departure()
            );
        }
        info!(
            "Simulation initialized: strategy={}, processes={}, memory={} units ({} reserved)",
            strategy,
            registry.len(),
            region.capacity(),
            region.reserved()
        );

        Ok(Self {
            strategy: strategy.build(&region),
            config,
            current_time: START_TIME,
            region,
            registry,
            compactor: Compactor::new(),
            stats: SimulationStats::default(),
            halted: false,
        })
    }

    #[inline]
    pub fn current_time(&self) -> Time {
        self.current_time
    }

    #[inline]
    pub fn region(&self) -> &MemoryRegion {
        &self.region
    }

    #[inline]
    pub fn registry(&self) -> &ProcessRegistry {
        &self.registry
    }

    #[inline]
    pub fn strategy(&self) -> PlacementStrategy {
        self.strategy.kind()
    }

    #[inline]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    #[inline]
    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    /// No process has an arrival or departure left
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.registry.is_empty()
    }

    #[inline]
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Earliest scheduled event after the current time
    pub fn next_event_time(&self) -> Option<Time> {
        self.registry.next_event_after(self.current_time)
    }

    pub fn snapshot(&self) -> MemorySnapshot {
        self.region.snapshot(self.current_time)
    }

    /// Move time forward to `target`, processing every event time on the way
    ///
    /// Returns one report per event time reached. Empty times are skipped
    /// without producing anything. A fatal error halts the engine.
    pub fn advance_to(&mut self, target: Time) -> SimulationResult<Vec<StepReport>> {
        if self.halted {
            return Err(SimulationError::Halted);
        }

        let mut reports = Vec::new();
        while self.current_time < target {
            let from = self.current_time + 1;
            self.current_time = match self.registry.next_event_after(self.current_time) {
                Some(event) if event < target => event,
                _ => target,
            };
            if self.current_time > from {
                self.stats.skipped_steps += (self.current_time - from) as u64;
                chatter!(
                    self.config.verbose,
                    "Fast-forwarding past boring times {}..{}",
                    from,
                    self.current_time
                );
            }

            match self.process_step() {
                Ok(Some(report)) => reports.push(report),
                Ok(None) => {}
                Err(err) => {
                    self.halted = true;
                    return Err(err);
                }
            }
        }
        Ok(reports)
    }

    /// Run until no events remain
    pub fn run(&mut self) -> SimulationResult<RunSummary> {
        self.run_with(|_| {})
    }

    /// Run until no events remain, handing each step to `on_step` as it happens
    ///
    /// Time 0 is always reported, even when nothing happens then.
    #[instrument(level = "debug", skip_all, fields(strategy = %self.strategy.kind()))]
    pub fn run_with<F>(&mut self, mut on_step: F) -> SimulationResult<RunSummary>
    where
        F: FnMut(&StepReport),
    {
        let mut steps = Vec::new();

        if self.current_time < 0 {
            let mut initial = self.advance_to(0)?;
            if initial.is_empty() {
                initial.push(StepReport::idle(self.snapshot()));
            }
            for step in initial {
                on_step(&step);
                steps.push(step);
            }
        }

        while let Some(next) = self.next_event_time() {
            for step in self.advance_to(next)? {
                on_step(&step);
                steps.push(step);
            }
        }

        info!(
            "No more events: {} finished at time {} ({} admitted, {} compactions)",
            self.strategy.kind(),
            self.current_time,
            self.stats.admitted,
            self.stats.compactions
        );

        Ok(RunSummary {
            strategy: self.strategy.kind(),
            final_time: self.current_time,
            steps,
            stats: self.stats.clone(),
        })
    }

    fn process_step(&mut self) -> SimulationResult<Option<StepReport>> {
        let time = self.current_time;
        if !self.registry.has_event_at(time) {
            return Ok(None);
        }
        chatter!(self.config.verbose, "=========== TIME IS NOW {} ============", time);

        let departed = self.evict_departures(time);

        let mut admitted = Vec::new();
        let mut compactions = Vec::new();
        for process in self.registry.arriving_at(time) {
            chatter!(self.config.verbose, "Adding process {}", process.id());
            admitted.push(self.admit(&process, &mut compactions)?);
        }

        if self.config.verify_invariants {
            self.region.verify()?;
        }

        let used = self.region.used_units();
        self.stats.event_steps += 1;
        self.stats.peak_used_units = self.stats.peak_used_units.max(used);

        let pressure = self.region.stats().memory_pressure();
        debug!(
            time,
            used,
            resident = self.registry.resident_count(),
            pending = self.registry.pending_count(),
            %pressure,
            "Step complete"
        );

        Ok(Some(StepReport {
            time,
            departed,
            admitted,
            compactions,
            snapshot: self.region.snapshot(time),
        }))
    }

    fn evict_departures(&mut self, time: Time) -> Vec<ProcessId> {
        let mut departed = Vec::new();
        for process in self.registry.departing_at(time) {
            chatter!(self.config.verbose, "Removing process {}", process.id());
            let reclaimed = self.region.free(process.id());
            debug_assert_eq!(reclaimed, process.size(), "departing process held wrong size");
            if reclaimed != process.size() {
                warn!(
                    "Process {} released {} units but declared {}",
                    process.id(),
                    reclaimed,
                    process.size()
                );
            }
            self.registry.remove(process.id());
            self.stats.departed += 1;
            departed.push(process.id().clone());
        }
        departed
    }

    /// Place one arriving process, compacting once on failure
    fn admit(
        &mut self,
        process: &Process,
        compactions: &mut Vec<CompactionReport>,
    ) -> SimulationResult<Admission> {
        let size = process.size();
        let mut after_compaction = false;

        let offset: Address = match self.strategy.find_slot(&self.region, size) {
            Some(offset) => offset,
            None => {
                info!(
                    "No slot for process {} ({} units, {} free), compacting",
                    process.id(),
                    size,
                    self.region.free_units()
                );
                let report = self.compactor.compact(&mut self.region);
                self.stats.compactions += 1;
                self.stats.units_relocated += report.units_moved;
                compactions.push(report.clone());
                after_compaction = true;

                match self.strategy.find_slot(&self.region, size) {
                    Some(offset) => offset,
                    None => {
                        let free = self.region.free_units();
                        let largest_run = self.region.largest_free_run().map_or(0, |r| r.len);
                        error!(
                            "OOM at time {}: process {} requested {} units, only {} free after compaction",
                            self.current_time,
                            process.id(),
                            size,
                            free
                        );
                        return Err(SimulationError::OutOfMemory {
                            id: process.id().clone(),
                            requested: size,
                            free,
                            largest_run,
                            time: self.current_time,
                            compaction: Box::new(report),
                        });
                    }
                }
            }
        };

        chatter!(
            self.config.verbose,
            "Got a target slot of {} for pid {}",
            offset,
            process.id()
        );
        self.region.allocate(offset, size, process.id())?;
        self.registry.mark_resident(process.id());
        self.stats.admitted += 1;

        Ok(Admission {
            id: process.id().clone(),
            offset,
            size,
            after_compaction,
        })
    }
}

impl std::fmt::Debug for SimulationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationEngine")
            .field("strategy", &self.strategy)
            .field("current_time", &self.current_time)
            .field("tracked", &self.registry.len())
            .field("halted", &self.halted)
            .finish()
    }
}
