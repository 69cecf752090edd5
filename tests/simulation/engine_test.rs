/*!
 * Simulation Engine Tests
 * Event ordering, fast-forwarding, compaction fallback and fatal exhaustion
 */

use memsim::core::types::Time;
use memsim::simulation::{SimulationConfig, SimulationEngine, SimulationError};
use memsim::{PlacementStrategy, Process, ProcessId, Span};
use pretty_assertions::assert_eq;

fn pid(s: &str) -> ProcessId {
    ProcessId::new(s).unwrap()
}

fn proc(id: &str, size: usize, arrival: Time, departure: Time) -> Process {
    Process::new(pid(id), size, arrival, departure).unwrap()
}

fn engine(strategy: PlacementStrategy, processes: Vec<Process>) -> SimulationEngine {
    let config = SimulationConfig::default().with_verify_invariants(true);
    SimulationEngine::with_config(strategy, processes, config).unwrap()
}

#[test]
fn test_departures_precede_arrivals_in_same_step() {
    let mut sim = engine(
        PlacementStrategy::FirstFit,
        vec![proc("A", 480, 0, 5), proc("B", 480, 5, 10)],
    );

    let steps = sim.advance_to(5).unwrap();
    let last = steps.last().unwrap();
    assert_eq!(last.time, 5);
    assert_eq!(last.departed, vec![pid("A")]);
    assert_eq!(last.admitted.len(), 1);
    assert_eq!(last.admitted[0].id, pid("B"));
    assert_eq!(last.admitted[0].offset, 80);
    assert!(last.compactions.is_empty());
    assert_eq!(sim.region().owned_run(&pid("B")), Some(Span::new(80, 480)));
}

#[test]
fn test_fast_forward_emits_only_event_steps() {
    let mut sim = engine(PlacementStrategy::FirstFit, vec![proc("A", 10, 10, 95)]);

    assert!(sim.advance_to(0).unwrap().is_empty());
    let steps = sim.advance_to(100).unwrap();

    let times: Vec<Time> = steps.iter().map(|s| s.time).collect();
    assert_eq!(times, vec![10, 95]);
    assert_eq!(sim.current_time(), 100);
    assert!(sim.is_finished());
    assert_eq!(sim.stats().event_steps, 2);
}

#[test]
fn test_advance_stops_at_target_before_next_event() {
    let mut sim = engine(PlacementStrategy::FirstFit, vec![proc("A", 10, 10, 95)]);
    sim.advance_to(50).unwrap();
    assert_eq!(sim.current_time(), 50);
    assert_eq!(sim.next_event_time(), Some(95));
    assert_eq!(sim.region().used_units(), 10);
}

#[test]
fn test_arrivals_admitted_in_identifier_order() {
    let mut sim = engine(
        PlacementStrategy::FirstFit,
        vec![proc("C", 10, 1, 9), proc("A", 10, 1, 9), proc("B", 10, 1, 9)],
    );
    let steps = sim.advance_to(1).unwrap();
    let order: Vec<(&str, usize)> = steps[0]
        .admitted
        .iter()
        .map(|a| (a.id.as_str(), a.offset))
        .collect();
    assert_eq!(order, vec![("A", 80), ("B", 90), ("C", 100)]);
}

#[test]
fn test_compaction_fallback_admits_process() {
    let mut sim = engine(
        PlacementStrategy::FirstFit,
        vec![
            proc("A", 100, 0, 20),
            proc("B", 200, 0, 50),
            proc("C", 100, 0, 50),
            proc("D", 150, 20, 60),
        ],
    );

    let steps = sim.advance_to(20).unwrap();
    let step = steps.last().unwrap();
    assert_eq!(step.time, 20);
    assert_eq!(step.departed, vec![pid("A")]);
    assert_eq!(step.compactions.len(), 1);

    let report = &step.compactions[0];
    assert_eq!(report.relocated, vec![pid("B"), pid("C")]);
    assert_eq!(report.free_block_size, 180);
    assert_eq!(format!("{:.2}", report.free_percentage()), "32.14");

    assert_eq!(step.admitted[0].offset, 380);
    assert!(step.admitted[0].after_compaction);
    assert_eq!(sim.region().owned_run(&pid("B")), Some(Span::new(80, 200)));
    assert_eq!(sim.stats().compactions, 1);
}

#[test]
fn test_out_of_memory_is_fatal() {
    let mut sim = engine(
        PlacementStrategy::BestFit,
        vec![proc("A", 300, 0, 50), proc("B", 200, 1, 10)],
    );

    let err = sim.advance_to(10).unwrap_err();
    match err {
        SimulationError::OutOfMemory {
            id,
            requested,
            free,
            largest_run,
            time,
            compaction,
        } => {
            assert_eq!(id, pid("B"));
            assert_eq!(requested, 200);
            assert_eq!(free, 180);
            assert_eq!(largest_run, 180);
            assert_eq!(time, 1);
            assert_eq!(compaction.relocated_count(), 0);
        }
        other => panic!("expected OutOfMemory, got {other:?}"),
    }
    assert!(sim.is_halted());
    assert!(matches!(sim.run(), Err(SimulationError::Halted)));
}

#[test]
fn test_request_larger_than_memory_fails_without_hanging() {
    let mut sim = engine(PlacementStrategy::WorstFit, vec![proc("A", 10_000, 0, 1)]);
    assert!(matches!(sim.run(), Err(SimulationError::OutOfMemory { .. })));
}

#[test]
fn test_run_reports_time_zero_and_all_events() {
    let mut sim = engine(
        PlacementStrategy::NextFit,
        vec![proc("A", 45, 3, 350), proc("B", 28, 3, 200), proc("C", 58, 100, 950)],
    );
    let summary = sim.run().unwrap();

    let times: Vec<Time> = summary.steps.iter().map(|s| s.time).collect();
    assert_eq!(times, vec![0, 3, 100, 200, 350, 950]);
    assert!(summary.steps[0].is_idle());
    assert_eq!(summary.final_time, 950);
    assert_eq!(summary.stats.admitted, 3);
    assert_eq!(summary.stats.departed, 3);
    assert_eq!(summary.strategy, PlacementStrategy::NextFit);
    assert_eq!(sim.region().used_units(), 0);
}

#[test]
fn test_run_with_streams_steps() {
    let mut sim = engine(PlacementStrategy::FirstFit, vec![proc("A", 5, 0, 2)]);
    let mut seen = Vec::new();
    let summary = sim.run_with(|step| seen.push(step.time)).unwrap();
    assert_eq!(seen, vec![0, 2]);
    assert_eq!(summary.steps.len(), 2);
}

#[test]
fn test_next_fit_and_first_fit_diverge() {
    // A leaves a hole at the bottom; next-fit keeps going from its cursor
    let workload = || {
        vec![
            proc("A", 50, 0, 5),
            proc("B", 50, 1, 100),
            proc("C", 20, 6, 100),
        ]
    };

    let mut first = engine(PlacementStrategy::FirstFit, workload());
    first.advance_to(6).unwrap();
    assert_eq!(first.region().owned_run(&pid("C")).map(|s| s.offset), Some(80));

    let mut next = engine(PlacementStrategy::NextFit, workload());
    next.advance_to(6).unwrap();
    assert_eq!(next.region().owned_run(&pid("C")).map(|s| s.offset), Some(180));
}

#[test]
fn test_best_fit_and_worst_fit_diverge() {
    let workload = || {
        vec![
            proc("A", 20, 0, 5),
            proc("H", 30, 0, 100),
            proc("B", 10, 6, 100),
        ]
    };
    // After A leaves: free runs [80, 100) and [130, 560)

    let mut best = engine(PlacementStrategy::BestFit, workload());
    best.advance_to(6).unwrap();
    assert_eq!(best.region().owned_run(&pid("B")).map(|s| s.offset), Some(80));

    let mut worst = engine(PlacementStrategy::WorstFit, workload());
    worst.advance_to(6).unwrap();
    assert_eq!(worst.region().owned_run(&pid("B")).map(|s| s.offset), Some(130));
}

#[test]
fn test_duplicate_ids_rejected_at_construction() {
    let result = SimulationEngine::new(
        PlacementStrategy::FirstFit,
        vec![proc("A", 5, 0, 2), proc("A", 5, 3, 4)],
    );
    assert!(result.is_err());
}
