/*!
 * Simulation Invariant Tests
 * Random workloads must never corrupt memory under any strategy
 */

use ahash::AHashMap;
use memsim::core::limits::{MEM_SIZE, RESERVED_SIZE};
use memsim::memory::{MemorySnapshot, UnitState};
use memsim::simulation::{SimulationConfig, SimulationEngine, SimulationError, StepReport};
use memsim::{PlacementStrategy, Process, ProcessId};
use proptest::prelude::*;

/// (size, arrival, lifetime) triples turned into processes P0, P1, ...
fn workload() -> impl Strategy<Value = Vec<Process>> {
    prop::collection::vec((1usize..=160, 0i64..40, 1i64..40), 1..24).prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(index, (size, arrival, lifetime))| {
                let id = ProcessId::new(format!("P{index}")).unwrap();
                Process::new(id, size, arrival, arrival + lifetime).unwrap()
            })
            .collect()
    })
}

/// Each owner occupies exactly its declared size as one contiguous run
fn check_snapshot(
    snapshot: &MemorySnapshot,
    sizes: &AHashMap<ProcessId, usize>,
) -> Result<(), TestCaseError> {
    prop_assert_eq!(snapshot.units.len(), MEM_SIZE);
    for unit in &snapshot.units[..RESERVED_SIZE] {
        prop_assert!(unit.is_reserved());
    }

    let mut spans: AHashMap<&ProcessId, (usize, usize)> = AHashMap::new();
    for (address, unit) in snapshot.units.iter().enumerate().skip(RESERVED_SIZE) {
        if let UnitState::Owned(id) = unit {
            let span = spans.entry(id).or_insert((address, 0));
            prop_assert_eq!(span.0 + span.1, address, "{} is split", id);
            span.1 += 1;
        }
    }
    for (id, (_, len)) in spans {
        prop_assert_eq!(Some(&len), sizes.get(id));
    }
    Ok(())
}

fn run_collecting(
    strategy: PlacementStrategy,
    processes: Vec<Process>,
) -> (Vec<StepReport>, Result<(), SimulationError>) {
    let config = SimulationConfig::default().with_verify_invariants(true);
    let mut engine = SimulationEngine::with_config(strategy, processes, config).unwrap();
    let mut steps = Vec::new();
    let outcome = engine.run_with(|step| steps.push(step.clone())).map(|_| ());
    (steps, outcome)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_memory_stays_consistent(processes in workload()) {
        let sizes: AHashMap<ProcessId, usize> = processes
            .iter()
            .map(|p| (p.id().clone(), p.size()))
            .collect();

        for strategy in PlacementStrategy::ALL {
            let (steps, outcome) = run_collecting(strategy, processes.clone());
            match outcome {
                Ok(()) | Err(SimulationError::OutOfMemory { .. }) => {}
                Err(other) => return Err(TestCaseError::fail(format!("{strategy}: {other}"))),
            }

            let mut last_time = i64::MIN;
            for step in &steps {
                prop_assert!(step.time > last_time);
                last_time = step.time;
                check_snapshot(&step.snapshot, &sizes)?;
            }
        }
    }

    #[test]
    fn test_strategies_agree_on_roomy_workloads(
        sizes in prop::collection::vec(1usize..=20, 1..20)
    ) {
        // Everything fits at once, so no strategy should ever compact
        let processes: Vec<Process> = sizes
            .iter()
            .enumerate()
            .map(|(index, &size)| {
                let id = ProcessId::new(format!("P{index}")).unwrap();
                Process::new(id, size, index as i64, 100).unwrap()
            })
            .collect();

        for strategy in PlacementStrategy::ALL {
            let (steps, outcome) = run_collecting(strategy, processes.clone());
            prop_assert!(outcome.is_ok());
            prop_assert!(steps.iter().all(|s| s.compactions.is_empty()));
        }
    }
}
