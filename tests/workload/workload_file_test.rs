/*!
 * Workload File Tests
 * Loading text and JSON workloads from disk and running them end to end
 */

use memsim::process::{load_workload, WorkloadError};
use memsim::simulation::render_step;
use memsim::{PlacementStrategy, SimulationEngine};
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::{Builder, NamedTempFile};

const TEXT_WORKLOAD: &str = "\
# three processes
3
A 45 0 350
B 28 0 2650
C 58 0 950
";

fn write_temp(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_text_workload() {
    let file = write_temp(".txt", TEXT_WORKLOAD);
    let processes = load_workload(file.path()).unwrap();
    let sizes: Vec<usize> = processes.iter().map(|p| p.size()).collect();
    assert_eq!(sizes, vec![45, 28, 58]);
}

#[test]
fn test_load_json_workload_by_extension() {
    let file = write_temp(
        ".json",
        r#"{"processes": [{"id": "A", "size": 45, "arrival": 0, "departure": 350}]}"#,
    );
    let processes = load_workload(file.path()).unwrap();
    assert_eq!(processes.len(), 1);
    assert_eq!(processes[0].departure(), 350);
}

#[test]
fn test_text_content_in_json_file_is_rejected() {
    let file = write_temp(".json", TEXT_WORKLOAD);
    assert!(matches!(load_workload(file.path()), Err(WorkloadError::Json(_))));
}

#[test]
fn test_missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.txt");
    match load_workload(&path) {
        Err(WorkloadError::Io { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected Io error, got {other:?}"),
    }
}

#[test]
fn test_loaded_workload_runs_to_completion() {
    let file = write_temp(".txt", TEXT_WORKLOAD);
    let processes = load_workload(file.path()).unwrap();

    for strategy in PlacementStrategy::ALL {
        let mut engine = SimulationEngine::new(strategy, processes.clone()).unwrap();
        let summary = engine.run().unwrap();
        assert_eq!(summary.final_time, 2650);

        let first = render_step(&summary.steps[0]);
        let lines: Vec<&str> = first.lines().collect();
        assert_eq!(lines[0], "Memory at time 0:");
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[1], "#".repeat(80));
        assert!(lines[2].starts_with(&format!("{}{}", "A".repeat(45), "B".repeat(28))));
    }
}
