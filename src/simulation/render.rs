/*!
 * Console Rendering
 * Text and JSON-lines output for step reports
 */

use super::types::{Admission, SimulationError, StepReport};
use crate::core::limits::ROW_WIDTH;
use crate::core::types::Time;
use crate::memory::{CompactionReport, MemorySnapshot};
use serde::Serialize;
use std::fmt::Write as _;

/// Printed once a run has no events left
pub const FINISHED_MESSAGE: &str = "No more events to process... ending this simulation!";

/// `Memory at time T:` followed by the grid
pub fn render_snapshot(snapshot: &MemorySnapshot) -> String {
    let mut out = format!("Memory at time {}:", snapshot.time);
    for row in snapshot.rows(ROW_WIDTH) {
        out.push('\n');
        out.push_str(&row);
    }
    out
}

pub fn render_compaction(report: &CompactionReport) -> String {
    format!(
        "Performing defragmentation...\nDefragmentation completed.\n{}",
        report
    )
}

/// Compaction passes of the step, then its snapshot
pub fn render_step(step: &StepReport) -> String {
    let mut out = String::new();
    for report in &step.compactions {
        let _ = writeln!(out, "{}", render_compaction(report));
    }
    out.push_str(&render_snapshot(&step.snapshot));
    out
}

/// Console text for a fatal simulation error, compaction output included
pub fn render_failure(err: &SimulationError) -> String {
    match err {
        SimulationError::OutOfMemory { compaction, .. } => {
            format!("{}\n{}", render_compaction(compaction), err)
        }
        other => other.to_string(),
    }
}

#[derive(Serialize)]
struct JsonStep<'a> {
    time: Time,
    departed: Vec<&'a str>,
    admitted: &'a [Admission],
    compactions: &'a [CompactionReport],
    rows: Vec<String>,
}

/// One JSON object per step, grid included as rows of glyphs
pub fn step_to_json(step: &StepReport) -> serde_json::Result<String> {
    serde_json::to_string(&JsonStep {
        time: step.time,
        departed: step.departed.iter().map(|id| id.as_str()).collect(),
        admitted: &step.admitted,
        compactions: &step.compactions,
        rows: step.snapshot.rows(ROW_WIDTH),
    })
}
