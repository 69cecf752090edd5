/*!
 * Simulation Module
 * Event loop, run configuration and output rendering
 */

pub mod config;
pub mod engine;
pub mod render;
pub mod types;

// Re-export public API
pub use config::{ConfigError, SimulationConfig};
pub use engine::SimulationEngine;
pub use render::{render_compaction, render_failure, render_snapshot, render_step, step_to_json, FINISHED_MESSAGE};
pub use types::{
    Admission, RunSummary, SimulationError, SimulationResult, SimulationStats, StepReport,
};
