/*!
 * Process Module
 * Process descriptors, the event registry, and workload loading
 */

pub mod registry;
pub mod types;
pub mod workload;

// Re-export public API
pub use registry::ProcessRegistry;
pub use types::{Process, ProcessError, ProcessResult, ProcessState};
pub use workload::{load_workload, parse_json_workload, parse_workload, WorkloadError, WorkloadResult};
