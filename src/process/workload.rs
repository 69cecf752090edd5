/*!
 * Workload Loading
 * Parses workload descriptions into validated process descriptors
 *
 * Text format: the first significant line holds the process count, followed by
 * one `ID SIZE ARRIVAL DEPARTURE` line per process. Blank lines and lines
 * starting with `#` are ignored.
 *
 * JSON format (`.json` files):
 * `{"processes": [{"id": "A", "size": 45, "arrival": 0, "departure": 350}]}`
 */

use super::types::{Process, ProcessError};
use crate::core::types::{ProcessId, Size, Time};
use ahash::AHashSet;
use miette::Diagnostic;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Workload operation result
pub type WorkloadResult<T> = Result<T, WorkloadError>;

/// Workload errors
#[derive(Error, Debug, Diagnostic)]
pub enum WorkloadError {
    #[error("Cannot read workload {path}: {source}")]
    #[diagnostic(code(workload::io), help("Check that the file exists and is readable."))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Workload is empty: expected a process count on the first line")]
    #[diagnostic(code(workload::missing_count))]
    MissingCount,

    #[error("Workload declares {expected} processes but lists {found}")]
    #[diagnostic(
        code(workload::count_mismatch),
        help("The first line must equal the number of process lines that follow.")
    )]
    CountMismatch { expected: usize, found: usize },

    #[error("Line {line}: {reason}")]
    #[diagnostic(code(workload::malformed))]
    Malformed { line: usize, reason: String },

    #[error("Line {line}: {source}")]
    #[diagnostic(code(workload::invalid_process))]
    InvalidProcess {
        line: usize,
        #[source]
        source: ProcessError,
    },

    #[error("Invalid JSON workload: {0}")]
    #[diagnostic(code(workload::json))]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct WorkloadDocument {
    processes: Vec<ProcessRecord>,
}

#[derive(Debug, Deserialize)]
struct ProcessRecord {
    id: ProcessId,
    size: Size,
    arrival: Time,
    departure: Time,
}

/// Load a workload file, choosing the format by extension
pub fn load_workload(path: impl AsRef<Path>) -> WorkloadResult<Vec<Process>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| WorkloadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let is_json = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));
    let processes = if is_json {
        parse_json_workload(&text)?
    } else {
        parse_workload(&text)?
    };

    debug!(path = %path.display(), count = processes.len(), "Loaded workload");
    Ok(processes)
}

/// Parse the line-oriented text format
pub fn parse_workload(text: &str) -> WorkloadResult<Vec<Process>> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(index, raw)| (index + 1, raw.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'));

    let (count_line, count_text) = lines.next().ok_or(WorkloadError::MissingCount)?;
    let expected: usize = count_text.parse().map_err(|_| WorkloadError::Malformed {
        line: count_line,
        reason: format!("expected a process count, found '{}'", count_text),
    })?;

    let mut seen = AHashSet::new();
    // The declared count is untrusted until it matches the lines that follow
    let mut processes = Vec::new();
    for (line, content) in lines {
        let process = parse_process_line(line, content)?;
        if !seen.insert(process.id().clone()) {
            return Err(WorkloadError::InvalidProcess {
                line,
                source: ProcessError::DuplicateId(process.id().clone()),
            });
        }
        processes.push(process);
    }

    if processes.len() != expected {
        return Err(WorkloadError::CountMismatch {
            expected,
            found: processes.len(),
        });
    }
    Ok(processes)
}

/// Parse the JSON format
pub fn parse_json_workload(text: &str) -> WorkloadResult<Vec<Process>> {
    let document: WorkloadDocument = serde_json::from_str(text)?;
    let mut seen = AHashSet::new();

    document
        .processes
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            // Report the 1-based position in the array as the "line"
            let line = index + 1;
            if !seen.insert(record.id.clone()) {
                return Err(WorkloadError::InvalidProcess {
                    line,
                    source: ProcessError::DuplicateId(record.id),
                });
            }
            Process::new(record.id, record.size, record.arrival, record.departure)
                .map_err(|source| WorkloadError::InvalidProcess { line, source })
        })
        .collect()
}

fn parse_process_line(line: usize, content: &str) -> WorkloadResult<Process> {
    let fields: Vec<&str> = content.split_whitespace().collect();
    let [id, size, arrival, departure] = fields.as_slice() else {
        return Err(WorkloadError::Malformed {
            line,
            reason: format!(
                "expected 'ID SIZE ARRIVAL DEPARTURE', found {} fields",
                fields.len()
            ),
        });
    };

    let id = ProcessId::new(id).map_err(|source| WorkloadError::InvalidProcess { line, source })?;
    let size: Size = parse_field(line, "size", size)?;
    let arrival: Time = parse_field(line, "arrival time", arrival)?;
    let departure: Time = parse_field(line, "departure time", departure)?;

    Process::new(id, size, arrival, departure)
        .map_err(|source| WorkloadError::InvalidProcess { line, source })
}

fn parse_field<T: std::str::FromStr>(line: usize, name: &str, value: &str) -> WorkloadResult<T> {
    value.parse().map_err(|_| WorkloadError::Malformed {
        line,
        reason: format!("{} '{}' is not a valid number", name, value),
    })
}
