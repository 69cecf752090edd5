/*!
 * Core Types
 * Common types used across the simulator
 */

use crate::process::{ProcessError, ProcessResult};
use serde::{Deserialize, Serialize};
use smartstring::alias::String as SmartString;
use std::fmt;
use std::str::FromStr;

/// Offset of a unit inside the memory region
pub type Address = usize;

/// Number of memory units
pub type Size = usize;

/// Discrete simulation time step
///
/// Signed so the engine can sit one step before time 0 until it first advances.
pub type Time = i64;

/// Process identifier
///
/// Identifiers are short strings stored inline (no heap allocation for ≤23 bytes).
/// Only the first character is used when a unit is drawn on the console, so two
/// identifiers sharing a glyph remain distinct owners in memory.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProcessId(SmartString);

impl ProcessId {
    /// Create an identifier, rejecting empty strings and embedded whitespace
    pub fn new(id: impl AsRef<str>) -> ProcessResult<Self> {
        let id = id.as_ref();
        if id.is_empty() || id.chars().any(char::is_whitespace) {
            return Err(ProcessError::InvalidId(id.to_string()));
        }
        Ok(Self(SmartString::from(id)))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Single display symbol for grid rendering
    #[inline]
    pub fn glyph(&self) -> char {
        // Construction guarantees at least one character
        self.0.chars().next().unwrap_or('?')
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProcessId {
    type Err = ProcessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ProcessId {
    type Error = ProcessError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProcessId> for String {
    fn from(id: ProcessId) -> Self {
        id.0.into()
    }
}

/// Half-open run of units `[offset, offset + len)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub offset: Address,
    pub len: Size,
}

impl Span {
    #[inline]
    pub const fn new(offset: Address, len: Size) -> Self {
        Self { offset, len }
    }

    /// First address past the run
    #[inline]
    pub const fn end(&self) -> Address {
        self.offset + self.len
    }

    #[inline]
    pub const fn fits(&self, size: Size) -> bool {
        size > 0 && self.len >= size
    }
}
