/*!
 * Placement Strategies
 * First-fit, next-fit, best-fit and worst-fit selection over free runs
 */

mod best_fit;
mod first_fit;
mod next_fit;
mod worst_fit;

pub use best_fit::BestFit;
pub use first_fit::FirstFit;
pub use next_fit::NextFit;
pub use worst_fit::WorstFit;

use super::region::MemoryRegion;
use super::traits::Placement;
use crate::core::types::{Address, Size};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Placement strategy selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlacementStrategy {
    /// Lowest-address run that is large enough
    FirstFit,
    /// Like first-fit, but resumes from the previous allocation
    NextFit,
    /// Smallest run that is large enough
    BestFit,
    /// Largest run
    WorstFit,
}

impl PlacementStrategy {
    /// Every strategy, in menu order
    pub const ALL: [PlacementStrategy; 4] = [
        PlacementStrategy::FirstFit,
        PlacementStrategy::NextFit,
        PlacementStrategy::BestFit,
        PlacementStrategy::WorstFit,
    ];

    /// Convert to string representation
    #[inline(always)]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FirstFit => "first-fit",
            Self::NextFit => "next-fit",
            Self::BestFit => "best-fit",
            Self::WorstFit => "worst-fit",
        }
    }

    /// Human-readable name used in console banners
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::FirstFit => "First Fit",
            Self::NextFit => "Next Fit",
            Self::BestFit => "Best Fit",
            Self::WorstFit => "Worst Fit",
        }
    }

    /// Position in the interactive menu (1-based)
    pub fn from_menu_choice(choice: u32) -> Option<Self> {
        match choice {
            1..=4 => Some(Self::ALL[choice as usize - 1]),
            _ => None,
        }
    }

    /// Build a fresh strategy instance for `region`
    ///
    /// Next-fit starts its cursor at the first allocatable unit.
    pub fn build(&self, region: &MemoryRegion) -> Box<dyn Placement> {
        match self {
            Self::FirstFit => Box::new(FirstFit),
            Self::NextFit => Box::new(NextFit::new(region.user_start())),
            Self::BestFit => Box::new(BestFit),
            Self::WorstFit => Box::new(WorstFit),
        }
    }
}

impl FromStr for PlacementStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "first-fit" | "firstfit" | "first" | "ff" => Ok(Self::FirstFit),
            "next-fit" | "nextfit" | "next" | "nf" => Ok(Self::NextFit),
            "best-fit" | "bestfit" | "best" | "bf" => Ok(Self::BestFit),
            "worst-fit" | "worstfit" | "worst" | "wf" => Ok(Self::WorstFit),
            _ => Err(format!(
                "Invalid strategy '{}'. Valid: first-fit, next-fit, best-fit, worst-fit",
                s
            )),
        }
    }
}

impl fmt::Display for PlacementStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PlacementStrategy {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PlacementStrategy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Lowest offset at or after `start` that begins `size` contiguous free units
///
/// A run may begin at `start` even when `start` sits inside a larger free run.
pub(super) fn first_run_from(region: &MemoryRegion, start: Address, size: Size) -> Option<Address> {
    if size == 0 || size > region.capacity() {
        return None;
    }
    let units = region.units();
    let mut run_start: Option<Address> = None;

    for addr in start.max(region.user_start())..region.capacity() {
        if units[addr].is_free() {
            let begin = *run_start.get_or_insert(addr);
            if addr + 1 - begin >= size {
                return Some(begin);
            }
        } else {
            run_start = None;
        }
    }
    None
}
