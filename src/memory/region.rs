/*!
 * Memory Region
 * Fixed-capacity linear address space with a reserved kernel prefix
 */

use super::types::{MemoryError, MemoryResult, MemorySnapshot, MemoryStats, UnitState};
use crate::core::limits::{MEM_SIZE, RESERVED_SIZE};
use crate::core::types::{Address, ProcessId, Size, Span, Time};
use ahash::AHashMap;

/// Simulated main memory
///
/// Every unit is exactly one of Reserved, Free or Owned. The first `reserved`
/// units are Reserved for the lifetime of the region and no operation touches them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryRegion {
    units: Vec<UnitState>,
    reserved: Size,
}

impl MemoryRegion {
    /// Region with the standard 560-unit geometry and 80-unit kernel prefix
    pub fn new() -> Self {
        Self::build(MEM_SIZE, RESERVED_SIZE)
    }

    /// Region with a custom geometry (useful for testing)
    pub fn with_geometry(capacity: Size, reserved: Size) -> MemoryResult<Self> {
        if capacity == 0 || reserved > capacity {
            return Err(MemoryError::InvalidGeometry { capacity, reserved });
        }
        Ok(Self::build(capacity, reserved))
    }

    fn build(capacity: Size, reserved: Size) -> Self {
        let mut units = vec![UnitState::Free; capacity];
        units[..reserved].fill(UnitState::Reserved);
        Self { units, reserved }
    }

    #[inline]
    pub fn capacity(&self) -> Size {
        self.units.len()
    }

    #[inline]
    pub fn reserved(&self) -> Size {
        self.reserved
    }

    /// First allocatable address
    #[inline]
    pub fn user_start(&self) -> Address {
        self.reserved
    }

    #[inline]
    pub fn units(&self) -> &[UnitState] {
        &self.units
    }

    #[inline]
    pub fn unit(&self, address: Address) -> Option<&UnitState> {
        self.units.get(address)
    }

    #[inline]
    pub fn is_free(&self, address: Address) -> bool {
        self.units.get(address).map_or(false, UnitState::is_free)
    }

    /// Mark `[offset, offset + size)` as owned by `id`
    ///
    /// Every unit in range must be Free and outside the reserved prefix. The
    /// region is left untouched when the check fails.
    pub fn allocate(&mut self, offset: Address, size: Size, id: &ProcessId) -> MemoryResult<()> {
        if size == 0 {
            return Err(MemoryError::ZeroSize(id.clone()));
        }
        let end = offset.checked_add(size).unwrap_or(Address::MAX);
        if offset < self.reserved || end > self.capacity() {
            return Err(MemoryError::RangeOutOfBounds {
                offset,
                size,
                start: self.reserved,
                end: self.capacity(),
            });
        }
        if let Some(busy) = (offset..end).find(|&addr| !self.units[addr].is_free()) {
            return Err(MemoryError::RangeNotFree {
                address: busy,
                requester: id.clone(),
            });
        }

        self.units[offset..end].fill(UnitState::Owned(id.clone()));
        Ok(())
    }

    /// Release every unit owned by `id`, returning how many were reclaimed
    pub fn free(&mut self, id: &ProcessId) -> Size {
        let mut reclaimed = 0;
        for unit in &mut self.units[self.reserved..] {
            if unit.owner() == Some(id) {
                *unit = UnitState::Free;
                reclaimed += 1;
            }
        }
        reclaimed
    }

    /// Maximal Free runs in address order
    pub fn free_runs(&self) -> Vec<Span> {
        let mut runs = Vec::new();
        let mut start: Option<Address> = None;

        for addr in self.reserved..self.capacity() {
            match (self.units[addr].is_free(), start) {
                (true, None) => start = Some(addr),
                (false, Some(s)) => {
                    runs.push(Span::new(s, addr - s));
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            runs.push(Span::new(s, self.capacity() - s));
        }
        runs
    }

    /// Largest Free run, lowest address on ties
    pub fn largest_free_run(&self) -> Option<Span> {
        self.free_runs()
            .into_iter()
            .fold(None, |best: Option<Span>, run| match best {
                Some(b) if b.len >= run.len => Some(b),
                _ => Some(run),
            })
    }

    /// Maximal owned runs in address order
    ///
    /// A process appears more than once only if contiguity has been broken.
    pub fn owned_runs(&self) -> Vec<(ProcessId, Span)> {
        let mut runs: Vec<(ProcessId, Span)> = Vec::new();
        for addr in self.reserved..self.capacity() {
            let Some(owner) = self.units[addr].owner() else {
                continue;
            };
            if let Some((id, span)) = runs.last_mut() {
                if *id == *owner && span.end() == addr {
                    span.len += 1;
                    continue;
                }
            }
            runs.push((owner.clone(), Span::new(addr, 1)));
        }
        runs
    }

    /// Span owned by `id`, if it is resident
    pub fn owned_run(&self, id: &ProcessId) -> Option<Span> {
        let first = self.units.iter().position(|u| u.owner() == Some(id))?;
        let len = self.units[first..]
            .iter()
            .take_while(|u| u.owner() == Some(id))
            .count();
        Some(Span::new(first, len))
    }

    pub fn free_units(&self) -> Size {
        self.units.iter().filter(|u| u.is_free()).count()
    }

    pub fn used_units(&self) -> Size {
        self.capacity() - self.reserved - self.free_units()
    }

    /// Check the reserved prefix and per-owner contiguity
    pub fn verify(&self) -> MemoryResult<()> {
        for (address, unit) in self.units.iter().enumerate() {
            let in_prefix = address < self.reserved;
            if in_prefix != unit.is_reserved() {
                return Err(MemoryError::CorruptionDetected {
                    address,
                    reason: if in_prefix {
                        "reserved prefix overwritten".into()
                    } else {
                        "reserved unit outside kernel prefix".into()
                    },
                });
            }
        }

        let mut seen: AHashMap<ProcessId, Span> = AHashMap::new();
        for (id, span) in self.owned_runs() {
            if let Some(previous) = seen.insert(id.clone(), span) {
                return Err(MemoryError::CorruptionDetected {
                    address: span.offset,
                    reason: format!(
                        "{} split across runs at 0x{:x} and 0x{:x}",
                        id, previous.offset, span.offset
                    ),
                });
            }
        }
        Ok(())
    }

    /// Copy the current state for reporting
    pub fn snapshot(&self, time: Time) -> MemorySnapshot {
        MemorySnapshot {
            time,
            units: self.units.clone(),
        }
    }

    pub fn stats(&self) -> MemoryStats {
        let runs = self.free_runs();
        let free: Size = runs.iter().map(|r| r.len).sum();
        let largest = runs.iter().map(|r| r.len).max().unwrap_or(0);
        let fragmentation = if free == 0 {
            0.0
        } else {
            (1.0 - largest as f64 / free as f64) * 100.0
        };

        MemoryStats {
            total_units: self.capacity(),
            reserved_units: self.reserved,
            used_units: self.capacity() - self.reserved - free,
            free_units: free,
            free_runs: runs.len(),
            largest_free_run: largest,
            fragmentation_percentage: fragmentation,
        }
    }

    /// Move one owned unit down to a free destination, clearing the source
    pub(super) fn relocate_unit(&mut self, from: Address, to: Address) {
        debug_assert!(to >= self.reserved && self.units[to].is_free());
        debug_assert!(self.units[from].owner().is_some());
        self.units.swap(from, to);
    }
}

impl Default for MemoryRegion {
    fn default() -> Self {
        Self::new()
    }
}
