/*!
 * Compaction Tests
 * Relocation order, bookkeeping and idempotence
 */

use memsim::memory::{Compactor, MemoryRegion};
use memsim::{ProcessId, Span};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn pid(s: &str) -> ProcessId {
    ProcessId::new(s).unwrap()
}

#[test]
fn test_compaction_merges_free_space() {
    let mut region = MemoryRegion::new();
    region.allocate(100, 50, &pid("A")).unwrap();
    region.allocate(155, 145, &pid("B")).unwrap();
    region.allocate(350, 100, &pid("C")).unwrap();

    let mut compactor = Compactor::new();
    let report = compactor.compact(&mut region);

    assert_eq!(report.relocated, vec![pid("A"), pid("B"), pid("C")]);
    assert_eq!(report.free_block_size, 560 - 80 - 295);
    assert_eq!(report.total_size, 560);
    assert_eq!(region.free_runs(), vec![Span::new(375, 185)]);

    assert_eq!(region.owned_run(&pid("A")), Some(Span::new(80, 50)));
    assert_eq!(region.owned_run(&pid("B")), Some(Span::new(130, 145)));
    assert_eq!(region.owned_run(&pid("C")), Some(Span::new(275, 100)));
    assert!(region.verify().is_ok());
}

#[test]
fn test_compaction_is_idempotent_on_compact_memory() {
    let mut region = MemoryRegion::new();
    region.allocate(80, 40, &pid("A")).unwrap();
    region.allocate(120, 60, &pid("B")).unwrap();

    let mut compactor = Compactor::new();
    let before = region.clone();
    let report = compactor.compact(&mut region);

    assert_eq!(report.relocated_count(), 0);
    assert_eq!(report.units_moved, 0);
    assert_eq!(report.free_block_size, 380);
    assert_eq!(region, before);

    let again = compactor.compact(&mut region);
    assert_eq!(again.free_block_size, report.free_block_size);
    assert_eq!(compactor.passes(), 2);
}

#[test]
fn test_compaction_counts_distinct_processes() {
    // Several moved units of the same process count once
    let mut region = MemoryRegion::new();
    region.allocate(200, 30, &pid("A")).unwrap();
    region.allocate(300, 1, &pid("B")).unwrap();

    let report = Compactor::new().compact(&mut region);
    assert_eq!(report.relocated_count(), 2);
    assert_eq!(report.units_moved, 31);
}

#[test]
fn test_compaction_report_percentage() {
    let mut region = MemoryRegion::new();
    region.allocate(200, 100, &pid("A")).unwrap();

    let report = Compactor::new().compact(&mut region);
    assert_eq!(report.free_block_size, 380);
    assert_eq!(format!("{:.2}", report.free_percentage()), "67.86");
    assert_eq!(
        report.to_string(),
        "Relocated 1 processes to create a free memory block of 380 units (67.86% of total memory)."
    );
}

#[test]
fn test_compaction_on_empty_memory() {
    let mut region = MemoryRegion::new();
    let report = Compactor::new().compact(&mut region);
    assert_eq!(report.relocated_count(), 0);
    assert_eq!(report.free_block_size, 480);
}

/// Region holding blocks laid out as (gap, size) pairs from the first
/// allocatable unit, dropping blocks that no longer fit
fn scattered_region(layout: &[(usize, usize)]) -> MemoryRegion {
    let mut region = MemoryRegion::new();
    let mut offset = region.user_start();
    for (index, &(gap, size)) in layout.iter().enumerate() {
        let start = offset + gap;
        if start + size > region.capacity() {
            break;
        }
        region.allocate(start, size, &pid(&format!("P{index}"))).unwrap();
        offset = start + size;
    }
    region
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn test_compaction_leaves_single_high_free_run(
        layout in prop::collection::vec((0usize..30, 1usize..60), 0..16)
    ) {
        let mut region = scattered_region(&layout);
        let used = region.used_units();
        let order_before: Vec<(ProcessId, usize)> = region
            .owned_runs()
            .into_iter()
            .map(|(id, span)| (id, span.len))
            .collect();

        let report = Compactor::new().compact(&mut region);

        let capacity = region.capacity();
        prop_assert_eq!(report.free_block_size, capacity - region.user_start() - used);
        let free = region.free_runs();
        if report.free_block_size == 0 {
            prop_assert!(free.is_empty());
        } else {
            prop_assert_eq!(
                free,
                vec![Span::new(capacity - report.free_block_size, report.free_block_size)]
            );
        }
        prop_assert!(region.verify().is_ok());

        let runs_after = region.owned_runs();
        let order_after: Vec<(ProcessId, usize)> = runs_after
            .iter()
            .map(|(id, span)| (id.clone(), span.len))
            .collect();
        prop_assert_eq!(order_after, order_before);

        // Packed against the kernel prefix with no holes
        let mut expected_offset = region.user_start();
        for (_, span) in &runs_after {
            prop_assert_eq!(span.offset, expected_offset);
            expected_offset = span.end();
        }

        let again = Compactor::new().compact(&mut region);
        prop_assert_eq!(again.relocated_count(), 0);
        prop_assert_eq!(again.free_block_size, report.free_block_size);
    }
}
