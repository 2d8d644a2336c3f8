//! Property-based tests for overlap layout using proptest.

use std::collections::BTreeMap;

use proptest::prelude::*;
use timegrid_engine::blocks::{BlockOrigin, TimeBlock};
use timegrid_engine::layout::{layout_day, PositionedBlock};

// ---------------------------------------------------------------------------
// Strategies -- generate arbitrary day-sized block sets
// ---------------------------------------------------------------------------

fn block(id: &str, start_minute: u32, end_minute: u32) -> TimeBlock {
    TimeBlock {
        id: id.to_string(),
        start_minute,
        end_minute,
        title: id.to_uppercase(),
        owner_label: "You".to_string(),
        owner_key: "you".to_string(),
        org_owned: false,
        origin: BlockOrigin::Calendar,
    }
}

/// Up to a dozen blocks anywhere in the day, at least one minute long.
fn arb_blocks() -> impl Strategy<Value = Vec<TimeBlock>> {
    proptest::collection::vec((0u32..1440, 1u32..=360), 0..=12).prop_map(|spans| {
        spans
            .into_iter()
            .enumerate()
            .map(|(i, (start, length))| {
                block(&format!("b{}", i), start, (start + length).min(1440))
            })
            .collect()
    })
}

fn overlaps(a: &TimeBlock, b: &TimeBlock) -> bool {
    a.start_minute < b.end_minute && b.start_minute < a.end_minute
}

/// The largest number of blocks covering any single minute. Peak coverage
/// always occurs at some block's start, so checking starts is enough.
fn max_concurrency(blocks: &[TimeBlock]) -> usize {
    blocks
        .iter()
        .map(|at| {
            blocks
                .iter()
                .filter(|b| b.start_minute <= at.start_minute && at.start_minute < b.end_minute)
                .count()
        })
        .max()
        .unwrap_or(0)
}

/// Group width per block id, the part of the layout that must not depend on
/// input order. (Columns themselves may swap between identical spans.)
fn column_widths(placed: Vec<PositionedBlock>) -> BTreeMap<String, usize> {
    placed
        .into_iter()
        .map(|p| (p.block.id, p.total_columns))
        .collect()
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Property 1: Overlapping blocks never share a column
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn overlapping_blocks_never_share_a_column(blocks in arb_blocks()) {
        let placed = layout_day(blocks);

        for (i, a) in placed.iter().enumerate() {
            for b in placed.iter().skip(i + 1) {
                if overlaps(&a.block, &b.block) {
                    prop_assert_ne!(
                        a.column,
                        b.column,
                        "{} and {} overlap in column {}",
                        &a.block.id,
                        &b.block.id,
                        a.column
                    );
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Property 2: Every column index is inside its group's column count
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn columns_fit_inside_their_group(blocks in arb_blocks()) {
        let placed = layout_day(blocks);

        for p in &placed {
            prop_assert!(
                p.column < p.total_columns,
                "{}: column {} outside of {} columns",
                &p.block.id,
                p.column,
                p.total_columns
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Property 3: Layout is a permutation of its input
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn layout_preserves_every_block(blocks in arb_blocks()) {
        let placed = layout_day(blocks.clone());
        prop_assert_eq!(placed.len(), blocks.len());

        let mut input: Vec<(String, u32, u32)> = blocks
            .iter()
            .map(|b| (b.id.clone(), b.start_minute, b.end_minute))
            .collect();
        let mut output: Vec<(String, u32, u32)> = placed
            .iter()
            .map(|p| (p.block.id.clone(), p.block.start_minute, p.block.end_minute))
            .collect();
        input.sort();
        output.sort();
        prop_assert_eq!(input, output, "no block may be dropped, duplicated, or altered");
    }
}

// ---------------------------------------------------------------------------
// Property 4: Output order is start-ascending, longest-first on ties
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn output_is_in_layout_order(blocks in arb_blocks()) {
        let placed = layout_day(blocks);

        for window in placed.windows(2) {
            let (a, b) = (&window[0].block, &window[1].block);
            let a_len = a.end_minute - a.start_minute;
            let b_len = b.end_minute - b.start_minute;
            prop_assert!(
                a.start_minute < b.start_minute
                    || (a.start_minute == b.start_minute && a_len >= b_len),
                "{} before {} breaks the layout order",
                &a.id,
                &b.id
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Property 5: Group width equals the day's peak coverage
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn widest_group_matches_peak_coverage(blocks in arb_blocks()) {
        let expected = max_concurrency(&blocks);
        let placed = layout_day(blocks);

        let widest = placed.iter().map(|p| p.total_columns).max().unwrap_or(0);
        prop_assert_eq!(
            widest,
            expected,
            "greedy placement should use exactly as many columns as the peak"
        );
    }
}

// ---------------------------------------------------------------------------
// Property 6: Layout is deterministic
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn layout_is_deterministic(blocks in arb_blocks()) {
        prop_assert_eq!(layout_day(blocks.clone()), layout_day(blocks));
    }
}

// ---------------------------------------------------------------------------
// Property 7: Column counts ignore input order
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn column_counts_ignore_input_order(
        (blocks, shuffled) in arb_blocks().prop_flat_map(|blocks| {
            let shuffled = Just(blocks.clone()).prop_shuffle();
            (Just(blocks), shuffled)
        }),
    ) {
        prop_assert_eq!(
            column_widths(layout_day(blocks)),
            column_widths(layout_day(shuffled)),
            "reordering the input must not change any group's width"
        );
    }
}
