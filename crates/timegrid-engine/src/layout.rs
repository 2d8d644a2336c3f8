//! Overlap layout -- assigns side-by-side columns to the time blocks of a
//! single grid day so no two overlapping blocks share a column.
//!
//! The algorithm is greedy interval-graph coloring. Blocks are sorted by
//! start (ties broken longest-first), partitioned into maximal overlap
//! groups by a running max-end scan, and placed first-fit into the lowest
//! column whose previous block has ended. Each block also records its
//! group's total column count so a renderer can divide the day's width.
//! Disjoint groups are independent: a block after a gap starts over at
//! column 0.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::blocks::{extract_blocks, EventRow, ScheduleRow, TimeBlock};

/// A time block with its column assignment.
///
/// `column` is the 0-based slot within the block's overlap group and
/// `total_columns` is the group's width; two blocks in one group satisfy
/// `column < total_columns` and never share a column while overlapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedBlock {
    #[serde(flatten)]
    pub block: TimeBlock,
    pub column: usize,
    pub total_columns: usize,
}

/// Lay out one day's blocks into overlap-free columns.
///
/// Output order is the layout order: ascending start minute, longest block
/// first within a start tie, original order for full ties (the sort is
/// stable). Identical input always produces identical output.
///
/// # Examples
///
/// ```
/// use timegrid_engine::blocks::{BlockOrigin, TimeBlock};
/// use timegrid_engine::layout::layout_day;
///
/// let block = |id: &str, start, end| TimeBlock {
///     id: id.to_string(),
///     start_minute: start,
///     end_minute: end,
///     title: id.to_string(),
///     owner_label: "You".to_string(),
///     owner_key: "you".to_string(),
///     org_owned: false,
///     origin: BlockOrigin::Calendar,
/// };
///
/// let placed = layout_day(vec![
///     block("a", 540, 660),
///     block("b", 600, 720),
///     block("c", 780, 840),
/// ]);
///
/// // a and b overlap and split into two columns; c starts a new group.
/// assert_eq!(placed[0].total_columns, 2);
/// assert_eq!(placed[2].column, 0);
/// assert_eq!(placed[2].total_columns, 1);
/// ```
pub fn layout_day(blocks: Vec<TimeBlock>) -> Vec<PositionedBlock> {
    let mut blocks = blocks;
    blocks.sort_by(|a, b| {
        a.start_minute
            .cmp(&b.start_minute)
            .then_with(|| duration_of(b).cmp(&duration_of(a)))
    });

    let mut out = Vec::with_capacity(blocks.len());
    let mut group: Vec<TimeBlock> = Vec::new();
    let mut group_end = 0;
    for block in blocks {
        // A block starting at or past the running max end cannot overlap
        // anything already in the group, so the group is complete.
        if !group.is_empty() && block.start_minute >= group_end {
            place_group(std::mem::take(&mut group), &mut out);
        }
        group_end = group_end.max(block.end_minute);
        group.push(block);
    }
    place_group(group, &mut out);
    out
}

/// Lay out every day of a block map independently. Columns never carry
/// across days.
pub fn layout_week(
    days: BTreeMap<String, Vec<TimeBlock>>,
) -> BTreeMap<String, Vec<PositionedBlock>> {
    days.into_iter()
        .map(|(key, blocks)| (key, layout_day(blocks)))
        .collect()
}

/// Extract and lay out a full week grid in one call: schedule and event
/// rows in, positioned blocks per `YYYY-MM-DD` date key out.
pub fn build_week_grid(
    schedules: &[ScheduleRow],
    events: &[EventRow],
    visible_days: &[NaiveDate],
) -> BTreeMap<String, Vec<PositionedBlock>> {
    layout_week(extract_blocks(schedules, events, visible_days))
}

/// First-fit column assignment within one overlap group.
fn place_group(group: Vec<TimeBlock>, out: &mut Vec<PositionedBlock>) {
    if group.is_empty() {
        return;
    }

    // column_ends[i] is the end minute of column i's latest block.
    let mut column_ends: Vec<u32> = Vec::new();
    let mut placed: Vec<(TimeBlock, usize)> = Vec::with_capacity(group.len());
    for block in group {
        let free = column_ends
            .iter()
            .position(|&end| end <= block.start_minute);
        let column = match free {
            Some(column) => {
                column_ends[column] = block.end_minute;
                column
            }
            None => {
                column_ends.push(block.end_minute);
                column_ends.len() - 1
            }
        };
        placed.push((block, column));
    }

    let total_columns = column_ends.len();
    out.extend(placed.into_iter().map(|(block, column)| PositionedBlock {
        block,
        column,
        total_columns,
    }));
}

fn duration_of(block: &TimeBlock) -> u32 {
    block.end_minute.saturating_sub(block.start_minute)
}
