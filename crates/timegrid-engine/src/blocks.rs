//! Block extraction -- projects schedule and event rows onto visible grid
//! days as minute-of-day time blocks.
//!
//! The week grid renders 06:00 through 22:00. Extraction clips every block
//! to that window: blocks entirely outside it are dropped, partial overlaps
//! are truncated, and all-day events paint the whole window. Rows never
//! error; a row that cannot produce a visible block simply produces none.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::civil;
use crate::rule::RecurrenceRule;

/// First visible grid minute (06:00).
pub const GRID_START_MINUTE: u32 = 6 * 60;

/// First minute past the visible grid (22:00).
pub const GRID_END_MINUTE: u32 = 22 * 60;

/// Minutes in a civil day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Assumed length of a row with no end timestamp.
pub const DEFAULT_EVENT_MINUTES: u32 = 60;

const ORG_OWNER_LABEL: &str = "Org schedule";
const ORG_OWNER_KEY: &str = "org";
const FALLBACK_OWNER_LABEL: &str = "You";
const FALLBACK_OWNER_KEY: &str = "you";

/// Which source table a block came from. Tagged on every input row and
/// carried through to the rendered block for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockOrigin {
    Calendar,
    RecurringSchedule,
    Academic,
}

/// A recurring schedule row: an anchor event plus its recurrence rule,
/// flattened together on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRow {
    pub id: String,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
    #[serde(flatten)]
    pub rule: RecurrenceRule,
    #[serde(rename = "originKind")]
    pub origin: BlockOrigin,
    #[serde(rename = "isOrgOwned", default)]
    pub org_owned: bool,
    pub owner_name: Option<String>,
    pub owner_id: Option<String>,
}

/// A one-off calendar event row. May span multiple days; `all_day` rows
/// paint the full grid window on every day they touch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRow {
    pub id: String,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
    #[serde(default)]
    pub all_day: bool,
    #[serde(rename = "originKind")]
    pub origin: BlockOrigin,
    #[serde(rename = "isOrgOwned", default)]
    pub org_owned: bool,
    pub owner_name: Option<String>,
    pub owner_id: Option<String>,
}

/// One renderable block on one grid day, in minutes since midnight.
/// Invariant: `GRID_START_MINUTE <= start_minute < end_minute <= GRID_END_MINUTE`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeBlock {
    pub id: String,
    pub start_minute: u32,
    pub end_minute: u32,
    pub title: String,
    pub owner_label: String,
    pub owner_key: String,
    #[serde(rename = "isOrgOwned")]
    pub org_owned: bool,
    #[serde(rename = "originKind")]
    pub origin: BlockOrigin,
}

/// Extract the visible time blocks for a set of grid days, keyed by
/// canonical `YYYY-MM-DD` date key.
///
/// Every visible day gets an entry, empty or not, so callers can render the
/// full week without key-existence checks. Schedule rows are painted onto
/// each day their rule applies on ([`RecurrenceRule::applies_on`]); event
/// rows are painted onto each day of their span.
///
/// # Arguments
/// - `schedules` -- recurring schedule rows
/// - `events` -- one-off calendar event rows
/// - `visible_days` -- the grid days to paint, typically one week
pub fn extract_blocks(
    schedules: &[ScheduleRow],
    events: &[EventRow],
    visible_days: &[NaiveDate],
) -> BTreeMap<String, Vec<TimeBlock>> {
    let mut by_day: BTreeMap<String, Vec<TimeBlock>> = visible_days
        .iter()
        .map(|&day| (civil::date_key(day), Vec::new()))
        .collect();

    for row in schedules {
        paint_schedule(row, visible_days, &mut by_day);
    }
    for row in events {
        if row.all_day {
            paint_all_day_event(row, visible_days, &mut by_day);
        } else {
            paint_timed_event(row, visible_days, &mut by_day);
        }
    }
    by_day
}

fn paint_schedule(
    row: &ScheduleRow,
    visible_days: &[NaiveDate],
    by_day: &mut BTreeMap<String, Vec<TimeBlock>>,
) {
    let anchor_date = civil::start_of_day(row.start);
    let start_minute = minute_of_day(row.start.time());
    let end_minute = match row.end {
        // A schedule whose end crosses midnight runs to the end of the day
        // on the grid; the stored end still bounds the real event.
        Some(end) if civil::start_of_day(end) > anchor_date => MINUTES_PER_DAY,
        Some(end) => minute_of_day(end.time()),
        None => start_minute + DEFAULT_EVENT_MINUTES,
    };

    for &day in visible_days {
        if !row.rule.applies_on(anchor_date, day) {
            continue;
        }
        if let Some((start, end)) = clamp_to_grid(start_minute, end_minute) {
            push_block(
                by_day,
                day,
                TimeBlock {
                    id: row.id.clone(),
                    start_minute: start,
                    end_minute: end,
                    title: row.title.clone(),
                    owner_label: owner_label(row.org_owned, &row.owner_name, &row.owner_id),
                    owner_key: owner_key(row.org_owned, &row.owner_name, &row.owner_id),
                    org_owned: row.org_owned,
                    origin: row.origin,
                },
            );
        }
    }
}

fn paint_all_day_event(
    row: &EventRow,
    visible_days: &[NaiveDate],
    by_day: &mut BTreeMap<String, Vec<TimeBlock>>,
) {
    let first = civil::start_of_day(row.start);
    let last = match row.end {
        None => first,
        Some(end) => {
            let end_day = civil::start_of_day(end);
            // Exclusive-end convention: an all-day end at exactly midnight
            // marks the day after the event, not a day it covers.
            if end.time() == NaiveTime::MIN && end_day > first {
                end_day.pred_opt().unwrap_or(first)
            } else {
                end_day
            }
        }
    };
    let last = last.max(first);

    for &day in visible_days {
        if day < first || day > last {
            continue;
        }
        if let Some((start, end)) = clamp_to_grid(0, MINUTES_PER_DAY) {
            push_block(by_day, day, event_block(row, start, end));
        }
    }
}

fn paint_timed_event(
    row: &EventRow,
    visible_days: &[NaiveDate],
    by_day: &mut BTreeMap<String, Vec<TimeBlock>>,
) {
    let end_ts = row
        .end
        .unwrap_or(row.start + Duration::minutes(DEFAULT_EVENT_MINUTES as i64));
    let first = civil::start_of_day(row.start);
    let last = civil::start_of_day(end_ts);

    for &day in visible_days {
        if day < first || day > last {
            continue;
        }
        let start_minute = if day == first {
            minute_of_day(row.start.time())
        } else {
            0
        };
        let end_minute = if day == last {
            minute_of_day(end_ts.time())
        } else {
            MINUTES_PER_DAY
        };
        if let Some((start, end)) = clamp_to_grid(start_minute, end_minute) {
            push_block(by_day, day, event_block(row, start, end));
        }
    }
}

fn event_block(row: &EventRow, start_minute: u32, end_minute: u32) -> TimeBlock {
    TimeBlock {
        id: row.id.clone(),
        start_minute,
        end_minute,
        title: row.title.clone(),
        owner_label: owner_label(row.org_owned, &row.owner_name, &row.owner_id),
        owner_key: owner_key(row.org_owned, &row.owner_name, &row.owner_id),
        org_owned: row.org_owned,
        origin: row.origin,
    }
}

fn push_block(by_day: &mut BTreeMap<String, Vec<TimeBlock>>, day: NaiveDate, block: TimeBlock) {
    by_day.entry(civil::date_key(day)).or_default().push(block);
}

/// Clip a minute span to the visible grid window. Returns `None` when
/// nothing of the span is visible (including zero-length and inverted spans).
fn clamp_to_grid(start_minute: u32, end_minute: u32) -> Option<(u32, u32)> {
    let start = start_minute.max(GRID_START_MINUTE);
    let end = end_minute.min(GRID_END_MINUTE);
    (start < end).then_some((start, end))
}

fn minute_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Display label for a block's owner: org-owned rows group under one shared
/// label, personal rows fall back from name to id to a generic "You".
/// Empty strings count as missing.
fn owner_label(org_owned: bool, name: &Option<String>, id: &Option<String>) -> String {
    if org_owned {
        return ORG_OWNER_LABEL.to_string();
    }
    non_empty(name)
        .or_else(|| non_empty(id))
        .unwrap_or(FALLBACK_OWNER_LABEL)
        .to_string()
}

/// Stable grouping key for a block's owner. Prefers the identifier over the
/// display name so renames do not split an owner's blocks across groups.
fn owner_key(org_owned: bool, name: &Option<String>, id: &Option<String>) -> String {
    if org_owned {
        return ORG_OWNER_KEY.to_string();
    }
    non_empty(id)
        .or_else(|| non_empty(name))
        .unwrap_or(FALLBACK_OWNER_KEY)
        .to_string()
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
