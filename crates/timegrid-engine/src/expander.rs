//! Recurrence expansion -- converts a rule plus anchor timestamps into
//! concrete occurrence instances.
//!
//! Expansion is pure wall-clock arithmetic on `chrono` naive types: no
//! timezone shifting, no DST math. Every generation loop is bounded by a
//! hard per-type instance cap and a finite scan window, so malformed rules
//! (an end date before the anchor, a weekday set that matches nothing)
//! terminate with an empty or short result instead of spinning.

use chrono::{Datelike, Days, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::civil;
use crate::rule::{Occurrence, RecurrenceRule};

/// Hard cap on instances produced by a daily rule (~6 months of days).
pub const DAILY_INSTANCE_CAP: usize = 180;

/// Hard cap on instances produced by a weekly rule (one year of weeks).
pub const WEEKLY_INSTANCE_CAP: usize = 52;

/// Hard cap on instances produced by a monthly rule (one year of months).
pub const MONTHLY_INSTANCE_CAP: usize = 12;

/// Generation horizon for daily rules with no end date, in calendar months.
pub const DEFAULT_DAILY_HORIZON_MONTHS: u32 = 6;

/// Scan window for weekly rules, in days. 52 whole weeks: the densest
/// weekday set reaches [`WEEKLY_INSTANCE_CAP`] well inside it, and a set
/// that never matches stops scanning here instead of chasing the end date.
pub const WEEKLY_SCAN_DAYS: u64 = 364;

/// One concrete instance of a recurring event.
///
/// `start` carries the anchor's time-of-day on the instance date; `end`, when
/// the anchor has one, preserves the anchor's exact duration (an anchor that
/// runs 18:00-19:00 yields instances that run 18:00-19:00). Instances within
/// one expansion are chronological and `recurrence_index` numbers them from
/// zero with no gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccurrenceInstance {
    #[serde(rename = "startTimestamp")]
    pub start: NaiveDateTime,
    #[serde(rename = "endTimestamp")]
    pub end: Option<NaiveDateTime>,
    pub recurrence_index: u32,
}

/// Expand a recurrence rule into concrete instances.
///
/// # Arguments
/// - `anchor_start` -- the stored event's start, a resolved local wall-clock
///   value; its date is the first candidate day and its time-of-day is
///   stamped onto every instance
/// - `anchor_end` -- the stored event's end, if any; its distance from
///   `anchor_start` is reapplied to every instance
/// - `rule` -- the recurrence rule to expand
///
/// Generation runs from the anchor date through the rule's inclusive end
/// date, or through a type-specific default horizon when no end date is set
/// (6 months for daily, 52 weeks for weekly, cap-only for monthly), and
/// stops early at the per-type instance cap. An [`Occurrence::Unsupported`]
/// rule yields an empty vector.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use timegrid_engine::expander::expand;
/// use timegrid_engine::rule::{Occurrence, RecurrenceRule};
///
/// let anchor = NaiveDate::from_ymd_opt(2026, 3, 9)
///     .unwrap()
///     .and_hms_opt(18, 0, 0)
///     .unwrap();
/// let rule = RecurrenceRule {
///     occurrence: Occurrence::Weekly,
///     days_of_week: Some(vec![1]),
///     end_date: NaiveDate::from_ymd_opt(2026, 4, 6),
///     ..Default::default()
/// };
///
/// let instances = expand(anchor, None, &rule);
/// assert_eq!(instances.len(), 5); // five Mondays, Mar 9 .. Apr 6
/// ```
pub fn expand(
    anchor_start: NaiveDateTime,
    anchor_end: Option<NaiveDateTime>,
    rule: &RecurrenceRule,
) -> Vec<OccurrenceInstance> {
    let duration = anchor_end.map(|end| end - anchor_start);
    let anchor_date = civil::start_of_day(anchor_start);

    match rule.occurrence {
        Occurrence::Single => vec![instance(anchor_start, duration, 0)],
        Occurrence::Daily => walk_days(
            anchor_start,
            duration,
            rule,
            daily_scan_end(anchor_date, rule),
            DAILY_INSTANCE_CAP,
        ),
        Occurrence::Weekly => walk_days(
            anchor_start,
            duration,
            rule,
            weekly_scan_end(anchor_date, rule),
            WEEKLY_INSTANCE_CAP,
        ),
        Occurrence::Monthly => expand_monthly(anchor_start, duration, rule),
        Occurrence::Unsupported => Vec::new(),
    }
}

fn instance(start: NaiveDateTime, duration: Option<Duration>, index: u32) -> OccurrenceInstance {
    OccurrenceInstance {
        start,
        end: duration.map(|d| start + d),
        recurrence_index: index,
    }
}

/// Walk candidate days from the anchor date through `scan_end` (inclusive),
/// emitting an instance for each day the rule applies on, up to `cap`.
fn walk_days(
    anchor_start: NaiveDateTime,
    duration: Option<Duration>,
    rule: &RecurrenceRule,
    scan_end: NaiveDate,
    cap: usize,
) -> Vec<OccurrenceInstance> {
    let anchor_date = civil::start_of_day(anchor_start);
    let time = anchor_start.time();

    let mut out = Vec::new();
    let mut day = anchor_date;
    while day <= scan_end && out.len() < cap {
        if rule.applies_on(anchor_date, day) {
            out.push(instance(day.and_time(time), duration, out.len() as u32));
        }
        let Some(next) = day.succ_opt() else { break };
        day = next;
    }
    out
}

/// Daily rules scan to the inclusive end date, or 6 months out without one.
/// The instance cap keeps a far-future end date from mattering: daily rules
/// emit every day, so the walk stops within `DAILY_INSTANCE_CAP` days.
fn daily_scan_end(anchor_date: NaiveDate, rule: &RecurrenceRule) -> NaiveDate {
    rule.end_date
        .unwrap_or_else(|| civil::add_months_clamped(anchor_date, DEFAULT_DAILY_HORIZON_MONTHS))
}

/// Weekly rules scan at most [`WEEKLY_SCAN_DAYS`] past the anchor. Any
/// weekday set with a real weekday in it reaches the 52-instance cap inside
/// that window, so clamping a later end date to it never changes the output;
/// it only bounds the scan when the set cannot match.
fn weekly_scan_end(anchor_date: NaiveDate, rule: &RecurrenceRule) -> NaiveDate {
    let window = anchor_date
        .checked_add_days(Days::new(WEEKLY_SCAN_DAYS))
        .unwrap_or(NaiveDate::MAX);
    match rule.end_date {
        Some(end) => end.min(window),
        None => window,
    }
}

/// Monthly expansion steps whole calendar months from the anchor's month,
/// clamping the effective day-of-month to each month's length (a day-31 rule
/// lands on Feb 28 or 29, never skips February).
fn expand_monthly(
    anchor_start: NaiveDateTime,
    duration: Option<Duration>,
    rule: &RecurrenceRule,
) -> Vec<OccurrenceInstance> {
    let anchor_date = civil::start_of_day(anchor_start);
    let time = anchor_start.time();
    let effective_day = rule.effective_day_of_month(anchor_date);

    let mut out = Vec::new();
    let mut month = anchor_date.with_day(1).unwrap_or(anchor_date);
    while out.len() < MONTHLY_INSTANCE_CAP {
        let target = civil::clamp_day(month, effective_day);
        if rule.end_date.is_some_and(|end| target > end) {
            break;
        }
        // An explicit day_of_month earlier in the anchor month than the
        // anchor itself would produce a pre-anchor instance; skip it.
        if target >= anchor_date {
            out.push(instance(target.and_time(time), duration, out.len() as u32));
        }
        month = civil::add_months_clamped(month, 1);
        if month == NaiveDate::MAX {
            break;
        }
    }
    out
}
