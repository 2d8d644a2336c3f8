//! Recurrence rule model and the shared day-matching predicate.
//!
//! A rule describes how an anchor event repeats. Rules are immutable inputs:
//! both the expansion engine ([`crate::expander`]) and per-day grid painting
//! ([`crate::blocks`]) answer "does this rule put an occurrence on day X"
//! through the single [`RecurrenceRule::applies_on`] predicate, so the two
//! call sites cannot drift apart.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::civil;

/// How an anchor event repeats.
///
/// The data layer supplies this as a lowercase string (`"weekly"`). Any
/// unrecognized or missing value maps to [`Occurrence::Unsupported`], which
/// expands to zero instances -- a deliberate no-op, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Occurrence {
    /// The anchor event only, no repetition.
    Single,
    /// One instance per calendar day.
    Daily,
    /// Instances on a set of weekdays, walked week after week.
    Weekly,
    /// One instance per calendar month, day-of-month clamped to short months.
    Monthly,
    /// Anything this engine does not recognize.
    #[default]
    Unsupported,
}

impl From<String> for Occurrence {
    fn from(s: String) -> Self {
        match s.as_str() {
            "single" => Self::Single,
            "daily" => Self::Daily,
            "weekly" => Self::Weekly,
            "monthly" => Self::Monthly,
            _ => Self::Unsupported,
        }
    }
}

impl From<Occurrence> for String {
    fn from(occurrence: Occurrence) -> Self {
        match occurrence {
            Occurrence::Single => "single",
            Occurrence::Daily => "daily",
            Occurrence::Weekly => "weekly",
            Occurrence::Monthly => "monthly",
            Occurrence::Unsupported => "unsupported",
        }
        .to_string()
    }
}

/// A recurrence rule as stored on a schedule row.
///
/// Field semantics:
/// - `days_of_week` -- weekday numbers, 0 = Sunday .. 6 = Saturday; weekly
///   rules only. Absent or empty means the anchor's own weekday (the data
///   layer sends `null` and `[]` interchangeably).
/// - `day_of_month` -- 1..=31; monthly rules only. Absent means the anchor's
///   own day-of-month. Days beyond a month's length clamp to its last day.
/// - `end_date` -- inclusive bound on generation (`recurrenceEndDate` on the
///   wire). Absent means the type-specific default horizon applies.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceRule {
    #[serde(rename = "occurrenceType", default)]
    pub occurrence: Occurrence,
    pub days_of_week: Option<Vec<u32>>,
    pub day_of_month: Option<u32>,
    #[serde(rename = "recurrenceEndDate")]
    pub end_date: Option<NaiveDate>,
}

impl RecurrenceRule {
    /// The day-of-month this rule targets: `day_of_month`, or the anchor's
    /// own day when unset.
    pub fn effective_day_of_month(&self, anchor_date: NaiveDate) -> u32 {
        self.day_of_month.unwrap_or_else(|| anchor_date.day())
    }

    /// Whether `date`'s weekday is in the rule's effective weekday set.
    fn matches_weekday(&self, anchor_date: NaiveDate, date: NaiveDate) -> bool {
        let weekday = civil::weekday_number(date);
        match self.days_of_week.as_deref() {
            Some(days) if !days.is_empty() => days.contains(&weekday),
            _ => civil::weekday_number(anchor_date) == weekday,
        }
    }

    /// Does this rule put an occurrence on `date`?
    ///
    /// True iff `date` is on or after the anchor date, on or before the
    /// rule's end date when one is set, and satisfies the occurrence-type
    /// day match:
    ///
    /// - `single` -- only the anchor date itself
    /// - `daily` -- every day in range
    /// - `weekly` -- the effective weekday set
    /// - `monthly` -- the effective day-of-month, clamped to the length of
    ///   `date`'s month (so a day-31 rule matches Feb 28 in a non-leap year)
    /// - `unsupported` -- never
    ///
    /// This is the predicate the grid painter evaluates per visible day; the
    /// expansion engine walks candidate dates through the same predicate.
    pub fn applies_on(&self, anchor_date: NaiveDate, date: NaiveDate) -> bool {
        if date < anchor_date {
            return false;
        }
        if self.end_date.is_some_and(|end| date > end) {
            return false;
        }
        match self.occurrence {
            Occurrence::Single => date == anchor_date,
            Occurrence::Daily => true,
            Occurrence::Weekly => self.matches_weekday(anchor_date, date),
            Occurrence::Monthly => {
                date == civil::clamp_day(date, self.effective_day_of_month(anchor_date))
            }
            Occurrence::Unsupported => false,
        }
    }
}
