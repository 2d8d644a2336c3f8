//! Tests for the recurrence rule model: the `applies_on` day predicate and
//! the camelCase wire format rows arrive in.

use chrono::NaiveDate;
use serde_json::json;
use timegrid_engine::rule::{Occurrence, RecurrenceRule};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ---------------------------------------------------------------------------
// Anchor and end-date bounds
// ---------------------------------------------------------------------------

#[test]
fn nothing_applies_before_the_anchor_date() {
    let rule = RecurrenceRule {
        occurrence: Occurrence::Daily,
        ..Default::default()
    };
    let anchor = date(2026, 3, 9);

    assert!(!rule.applies_on(anchor, date(2026, 3, 8)));
    assert!(rule.applies_on(anchor, anchor));
}

#[test]
fn end_date_is_inclusive() {
    let rule = RecurrenceRule {
        occurrence: Occurrence::Daily,
        end_date: Some(date(2026, 3, 12)),
        ..Default::default()
    };
    let anchor = date(2026, 3, 9);

    assert!(rule.applies_on(anchor, date(2026, 3, 12)), "end date itself applies");
    assert!(!rule.applies_on(anchor, date(2026, 3, 13)), "day after does not");
}

// ---------------------------------------------------------------------------
// Per-type day matching
// ---------------------------------------------------------------------------

#[test]
fn single_applies_only_on_the_anchor_date() {
    let rule = RecurrenceRule {
        occurrence: Occurrence::Single,
        ..Default::default()
    };
    let anchor = date(2026, 3, 9);

    assert!(rule.applies_on(anchor, anchor));
    assert!(!rule.applies_on(anchor, date(2026, 3, 10)));
}

#[test]
fn weekly_matches_listed_weekdays_only() {
    // 0 = Sunday .. 6 = Saturday; anchor Monday 2026-03-02.
    let rule = RecurrenceRule {
        occurrence: Occurrence::Weekly,
        days_of_week: Some(vec![0, 6]),
        ..Default::default()
    };
    let anchor = date(2026, 3, 2);

    assert!(rule.applies_on(anchor, date(2026, 3, 7)), "Saturday is day 6");
    assert!(rule.applies_on(anchor, date(2026, 3, 8)), "Sunday is day 0");
    assert!(!rule.applies_on(anchor, date(2026, 3, 9)), "Monday is not listed");
}

#[test]
fn weekly_without_days_matches_the_anchor_weekday() {
    let rule = RecurrenceRule {
        occurrence: Occurrence::Weekly,
        ..Default::default()
    };
    let anchor = date(2026, 3, 4); // Wednesday

    assert!(rule.applies_on(anchor, date(2026, 3, 11)));
    assert!(!rule.applies_on(anchor, date(2026, 3, 12)));
}

#[test]
fn weekly_out_of_range_day_numbers_never_match() {
    let rule = RecurrenceRule {
        occurrence: Occurrence::Weekly,
        days_of_week: Some(vec![7, 9]),
        ..Default::default()
    };
    let anchor = date(2026, 3, 2);

    for offset in 0..7 {
        assert!(
            !rule.applies_on(anchor, date(2026, 3, 2 + offset)),
            "no real weekday carries number 7 or 9"
        );
    }
}

#[test]
fn monthly_matches_the_clamped_day_in_short_months() {
    let rule = RecurrenceRule {
        occurrence: Occurrence::Monthly,
        ..Default::default()
    };
    let anchor = date(2026, 1, 31);

    assert!(rule.applies_on(anchor, date(2026, 2, 28)), "Feb clamps 31 to 28");
    assert!(!rule.applies_on(anchor, date(2026, 2, 27)));
    assert!(rule.applies_on(anchor, date(2026, 3, 31)));
    assert!(!rule.applies_on(anchor, date(2026, 3, 30)));
}

#[test]
fn monthly_explicit_day_overrides_the_anchor_day() {
    let rule = RecurrenceRule {
        occurrence: Occurrence::Monthly,
        day_of_month: Some(15),
        ..Default::default()
    };
    let anchor = date(2026, 3, 10);

    assert!(rule.applies_on(anchor, date(2026, 3, 15)));
    assert!(rule.applies_on(anchor, date(2026, 4, 15)));
    assert!(!rule.applies_on(anchor, date(2026, 4, 10)), "anchor day is overridden");
}

#[test]
fn unsupported_never_applies() {
    let rule = RecurrenceRule {
        occurrence: Occurrence::Unsupported,
        ..Default::default()
    };
    let anchor = date(2026, 3, 9);

    assert!(!rule.applies_on(anchor, anchor));
    assert!(!rule.applies_on(anchor, date(2026, 3, 10)));
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[test]
fn rule_parses_camel_case_row_fields() {
    let rule: RecurrenceRule = serde_json::from_value(json!({
        "occurrenceType": "weekly",
        "daysOfWeek": [1, 3, 5],
        "recurrenceEndDate": "2026-04-06"
    }))
    .unwrap();

    assert_eq!(rule.occurrence, Occurrence::Weekly);
    assert_eq!(rule.days_of_week, Some(vec![1, 3, 5]));
    assert_eq!(rule.day_of_month, None);
    assert_eq!(rule.end_date, Some(date(2026, 4, 6)));
}

#[test]
fn unknown_occurrence_type_parses_as_unsupported() {
    let rule: RecurrenceRule = serde_json::from_value(json!({
        "occurrenceType": "quarterly"
    }))
    .unwrap();

    assert_eq!(rule.occurrence, Occurrence::Unsupported);
}

#[test]
fn missing_occurrence_type_parses_as_unsupported() {
    let rule: RecurrenceRule = serde_json::from_value(json!({})).unwrap();

    assert_eq!(rule.occurrence, Occurrence::Unsupported);
    assert_eq!(rule.days_of_week, None);
    assert_eq!(rule.end_date, None);
}

#[test]
fn rule_serializes_with_wire_names() {
    let rule = RecurrenceRule {
        occurrence: Occurrence::Monthly,
        day_of_month: Some(31),
        end_date: Some(date(2026, 6, 30)),
        ..Default::default()
    };
    let value = serde_json::to_value(&rule).unwrap();

    assert_eq!(value["occurrenceType"], "monthly");
    assert_eq!(value["dayOfMonth"], 31);
    assert_eq!(value["recurrenceEndDate"], "2026-06-30");
}
