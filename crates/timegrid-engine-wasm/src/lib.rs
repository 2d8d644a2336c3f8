//! WASM bindings for timegrid-engine.
//!
//! Exposes recurrence expansion, block extraction, and week-grid layout to
//! JavaScript via `wasm-bindgen`. All complex types cross the boundary as
//! JSON strings; timestamps arrive as ISO 8601 strings and leave in naive
//! `YYYY-MM-DDTHH:MM:SS` form, since the engine works in resolved local
//! wall-clock time.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p timegrid-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir packages/timegrid-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/timegrid_engine_wasm.wasm
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use timegrid_engine::blocks::{BlockOrigin, EventRow, ScheduleRow, TimeBlock};
use timegrid_engine::civil;
use timegrid_engine::expander::OccurrenceInstance;
use timegrid_engine::rule::{Occurrence, RecurrenceRule};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

/// Recurrence rule fields as JavaScript sends them, timestamps as strings.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RuleInput {
    occurrence_type: Option<String>,
    days_of_week: Option<Vec<u32>>,
    day_of_month: Option<u32>,
    recurrence_end_date: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleRowInput {
    id: String,
    title: String,
    start: String,
    end: Option<String>,
    #[serde(flatten)]
    rule: RuleInput,
    #[serde(rename = "originKind")]
    origin: BlockOrigin,
    #[serde(rename = "isOrgOwned", default)]
    org_owned: bool,
    owner_name: Option<String>,
    owner_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventRowInput {
    id: String,
    title: String,
    start: String,
    end: Option<String>,
    #[serde(default)]
    all_day: bool,
    #[serde(rename = "originKind")]
    origin: BlockOrigin,
    #[serde(rename = "isOrgOwned", default)]
    org_owned: bool,
    owner_name: Option<String>,
    owner_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InstanceDto {
    start_timestamp: String,
    end_timestamp: Option<String>,
    recurrence_index: u32,
}

impl From<&OccurrenceInstance> for InstanceDto {
    fn from(instance: &OccurrenceInstance) -> Self {
        Self {
            start_timestamp: format_wall_clock(instance.start),
            end_timestamp: instance.end.map(format_wall_clock),
            recurrence_index: instance.recurrence_index,
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers: wall-clock parsing and input conversion
// ---------------------------------------------------------------------------

/// Parse an ISO 8601 datetime string into a naive wall-clock value.
///
/// Accepts both RFC 3339 (an offset or `Z` suffix, which is dropped: the
/// local reading is kept as-is) and bare naive datetimes with optional
/// fractional seconds.
fn parse_wall_clock(s: &str) -> Result<NaiveDateTime, JsValue> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_local());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .map_err(|e| JsValue::from_str(&format!("Invalid datetime '{}': {}", s, e)))
}

fn format_wall_clock(ts: NaiveDateTime) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S").to_string()
}

fn parse_date_key(s: &str) -> Result<NaiveDate, JsValue> {
    civil::parse_date_key(s).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Optional boundary strings treat empty the same as absent.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

fn convert_rule(input: RuleInput) -> Result<RecurrenceRule, JsValue> {
    let end_date = match non_empty(input.recurrence_end_date).as_deref() {
        Some(s) => Some(parse_date_key(s)?),
        None => None,
    };
    Ok(RecurrenceRule {
        occurrence: Occurrence::from(input.occurrence_type.unwrap_or_default()),
        days_of_week: input.days_of_week,
        day_of_month: input.day_of_month,
        end_date,
    })
}

fn convert_schedule(input: ScheduleRowInput) -> Result<ScheduleRow, JsValue> {
    let end = match non_empty(input.end).as_deref() {
        Some(s) => Some(parse_wall_clock(s)?),
        None => None,
    };
    Ok(ScheduleRow {
        id: input.id,
        title: input.title,
        start: parse_wall_clock(&input.start)?,
        end,
        rule: convert_rule(input.rule)?,
        origin: input.origin,
        org_owned: input.org_owned,
        owner_name: input.owner_name,
        owner_id: input.owner_id,
    })
}

fn convert_event(input: EventRowInput) -> Result<EventRow, JsValue> {
    let end = match non_empty(input.end).as_deref() {
        Some(s) => Some(parse_wall_clock(s)?),
        None => None,
    };
    Ok(EventRow {
        id: input.id,
        title: input.title,
        start: parse_wall_clock(&input.start)?,
        end,
        all_day: input.all_day,
        origin: input.origin,
        org_owned: input.org_owned,
        owner_name: input.owner_name,
        owner_id: input.owner_id,
    })
}

fn parse_schedules_json(json: &str) -> Result<Vec<ScheduleRow>, JsValue> {
    let inputs: Vec<ScheduleRowInput> = serde_json::from_str(json)
        .map_err(|e| JsValue::from_str(&format!("Invalid schedules JSON: {}", e)))?;
    inputs.into_iter().map(convert_schedule).collect()
}

fn parse_events_json(json: &str) -> Result<Vec<EventRow>, JsValue> {
    let inputs: Vec<EventRowInput> = serde_json::from_str(json)
        .map_err(|e| JsValue::from_str(&format!("Invalid events JSON: {}", e)))?;
    inputs.into_iter().map(convert_event).collect()
}

/// Parse a JSON array of `YYYY-MM-DD` date keys.
fn parse_days_json(json: &str) -> Result<Vec<NaiveDate>, JsValue> {
    let keys: Vec<String> = serde_json::from_str(json)
        .map_err(|e| JsValue::from_str(&format!("Invalid days JSON: {}", e)))?;
    keys.iter().map(|key| parse_date_key(key)).collect()
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Expand a recurrence rule into concrete instances.
///
/// Returns a JSON string containing an array of
/// `{startTimestamp, endTimestamp, recurrenceIndex}` objects;
/// `endTimestamp` is `null` when the anchor has no end timestamp.
///
/// # Arguments
/// - `anchor_start` -- anchor start, ISO 8601 (e.g., "2026-03-09T18:00:00")
/// - `anchor_end` -- optional anchor end, same format
/// - `rule_json` -- JSON object with `occurrenceType`, `daysOfWeek`,
///   `dayOfMonth`, and `recurrenceEndDate` fields; a missing or unknown
///   `occurrenceType` expands to an empty array
#[wasm_bindgen(js_name = "expandRule")]
pub fn expand_rule(
    anchor_start: &str,
    anchor_end: Option<String>,
    rule_json: &str,
) -> Result<String, JsValue> {
    let start = parse_wall_clock(anchor_start)?;
    let end = match non_empty(anchor_end).as_deref() {
        Some(s) => Some(parse_wall_clock(s)?),
        None => None,
    };
    let rule_input: RuleInput = serde_json::from_str(rule_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid rule JSON: {}", e)))?;
    let rule = convert_rule(rule_input)?;

    let instances = timegrid_engine::expand(start, end, &rule);
    let dtos: Vec<InstanceDto> = instances.iter().map(InstanceDto::from).collect();
    to_json(&dtos)
}

/// Extract visible time blocks for a set of grid days.
///
/// `schedules_json` and `events_json` are JSON arrays of row objects;
/// `days_json` is a JSON array of `YYYY-MM-DD` date keys. Returns a JSON
/// object mapping each date key to its array of time blocks (minutes since
/// midnight, clipped to the 06:00-22:00 window).
#[wasm_bindgen(js_name = "extractBlocks")]
pub fn extract_blocks(
    schedules_json: &str,
    events_json: &str,
    days_json: &str,
) -> Result<String, JsValue> {
    let schedules = parse_schedules_json(schedules_json)?;
    let events = parse_events_json(events_json)?;
    let days = parse_days_json(days_json)?;

    let by_day = timegrid_engine::extract_blocks(&schedules, &events, &days);
    to_json(&by_day)
}

/// Lay out one day's blocks into overlap-free columns.
///
/// `blocks_json` must be a JSON array of time block objects (the shape
/// produced by [`extract_blocks`]). Returns a JSON string containing an
/// array of the same blocks with `column` and `totalColumns` added.
#[wasm_bindgen(js_name = "layoutDay")]
pub fn layout_day(blocks_json: &str) -> Result<String, JsValue> {
    let blocks: Vec<TimeBlock> = serde_json::from_str(blocks_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid blocks JSON: {}", e)))?;

    let placed = timegrid_engine::layout_day(blocks);
    to_json(&placed)
}

/// Extract and lay out a full week grid in one call.
///
/// Arguments are as for [`extract_blocks`]. Returns a JSON object mapping
/// each date key to its array of positioned blocks.
#[wasm_bindgen(js_name = "buildWeekGrid")]
pub fn build_week_grid(
    schedules_json: &str,
    events_json: &str,
    days_json: &str,
) -> Result<String, JsValue> {
    let schedules = parse_schedules_json(schedules_json)?;
    let events = parse_events_json(events_json)?;
    let days = parse_days_json(days_json)?;

    let grid = timegrid_engine::build_week_grid(&schedules, &events, &days);
    to_json(&grid)
}
