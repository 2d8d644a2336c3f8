//! # timegrid-engine
//!
//! Deterministic recurrence expansion and week-grid overlap layout for org
//! schedules.
//!
//! The engine turns stored schedule rows (an anchor event plus a recurrence
//! rule) and one-off calendar events into positioned blocks on a 06:00-22:00
//! week grid. All computation is pure wall-clock arithmetic on civil dates:
//! inputs are already-resolved local times, outputs are deterministic, and
//! semantically unusual input yields empty output rather than an error.
//!
//! ## Modules
//!
//! - [`rule`] -- recurrence rule model and the shared day-matching predicate
//! - [`expander`] -- rule + anchor timestamps -> concrete occurrence instances
//! - [`blocks`] -- schedule/event rows -> per-day time blocks, clipped to the grid
//! - [`layout`] -- overlap-free column assignment for one day's blocks
//! - [`civil`] -- civil-date helpers (date keys, month clamping, weekday numbers)
//! - [`error`] -- error types

pub mod blocks;
pub mod civil;
pub mod error;
pub mod expander;
pub mod layout;
pub mod rule;

pub use blocks::{extract_blocks, BlockOrigin, EventRow, ScheduleRow, TimeBlock};
pub use error::GridError;
pub use expander::{expand, OccurrenceInstance};
pub use layout::{build_week_grid, layout_day, layout_week, PositionedBlock};
pub use rule::{Occurrence, RecurrenceRule};
