//! Training plan calendar and aggregation engine
//!
//! Turns a periodized plan (macrocycle -> mesocycles -> daily workouts) into
//! ISO-week calendar rows, phase markers, rollups, a proportional timeline
//! and zone tables. The engines are pure functions of the plan snapshot and
//! today's date; `client` and `commands` fetch the snapshot from the coach
//! API and run them.

pub mod calendar;
pub mod client;
pub mod commands;
pub mod format;
pub mod models;
pub mod plan;
pub mod summary;
pub mod timeline;
pub mod zones;

#[cfg(test)]
mod test_utils;

pub use calendar::{build_calendar, Calendar, CalendarMode};
pub use client::{CoachApiClient, CoachApiConfig, CoachApiError};
pub use models::Plan;
pub use timeline::{build_timeline, Timeline};
