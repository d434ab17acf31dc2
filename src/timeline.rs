//! Linear phase timeline
//!
//! Maps mesocycle spans and today's date onto a 0-100 scale of the
//! macrocycle. Widths are not renormalized, so small drift from 100% is
//! expected when mesocycles leave gaps or use exclusive end dates.

use chrono::NaiveDate;
use serde::Serialize;

use crate::format::{format_phase, format_workout_type};
use crate::models::{Mesocycle, Phase};

/// Segments at or below this width render without a phase label
pub const LABEL_MIN_WIDTH_PCT: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineSegment {
  pub mesocycle_id: i64,
  pub phase: Phase,
  pub width_pct: f64,
  /// Hover text: phase and focus
  pub title: String,
  /// Whether the segment is wide enough to show its phase name
  pub labelled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
  pub total_days: i64,
  pub segments: Vec<TimelineSegment>,
  /// Today's position, clamped to 0..=100
  pub today_pct: f64,
}

/// Lay out `mesocycles` across `[start, end]`.
///
/// Returns `None` for a zero or negative span. Day counts are end minus
/// start, not inclusive; an inverted mesocycle gets zero width.
pub fn build_timeline(
  mesocycles: &[Mesocycle],
  start: NaiveDate,
  end: NaiveDate,
  today: NaiveDate,
) -> Option<Timeline> {
  let total_days = (end - start).num_days();
  if total_days <= 0 {
    tracing::debug!(%start, %end, "degenerate macrocycle span; no timeline");
    return None;
  }
  let total = total_days as f64;

  let segments = mesocycles
    .iter()
    .map(|m| {
      let days = (m.end_date - m.start_date).num_days().max(0);
      let width_pct = days as f64 / total * 100.0;
      TimelineSegment {
        mesocycle_id: m.id,
        phase: m.phase,
        width_pct,
        title: format!("{} — {}", format_phase(m.phase), format_workout_type(&m.focus)),
        labelled: width_pct > LABEL_MIN_WIDTH_PCT,
      }
    })
    .collect();

  let today_offset = (today - start).num_days() as f64;
  let today_pct = (today_offset / total * 100.0).clamp(0.0, 100.0);

  Some(Timeline {
    total_days,
    segments,
    today_pct,
  })
}
