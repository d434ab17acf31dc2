//! Week bucketing and calendar layout
//!
//! Rows are ISO weeks (Monday start). Every week that touches the
//! macrocycle span gets a row, plus any week holding an out-of-range
//! workout, so bucketing never loses data. Each row resolves its owning
//! mesocycle from its Monday and carries a phase marker when the owner
//! changes.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::format::{format_phase, format_workout_type};
use crate::models::{Mesocycle, Phase, Plan, PlannedWorkout};
use crate::plan::{all_workouts, mesocycle_for_date};
use crate::summary::{summarize, week_label, WeekSummary};

/// ---------------------------------------------------------------------------
/// ISO Week Arithmetic
/// ---------------------------------------------------------------------------

/// Monday of the ISO week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
  date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Sunday of the ISO week containing `date`
pub fn week_end(date: NaiveDate) -> NaiveDate {
  week_start(date) + Duration::days(6)
}

/// Mondays of every ISO week intersecting `[start, end]`, partial boundary
/// weeks included. Empty when `start > end`.
pub fn iso_weeks(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
  if start > end {
    tracing::debug!(%start, %end, "inverted week range; no weeks");
    return Vec::new();
  }

  let last = week_start(end);
  let mut weeks = Vec::new();
  let mut monday = week_start(start);
  while monday <= last {
    weeks.push(monday);
    monday += Duration::days(7);
  }
  weeks
}

/// ---------------------------------------------------------------------------
/// Week Buckets
/// ---------------------------------------------------------------------------

/// Group workouts by the Monday of their scheduled week, preserving input
/// order inside each week
pub fn bucket_workouts<'a, I>(workouts: I) -> BTreeMap<NaiveDate, Vec<&'a PlannedWorkout>>
where
  I: IntoIterator<Item = &'a PlannedWorkout>,
{
  let mut buckets: BTreeMap<NaiveDate, Vec<&'a PlannedWorkout>> = BTreeMap::new();
  for w in workouts {
    buckets.entry(week_start(w.scheduled_date)).or_default().push(w);
  }
  buckets
}

#[derive(Debug, Clone, Serialize)]
pub struct WeekBucket<'a> {
  pub week_start: NaiveDate,
  pub week_end: NaiveDate,
  /// Mesocycle active on the week's Monday
  pub mesocycle_id: Option<i64>,
  pub workouts: Vec<&'a PlannedWorkout>,
}

/// Ordered week buckets covering the macrocycle, empty weeks included.
///
/// Workouts dated outside the macrocycle are still bucketed by their own
/// week rather than dropped; `diagnose` reports them.
pub fn week_buckets(plan: &Plan) -> Vec<WeekBucket<'_>> {
  let start = plan.macrocycle.start_date;
  let end = plan.macrocycle.end_date;
  let mut grouped = bucket_workouts(all_workouts(plan));
  let mondays: BTreeSet<NaiveDate> = iso_weeks(start, end)
    .into_iter()
    .chain(grouped.keys().copied())
    .collect();

  mondays
    .into_iter()
    .map(|monday| WeekBucket {
      week_start: monday,
      week_end: monday + Duration::days(6),
      mesocycle_id: mesocycle_for_date(plan, monday).map(|m| m.id),
      workouts: grouped.remove(&monday).unwrap_or_default(),
    })
    .collect()
}

/// ---------------------------------------------------------------------------
/// Mesocycle Boundaries
/// ---------------------------------------------------------------------------

/// Flag the first week of each new owning mesocycle.
///
/// Weeks without an owner never carry a flag and do not reset the
/// comparison: a block resuming after a gap compares against the last
/// owned week. The first owned week is not a boundary.
pub fn phase_boundaries<T, I>(owners: I) -> Vec<bool>
where
  T: PartialEq + Copy,
  I: IntoIterator<Item = Option<T>>,
{
  let mut last_owner: Option<T> = None;
  owners
    .into_iter()
    .map(|owner| {
      let boundary = matches!((owner, last_owner), (Some(cur), Some(prev)) if cur != prev);
      if owner.is_some() {
        last_owner = owner;
      }
      boundary
    })
    .collect()
}

/// Divider shown before the first week of a new phase
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseMarker {
  pub mesocycle_id: i64,
  pub phase: Phase,
  pub focus: String,
  pub title: String,
}

impl PhaseMarker {
  pub fn for_mesocycle(meso: &Mesocycle) -> Self {
    Self {
      mesocycle_id: meso.id,
      phase: meso.phase,
      focus: meso.focus.clone(),
      title: format!("{} — {}", format_phase(meso.phase), format_workout_type(&meso.focus)),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Calendar Grid
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarMode {
  /// Seven-column grid, every week shown
  #[default]
  Full,
  /// Stacked list: empty weeks skipped, workouts sorted by date
  Condensed,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayCell<'a> {
  pub date: NaiveDate,
  pub is_today: bool,
  pub workout: Option<&'a PlannedWorkout>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarWeek<'a> {
  pub week_start: NaiveDate,
  pub week_end: NaiveDate,
  pub label: String,
  pub mesocycle_id: Option<i64>,
  pub is_current_week: bool,
  pub boundary: Option<PhaseMarker>,
  pub days: Vec<DayCell<'a>>,
  pub workouts: Vec<&'a PlannedWorkout>,
  pub summary: WeekSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct Calendar<'a> {
  pub mode: CalendarMode,
  pub weeks: Vec<CalendarWeek<'a>>,
  /// Row containing today, for scroll-to-today
  pub current_week_index: Option<usize>,
}

fn day_cells<'a>(
  monday: NaiveDate,
  today: NaiveDate,
  workouts: &[&'a PlannedWorkout],
) -> Vec<DayCell<'a>> {
  (0..7)
    .map(|offset| {
      let day = monday + Duration::days(offset);
      DayCell {
        date: day,
        is_today: day == today,
        workout: workouts.iter().copied().find(|w| w.scheduled_date == day),
      }
    })
    .collect()
}

/// Hand the pending marker to a row only if the row belongs to its mesocycle
fn take_marker_for(pending: &mut Option<PhaseMarker>, owner: Option<i64>) -> Option<PhaseMarker> {
  let belongs = pending
    .as_ref()
    .is_some_and(|marker| owner == Some(marker.mesocycle_id));
  if belongs {
    pending.take()
  } else {
    None
  }
}

/// Lay the plan out as calendar rows.
///
/// Boundaries are detected over the full week sequence. In condensed mode
/// a marker that falls on a skipped empty week moves to the next shown
/// week owned by the same mesocycle; rows without an owner never carry one.
pub fn build_calendar(plan: &Plan, today: NaiveDate, mode: CalendarMode) -> Calendar<'_> {
  let buckets = week_buckets(plan);
  let boundaries = phase_boundaries(buckets.iter().map(|b| b.mesocycle_id));
  let current_monday = week_start(today);

  let mut weeks = Vec::with_capacity(buckets.len());
  let mut pending_marker: Option<PhaseMarker> = None;

  for (bucket, is_boundary) in buckets.into_iter().zip(boundaries) {
    let owner = bucket.mesocycle_id.and_then(|id| plan.mesocycles.iter().find(|m| m.id == id));
    if is_boundary {
      pending_marker = owner.map(PhaseMarker::for_mesocycle);
    }

    if mode == CalendarMode::Condensed && bucket.workouts.is_empty() {
      continue;
    }

    let mut workouts = bucket.workouts;
    if mode == CalendarMode::Condensed {
      workouts.sort_by_key(|w| w.scheduled_date);
    }

    weeks.push(CalendarWeek {
      week_start: bucket.week_start,
      week_end: bucket.week_end,
      label: week_label(owner, bucket.week_start),
      mesocycle_id: bucket.mesocycle_id,
      is_current_week: bucket.week_start == current_monday,
      boundary: take_marker_for(&mut pending_marker, bucket.mesocycle_id),
      days: day_cells(bucket.week_start, today, &workouts),
      summary: summarize(workouts.iter().copied()),
      workouts,
    });
  }

  let current_week_index = weeks.iter().position(|w| w.is_current_week);
  Calendar {
    mode,
    weeks,
    current_week_index,
  }
}
