//! Plan flattener and lookups
//!
//! The plan arrives nested (macrocycle -> mesocycles -> workouts). These
//! helpers give date- and id-indexed views over it without copying or
//! mutating the snapshot. Upstream data quality issues are tolerated with
//! deterministic tie-breaks and reported through `diagnose`.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::calendar::{week_end, week_start};
use crate::models::{Mesocycle, Plan, PlannedWorkout};

/// ---------------------------------------------------------------------------
/// Flattening
/// ---------------------------------------------------------------------------

/// Every workout, in mesocycle order then in each mesocycle's own order.
///
/// Not re-sorted by date: well-formed plans are already chronological, but
/// callers needing strict date order must sort.
pub fn all_workouts(plan: &Plan) -> Vec<&PlannedWorkout> {
  plan
    .mesocycles
    .iter()
    .flat_map(|m| m.workouts.iter())
    .collect()
}

/// First workout scheduled on `today`. Extra same-day workouts are ignored
/// here and reported by `diagnose`.
pub fn todays_workout(plan: &Plan, today: NaiveDate) -> Option<&PlannedWorkout> {
  let mut matches = all_workouts(plan)
    .into_iter()
    .filter(|w| w.scheduled_date == today);

  let first = matches.next()?;
  let extra = matches.count();
  if extra > 0 {
    tracing::debug!(
      date = %today,
      workout_id = first.id,
      duplicates = extra,
      "multiple workouts scheduled on the same day; using the first"
    );
  }
  Some(first)
}

/// Workouts falling in the ISO week (Mon-Sun) that contains `date`
pub fn week_workouts(plan: &Plan, date: NaiveDate) -> Vec<&PlannedWorkout> {
  let start = week_start(date);
  let end = week_end(date);
  all_workouts(plan)
    .into_iter()
    .filter(|w| w.scheduled_date >= start && w.scheduled_date <= end)
    .collect()
}

/// ---------------------------------------------------------------------------
/// Mesocycle Lookups
/// ---------------------------------------------------------------------------

/// Mesocycle whose inclusive date range contains `date`. On overlap the
/// first in plan order wins; `diagnose` reports the overlap.
pub fn mesocycle_for_date(plan: &Plan, date: NaiveDate) -> Option<&Mesocycle> {
  plan.mesocycles.iter().find(|m| m.contains(date))
}

pub fn mesocycle_by_id(plan: &Plan, id: i64) -> Option<&Mesocycle> {
  plan.mesocycles.iter().find(|m| m.id == id)
}

/// Workout plus the mesocycle it references, for detail views
pub fn workout_with_mesocycle(
  plan: &Plan,
  workout_id: i64,
) -> Option<(&PlannedWorkout, Option<&Mesocycle>)> {
  let workout = all_workouts(plan).into_iter().find(|w| w.id == workout_id)?;
  Some((workout, mesocycle_by_id(plan, workout.mesocycle_id)))
}

/// ---------------------------------------------------------------------------
/// Diagnostics
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanAnomaly {
  /// Start after end. `mesocycle_id` is None for the macrocycle itself.
  InvertedRange {
    mesocycle_id: Option<i64>,
    start: NaiveDate,
    end: NaiveDate,
  },
  OverlappingMesocycles {
    first_id: i64,
    second_id: i64,
    from: NaiveDate,
    to: NaiveDate,
  },
  MesocycleGap {
    after_id: i64,
    before_id: i64,
    from: NaiveDate,
    to: NaiveDate,
  },
  DuplicateWorkoutDate {
    date: NaiveDate,
    workout_ids: Vec<i64>,
  },
  WorkoutOutOfRange {
    workout_id: i64,
    date: NaiveDate,
  },
}

/// Scan the plan for upstream generation problems. Every finding is also
/// logged; engine results are unaffected.
pub fn diagnose(plan: &Plan) -> Vec<PlanAnomaly> {
  let mut anomalies = Vec::new();
  let macro_start = plan.macrocycle.start_date;
  let macro_end = plan.macrocycle.end_date;

  if macro_start > macro_end {
    anomalies.push(PlanAnomaly::InvertedRange {
      mesocycle_id: None,
      start: macro_start,
      end: macro_end,
    });
  }

  for meso in &plan.mesocycles {
    if meso.start_date > meso.end_date {
      anomalies.push(PlanAnomaly::InvertedRange {
        mesocycle_id: Some(meso.id),
        start: meso.start_date,
        end: meso.end_date,
      });
    }
  }

  for (i, a) in plan.mesocycles.iter().enumerate() {
    for b in &plan.mesocycles[i + 1..] {
      let from = a.start_date.max(b.start_date);
      let to = a.end_date.min(b.end_date);
      if from <= to {
        anomalies.push(PlanAnomaly::OverlappingMesocycles {
          first_id: a.id,
          second_id: b.id,
          from,
          to,
        });
      }
    }
  }

  for pair in plan.mesocycles.windows(2) {
    let (prev, next) = (&pair[0], &pair[1]);
    let gap_from = prev.end_date + Duration::days(1);
    if next.start_date > gap_from {
      anomalies.push(PlanAnomaly::MesocycleGap {
        after_id: prev.id,
        before_id: next.id,
        from: gap_from,
        to: next.start_date - Duration::days(1),
      });
    }
  }

  let mut by_date: std::collections::BTreeMap<NaiveDate, Vec<i64>> =
    std::collections::BTreeMap::new();
  for w in all_workouts(plan) {
    by_date.entry(w.scheduled_date).or_default().push(w.id);
    if w.scheduled_date < macro_start || w.scheduled_date > macro_end {
      anomalies.push(PlanAnomaly::WorkoutOutOfRange {
        workout_id: w.id,
        date: w.scheduled_date,
      });
    }
  }
  for (date, workout_ids) in by_date {
    if workout_ids.len() > 1 {
      anomalies.push(PlanAnomaly::DuplicateWorkoutDate { date, workout_ids });
    }
  }

  for anomaly in &anomalies {
    tracing::warn!(?anomaly, "plan data anomaly");
  }

  anomalies
}
