//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - Plan and zone factories
//! - Date helpers
//! - Helper assertions

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::models::{
  HrZones, Macrocycle, Mesocycle, PaceZones, Phase, Plan, PlannedWorkout, WorkoutType,
};
use crate::zones::{calculate_hr_zones, calculate_pace_zones};

/// ---------------------------------------------------------------------------
/// Date Helpers
/// ---------------------------------------------------------------------------

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// Route `tracing` output through the test harness so anomaly warnings show
/// up with `--nocapture`. Safe to call from every test.
pub fn init_test_tracing() {
  let _ = tracing_subscriber::fmt()
    .with_test_writer()
    .with_max_level(tracing::Level::DEBUG)
    .try_init();
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

/// Workout with no targets; set fields on the result as needed
pub fn mock_workout(
  id: i64,
  mesocycle_id: i64,
  scheduled_date: NaiveDate,
  workout_type: WorkoutType,
) -> PlannedWorkout {
  PlannedWorkout {
    id,
    mesocycle_id,
    scheduled_date,
    workout_type,
    duration_min: None,
    duration_category: None,
    target_distance_km: None,
    expected_tss: None,
    target_hr_zones: None,
    target_pace_zones: None,
    description: None,
    coach_notes: None,
    is_completed: false,
    completed_workout_id: None,
  }
}

/// Workout with distance, duration and TSS targets
pub fn mock_session(
  id: i64,
  mesocycle_id: i64,
  scheduled_date: NaiveDate,
  workout_type: WorkoutType,
  km: f64,
  minutes: i64,
  tss: f64,
) -> PlannedWorkout {
  PlannedWorkout {
    target_distance_km: Some(km),
    duration_min: Some(minutes),
    expected_tss: Some(tss),
    ..mock_workout(id, mesocycle_id, scheduled_date, workout_type)
  }
}

pub fn mock_mesocycle(
  id: i64,
  sequence_number: i64,
  phase: Phase,
  start_date: NaiveDate,
  end_date: NaiveDate,
) -> Mesocycle {
  let weeks = ((end_date - start_date).num_days() + 1).max(0) / 7;
  Mesocycle {
    id,
    macrocycle_id: 1,
    sequence_number,
    phase,
    focus: format!("{}_focus", phase.as_str()),
    load_weeks: (weeks - 1).max(0),
    recovery_weeks: weeks.min(1),
    target_volume_km: Some(40.0),
    start_date,
    end_date,
    workouts: vec![],
  }
}

pub fn mock_plan(start_date: NaiveDate, end_date: NaiveDate, mesocycles: Vec<Mesocycle>) -> Plan {
  Plan {
    macrocycle: Macrocycle {
      id: 1,
      race_goal_id: Some(1),
      start_date,
      end_date,
      target_ctl: Some(55.0),
      status: "active".to_string(),
      coach_message: Some("Build the engine, then sharpen it.".to_string()),
    },
    mesocycles,
  }
}

/// Fill a mesocycle with a repeating week: easy Monday, tempo Wednesday,
/// rest Friday, long run Saturday. Ids continue from `next_id`.
pub fn fill_standard_weeks(meso: &mut Mesocycle, next_id: &mut i64) {
  let mut day = meso.start_date;
  while day <= meso.end_date {
    let workout = match day.weekday() {
      Weekday::Mon => Some(mock_session(*next_id, meso.id, day, WorkoutType::EasyRun, 8.0, 45, 40.0)),
      Weekday::Wed => Some(mock_session(*next_id, meso.id, day, WorkoutType::TempoRun, 10.0, 55, 70.0)),
      Weekday::Fri => Some(mock_workout(*next_id, meso.id, day, WorkoutType::Rest)),
      Weekday::Sat => Some(mock_session(*next_id, meso.id, day, WorkoutType::LongRun, 18.0, 100, 110.0)),
      _ => None,
    };
    if let Some(w) = workout {
      meso.workouts.push(w);
      *next_id += 1;
    }
    day += Duration::days(1);
  }
}

/// Twelve-week plan: capacity 2026-01-05..02-01, utilization
/// 2026-02-02..03-29. First-week sessions are completed.
pub fn two_phase_plan() -> Plan {
  let mut next_id = 1;
  let mut capacity = mock_mesocycle(1, 1, Phase::Capacity, date(2026, 1, 5), date(2026, 2, 1));
  let mut utilization =
    mock_mesocycle(2, 2, Phase::Utilization, date(2026, 2, 2), date(2026, 3, 29));
  fill_standard_weeks(&mut capacity, &mut next_id);
  fill_standard_weeks(&mut utilization, &mut next_id);

  for w in capacity.workouts.iter_mut() {
    if w.scheduled_date < date(2026, 1, 12) && !w.workout_type.is_rest() {
      w.is_completed = true;
    }
  }

  mock_plan(date(2026, 1, 5), date(2026, 3, 29), vec![capacity, utilization])
}

pub fn mock_hr_zones() -> HrZones {
  calculate_hr_zones(165)
}

pub fn mock_pace_zones() -> PaceZones {
  calculate_pace_zones(4.0)
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_two_phase_plan_shape() {
    let plan = two_phase_plan();
    assert_eq!(plan.mesocycles.len(), 2);
    // 4 workouts per week, 4 + 8 weeks
    assert_eq!(plan.mesocycles[0].workouts.len(), 16);
    assert_eq!(plan.mesocycles[1].workouts.len(), 32);
    assert_eq!(plan.mesocycles[0].nominal_weeks(), 4);

    let completed = plan.mesocycles[0]
      .workouts
      .iter()
      .filter(|w| w.is_completed)
      .count();
    assert_eq!(completed, 3);
  }

  #[test]
  fn test_workout_ids_are_unique() {
    let plan = two_phase_plan();
    let mut ids: Vec<i64> = plan
      .mesocycles
      .iter()
      .flat_map(|m| m.workouts.iter().map(|w| w.id))
      .collect();
    let total = ids.len();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), total);
  }
}
