//! Week and mesocycle rollups

use chrono::NaiveDate;
use serde::Serialize;

use crate::calendar::{iso_weeks, week_start};
use crate::models::{Mesocycle, Phase, Plan, PlannedWorkout};
use crate::plan::all_workouts;

/// ---------------------------------------------------------------------------
/// Week Summary
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeekSummary {
  pub target_km: f64,
  pub target_tss: f64,
  pub target_minutes: i64,
  /// Non-rest workouts
  pub total_sessions: usize,
  /// Workouts marked complete, rest days included
  pub completed_sessions: usize,
}

/// Sum targets over a set of workouts. Missing values count as zero and an
/// empty set yields the zero summary.
pub fn summarize<'a, I>(workouts: I) -> WeekSummary
where
  I: IntoIterator<Item = &'a PlannedWorkout>,
{
  workouts.into_iter().fold(WeekSummary::default(), |mut acc, w| {
    acc.target_km += w.target_distance_km.unwrap_or(0.0);
    acc.target_tss += w.expected_tss.unwrap_or(0.0);
    acc.target_minutes += w.duration_min.unwrap_or(0);
    if !w.workout_type.is_rest() {
      acc.total_sessions += 1;
    }
    if w.is_completed {
      acc.completed_sessions += 1;
    }
    acc
  })
}

/// 1-based week number of `date` within `meso`, counted in ISO weeks from
/// the Monday of the mesocycle's start
pub fn week_of_mesocycle(meso: &Mesocycle, date: NaiveDate) -> i64 {
  let weeks = (week_start(date) - week_start(meso.start_date)).num_days().div_euclid(7);
  weeks + 1
}

/// `Week {n}` inside a mesocycle, otherwise the week's Monday as `Jan 5`
pub fn week_label(owner: Option<&Mesocycle>, monday: NaiveDate) -> String {
  match owner {
    Some(meso) => format!("Week {}", week_of_mesocycle(meso, monday)),
    None => monday.format("%b %-d").to_string(),
  }
}

/// ---------------------------------------------------------------------------
/// Mesocycle And Plan Rollups
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MesocycleSummary {
  pub mesocycle_id: i64,
  pub sequence_number: i64,
  pub phase: Phase,
  pub focus: String,
  /// `load_weeks + recovery_weeks`
  pub nominal_weeks: i64,
  /// ISO weeks touched by the mesocycle's dates
  pub actual_weeks: usize,
  pub target_volume_km: Option<f64>,
  pub totals: WeekSummary,
}

pub fn summarize_mesocycle(meso: &Mesocycle) -> MesocycleSummary {
  let actual_weeks = iso_weeks(meso.start_date, meso.end_date).len();
  let nominal_weeks = meso.nominal_weeks();
  if usize::try_from(nominal_weeks).ok() != Some(actual_weeks) {
    tracing::debug!(
      mesocycle_id = meso.id,
      nominal_weeks,
      actual_weeks,
      "mesocycle week counts disagree with its dates"
    );
  }

  MesocycleSummary {
    mesocycle_id: meso.id,
    sequence_number: meso.sequence_number,
    phase: meso.phase,
    focus: meso.focus.clone(),
    nominal_weeks,
    actual_weeks,
    target_volume_km: meso.target_volume_km,
    totals: summarize(meso.workouts.iter()),
  }
}

pub fn summarize_plan(plan: &Plan) -> WeekSummary {
  summarize(all_workouts(plan))
}

/// Average planned km per ISO week of the macrocycle, `None` for an empty span
pub fn average_weekly_km(plan: &Plan) -> Option<f64> {
  let weeks = iso_weeks(plan.macrocycle.start_date, plan.macrocycle.end_date).len();
  if weeks == 0 {
    return None;
  }
  Some(summarize_plan(plan).target_km / weeks as f64)
}
