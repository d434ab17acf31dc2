//! Plan render passes
//!
//! Each pass fetches what it needs from the coach API, then runs the pure
//! engines over the snapshot. Results are returned as JSON so a host can
//! hand them straight to a view layer.

use chrono::NaiveDate;
use serde::Serialize;

use crate::calendar::{build_calendar, Calendar, CalendarMode};
use crate::client::{CoachApiError, CompleteWorkoutRequest};
use crate::commands::AppState;
use crate::models::{MacrocycleSkeleton, Plan, PlannedWorkout, ProfileResponse, WorkoutDetail};
use crate::plan::{diagnose, mesocycle_for_date, todays_workout, week_workouts, PlanAnomaly};
use crate::summary::{
  summarize, summarize_mesocycle, summarize_plan, week_label, MesocycleSummary, WeekSummary,
};
use crate::timeline::{build_timeline, Timeline};

/// ---------------------------------------------------------------------------
/// Plan View
/// ---------------------------------------------------------------------------

/// Everything the plan page renders, borrowed from one snapshot
#[derive(Debug, Clone, Serialize)]
pub struct PlanView<'a> {
  pub today: NaiveDate,
  pub today_workout: Option<&'a PlannedWorkout>,
  pub calendar: Calendar<'a>,
  pub timeline: Option<Timeline>,
  pub totals: WeekSummary,
  pub mesocycles: Vec<MesocycleSummary>,
  pub anomalies: Vec<PlanAnomaly>,
}

pub fn build_plan_view(plan: &Plan, today: NaiveDate, mode: CalendarMode) -> PlanView<'_> {
  PlanView {
    today,
    today_workout: todays_workout(plan, today),
    calendar: build_calendar(plan, today, mode),
    timeline: build_timeline(
      &plan.mesocycles,
      plan.macrocycle.start_date,
      plan.macrocycle.end_date,
      today,
    ),
    totals: summarize_plan(plan),
    mesocycles: plan.mesocycles.iter().map(summarize_mesocycle).collect(),
    anomalies: diagnose(plan),
  }
}

fn to_json<T: Serialize>(value: &T) -> Result<serde_json::Value, CoachApiError> {
  serde_json::to_value(value).map_err(|e| CoachApiError::Serialize(e.to_string()))
}

/// Fetch the active plan and render the full plan page
pub async fn load_plan_view(
  state: &AppState,
  today: NaiveDate,
  mode: CalendarMode,
) -> Result<serde_json::Value, CoachApiError> {
  let plan = state.client.fetch_plan().await?;
  let view = build_plan_view(&plan, today, mode);
  tracing::info!(
    weeks = view.calendar.weeks.len(),
    anomalies = view.anomalies.len(),
    "rendered plan view"
  );
  to_json(&view)
}

/// ---------------------------------------------------------------------------
/// Dashboard
/// ---------------------------------------------------------------------------

/// Today's card plus the current week strip
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView<'a> {
  pub today: NaiveDate,
  pub athlete_name: String,
  pub today_workout: Option<&'a PlannedWorkout>,
  pub week_label: String,
  pub week_workouts: Vec<&'a PlannedWorkout>,
  pub week_summary: WeekSummary,
}

pub fn build_dashboard<'a>(
  plan: &'a Plan,
  profile: &ProfileResponse,
  today: NaiveDate,
) -> DashboardView<'a> {
  let mut workouts = week_workouts(plan, today);
  workouts.sort_by_key(|w| w.scheduled_date);
  let monday = crate::calendar::week_start(today);

  DashboardView {
    today,
    athlete_name: profile.profile.name.clone(),
    today_workout: todays_workout(plan, today),
    week_label: week_label(mesocycle_for_date(plan, monday), monday),
    week_summary: summarize(workouts.iter().copied()),
    week_workouts: workouts,
  }
}

/// Fetch plan and profile together and render the dashboard
pub async fn load_dashboard(
  state: &AppState,
  today: NaiveDate,
) -> Result<serde_json::Value, CoachApiError> {
  let (plan, profile) = tokio::try_join!(state.client.fetch_plan(), state.client.fetch_profile())?;
  to_json(&build_dashboard(&plan, &profile, today))
}

/// ---------------------------------------------------------------------------
/// Workouts And Plan Lifecycle
/// ---------------------------------------------------------------------------

pub async fn get_workout_detail(
  state: &AppState,
  workout_id: i64,
) -> Result<WorkoutDetail, CoachApiError> {
  state.client.fetch_workout(workout_id).await
}

pub async fn complete_workout(
  state: &AppState,
  workout_id: i64,
  feedback: CompleteWorkoutRequest,
) -> Result<PlannedWorkout, CoachApiError> {
  state.client.complete_workout(workout_id, &feedback).await
}

pub async fn generate_plan(
  state: &AppState,
  race_goal_id: i64,
) -> Result<MacrocycleSkeleton, CoachApiError> {
  state.client.generate_plan(race_goal_id).await
}

/// Confirm a skeleton and render the resulting plan right away
pub async fn confirm_plan(
  state: &AppState,
  skeleton: MacrocycleSkeleton,
  today: NaiveDate,
) -> Result<serde_json::Value, CoachApiError> {
  let plan = state.client.confirm_plan(&skeleton).await?;
  to_json(&build_plan_view(&plan, today, CalendarMode::Full))
}
