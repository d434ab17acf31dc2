use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// ---------------------------------------------------------------------------
/// Phase
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
  Capacity,
  Utilization,
  Taper,
  Recovery,
  Transition,
}

impl Phase {
  pub fn as_str(&self) -> &'static str {
    match self {
      Phase::Capacity => "capacity",
      Phase::Utilization => "utilization",
      Phase::Taper => "taper",
      Phase::Recovery => "recovery",
      Phase::Transition => "transition",
    }
  }
}

impl std::fmt::Display for Phase {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl std::str::FromStr for Phase {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "capacity" => Ok(Phase::Capacity),
      "utilization" => Ok(Phase::Utilization),
      "taper" => Ok(Phase::Taper),
      "recovery" => Ok(Phase::Recovery),
      "transition" => Ok(Phase::Transition),
      _ => Err(format!("Unknown phase: {}", s)),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Workout Type
/// ---------------------------------------------------------------------------

/// Workout tag as emitted by the plan generator.
///
/// The generator's vocabulary grows over time, so unknown tags are kept
/// verbatim in `Other` rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WorkoutType {
  EasyRun,
  RecoveryRun,
  LongRun,
  LongRunProgression,
  AerobicDevelopment,
  TempoRun,
  Vo2maxIntervals,
  Track200m,
  Track400m,
  Track800m,
  AnaerobicHills,
  AnaerobicFlat,
  AnaerobicPower,
  RaceSpecific,
  StrengthPrecision,
  StrengthPerformance,
  StrengthPower,
  Rest,
  Other(String),
}

impl WorkoutType {
  pub fn as_str(&self) -> &str {
    match self {
      WorkoutType::EasyRun => "easy_run",
      WorkoutType::RecoveryRun => "recovery_run",
      WorkoutType::LongRun => "long_run",
      WorkoutType::LongRunProgression => "long_run_progression",
      WorkoutType::AerobicDevelopment => "aerobic_development",
      WorkoutType::TempoRun => "tempo_run",
      WorkoutType::Vo2maxIntervals => "vo2max_intervals",
      WorkoutType::Track200m => "track_200m",
      WorkoutType::Track400m => "track_400m",
      WorkoutType::Track800m => "track_800m",
      WorkoutType::AnaerobicHills => "anaerobic_hills",
      WorkoutType::AnaerobicFlat => "anaerobic_flat",
      WorkoutType::AnaerobicPower => "anaerobic_power",
      WorkoutType::RaceSpecific => "race_specific",
      WorkoutType::StrengthPrecision => "strength_precision",
      WorkoutType::StrengthPerformance => "strength_performance",
      WorkoutType::StrengthPower => "strength_power",
      WorkoutType::Rest => "rest",
      WorkoutType::Other(tag) => tag.as_str(),
    }
  }

  /// Rest days carry no load and are not counted as sessions
  pub fn is_rest(&self) -> bool {
    matches!(self, WorkoutType::Rest)
  }
}

impl From<String> for WorkoutType {
  fn from(tag: String) -> Self {
    match tag.as_str() {
      "easy_run" => WorkoutType::EasyRun,
      "recovery_run" => WorkoutType::RecoveryRun,
      "long_run" => WorkoutType::LongRun,
      "long_run_progression" => WorkoutType::LongRunProgression,
      "aerobic_development" => WorkoutType::AerobicDevelopment,
      "tempo_run" => WorkoutType::TempoRun,
      "vo2max_intervals" => WorkoutType::Vo2maxIntervals,
      "track_200m" => WorkoutType::Track200m,
      "track_400m" => WorkoutType::Track400m,
      "track_800m" => WorkoutType::Track800m,
      "anaerobic_hills" => WorkoutType::AnaerobicHills,
      "anaerobic_flat" => WorkoutType::AnaerobicFlat,
      "anaerobic_power" => WorkoutType::AnaerobicPower,
      "race_specific" => WorkoutType::RaceSpecific,
      "strength_precision" => WorkoutType::StrengthPrecision,
      "strength_performance" => WorkoutType::StrengthPerformance,
      "strength_power" => WorkoutType::StrengthPower,
      "rest" => WorkoutType::Rest,
      _ => WorkoutType::Other(tag),
    }
  }
}

impl From<&str> for WorkoutType {
  fn from(tag: &str) -> Self {
    WorkoutType::from(tag.to_string())
  }
}

impl From<WorkoutType> for String {
  fn from(workout_type: WorkoutType) -> Self {
    match workout_type {
      WorkoutType::Other(tag) => tag,
      known => known.as_str().to_string(),
    }
  }
}

impl std::fmt::Display for WorkoutType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// ---------------------------------------------------------------------------
/// Plan Hierarchy
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Macrocycle {
  pub id: i64,
  #[serde(default)]
  pub race_goal_id: Option<i64>,
  pub start_date: NaiveDate,
  pub end_date: NaiveDate,
  pub target_ctl: Option<f64>,
  #[serde(default)]
  pub status: String,
  pub coach_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mesocycle {
  pub id: i64,
  #[serde(default)]
  pub macrocycle_id: i64,
  pub sequence_number: i64,
  pub phase: Phase,
  pub focus: String,
  pub load_weeks: i64,
  pub recovery_weeks: i64,
  pub target_volume_km: Option<f64>,
  pub start_date: NaiveDate,
  pub end_date: NaiveDate,
  #[serde(default)]
  pub workouts: Vec<PlannedWorkout>,
}

impl Mesocycle {
  /// Duration in weeks as prescribed by the generator. The dates win when
  /// the two disagree.
  pub fn nominal_weeks(&self) -> i64 {
    self.load_weeks + self.recovery_weeks
  }

  /// Inclusive containment on calendar dates
  pub fn contains(&self, date: NaiveDate) -> bool {
    date >= self.start_date && date <= self.end_date
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedWorkout {
  pub id: i64,
  pub mesocycle_id: i64,
  pub scheduled_date: NaiveDate,
  pub workout_type: WorkoutType,
  pub duration_min: Option<i64>,
  pub duration_category: Option<String>,
  pub target_distance_km: Option<f64>,
  pub expected_tss: Option<f64>,
  pub target_hr_zones: Option<String>,
  pub target_pace_zones: Option<String>,
  pub description: Option<String>,
  pub coach_notes: Option<String>,
  #[serde(default, deserialize_with = "flag_from_bool_or_int")]
  pub is_completed: bool,
  pub completed_workout_id: Option<i64>,
}

/// The server stores completion as a SQLite integer and serializes it as
/// `0`/`1`; newer payloads send a JSON bool.
fn flag_from_bool_or_int<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
  D: Deserializer<'de>,
{
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum Flag {
    Bool(bool),
    Int(i64),
  }

  Ok(match Flag::deserialize(deserializer)? {
    Flag::Bool(b) => b,
    Flag::Int(i) => i != 0,
  })
}

/// Immutable plan snapshot as served by `GET /plan`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
  pub macrocycle: Macrocycle,
  pub mesocycles: Vec<Mesocycle>,
}

impl Plan {
  /// Assemble a plan from the flat confirm payload, where workouts are
  /// listed separately and reference their mesocycle by id.
  ///
  /// Mesocycles are ordered by sequence number. Workouts whose mesocycle is
  /// missing are logged and left out.
  pub fn from_parts(
    macrocycle: Macrocycle,
    mut mesocycles: Vec<Mesocycle>,
    workouts: Vec<PlannedWorkout>,
  ) -> Self {
    mesocycles.sort_by_key(|m| m.sequence_number);

    for workout in workouts {
      match mesocycles.iter_mut().find(|m| m.id == workout.mesocycle_id) {
        Some(meso) => meso.workouts.push(workout),
        None => tracing::warn!(
          workout_id = workout.id,
          mesocycle_id = workout.mesocycle_id,
          "workout references unknown mesocycle; skipping"
        ),
      }
    }

    Self {
      macrocycle,
      mesocycles,
    }
  }
}

/// Flat payload returned by `POST /plan/confirm`
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedPlan {
  pub macrocycle: Macrocycle,
  pub mesocycles: Vec<Mesocycle>,
  #[serde(default)]
  pub workouts: Vec<PlannedWorkout>,
}

impl GeneratedPlan {
  pub fn into_plan(self) -> Plan {
    Plan::from_parts(self.macrocycle, self.mesocycles, self.workouts)
  }
}

/// Single workout with its mesocycle, as served by `GET /plan/workout/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutDetail {
  pub workout: PlannedWorkout,
  pub mesocycle: Mesocycle,
}

/// ---------------------------------------------------------------------------
/// Plan Skeleton (generator output before confirmation)
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacrocycleSkeleton {
  pub target_ctl: f64,
  pub coach_message: String,
  pub mesocycles: Vec<MesocycleSkeleton>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MesocycleSkeleton {
  pub sequence_number: i64,
  pub phase: Phase,
  pub focus: String,
  pub load_weeks: i64,
  pub recovery_weeks: i64,
  pub target_volume_km: f64,
}

impl MacrocycleSkeleton {
  /// Total nominal weeks across every block
  pub fn total_weeks(&self) -> i64 {
    self
      .mesocycles
      .iter()
      .map(|m| m.load_weeks + m.recovery_weeks)
      .sum()
  }
}
