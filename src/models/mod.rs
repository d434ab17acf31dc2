pub mod plan;
pub mod zones;

pub use plan::{
  GeneratedPlan, Macrocycle, MacrocycleSkeleton, Mesocycle, MesocycleSkeleton, Phase, Plan,
  PlannedWorkout, WorkoutDetail, WorkoutType,
};
pub use zones::{AthleteProfile, HrZone, HrZones, PaceZone, PaceZones, ProfileResponse};
