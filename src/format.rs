//! Display formatting shared by the calendar, timeline and zone tables

use crate::models::Phase;

/// `long_run_progression` -> `Long Run Progression`
pub fn format_workout_type(snake_case: &str) -> String {
  snake_case
    .split('_')
    .filter(|word| !word.is_empty())
    .map(|word| {
      let mut chars = word.chars();
      match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
      }
    })
    .collect::<Vec<_>>()
    .join(" ")
}

pub fn format_phase(phase: Phase) -> String {
  format_workout_type(phase.as_str())
}

/// Minutes as `1h 35m`, `1h` or `45m`
pub fn format_minutes(minutes: i64) -> String {
  let hrs = minutes / 60;
  let mins = minutes % 60;
  match (hrs, mins) {
    (0, m) => format!("{}m", m),
    (h, 0) => format!("{}h", h),
    (h, m) => format!("{}h {}m", h, m),
  }
}

/// Speed in m/s as pace `M:SS` per km.
///
/// Zero or non-finite speeds have no pace and render as `--:--`.
pub fn format_pace(m_per_s: f64) -> String {
  if !m_per_s.is_finite() || m_per_s <= 0.0 {
    return "--:--".to_string();
  }

  // Round the total first so 59.6s never prints as ":60"
  let total_secs = (1000.0 / m_per_s).round() as i64;
  format!("{}:{:02}", total_secs / 60, total_secs % 60)
}
