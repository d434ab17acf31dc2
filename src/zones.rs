//! Zone range model
//!
//! Turns an ordered zone set (heart rate or pace) into display rows: a
//! human-readable range and a bar width proportional to the zone's share
//! of the whole set. Also derives zone sets from threshold values.

use serde::Serialize;

use crate::format::format_pace;
use crate::models::{HrZone, HrZones, PaceZone, PaceZones};

/// ---------------------------------------------------------------------------
/// Constants
/// ---------------------------------------------------------------------------

/// Smallest bar width (percent) so narrow bands stay visible
pub const MIN_BAR_WIDTH_PCT: f64 = 8.0;
pub const MAX_BAR_WIDTH_PCT: f64 = 100.0;

/// Synthetic span for the open-ended top HR zone
const HR_OPEN_SPAN_BPM: f64 = 20.0;

/// Synthetic span for the open-ended fastest pace zone
const PACE_OPEN_SPAN_M_PER_S: f64 = 0.5;

/// ---------------------------------------------------------------------------
/// Zone Bands
/// ---------------------------------------------------------------------------

/// One band of an ordered zone set, with bounds on a single numeric axis
pub trait ZoneBand {
  /// Span assumed for a band with no upper bound
  const OPEN_SPAN: f64;

  fn zone(&self) -> u8;
  fn name(&self) -> &str;
  fn lower(&self) -> f64;
  fn upper(&self) -> Option<f64>;
  fn range_label(&self) -> String;

  fn effective_upper(&self) -> f64 {
    self.upper().unwrap_or(self.lower() + Self::OPEN_SPAN)
  }
}

impl ZoneBand for HrZone {
  const OPEN_SPAN: f64 = HR_OPEN_SPAN_BPM;

  fn zone(&self) -> u8 {
    self.zone
  }

  fn name(&self) -> &str {
    &self.name
  }

  fn lower(&self) -> f64 {
    f64::from(self.min_bpm)
  }

  fn upper(&self) -> Option<f64> {
    self.max_bpm.map(f64::from)
  }

  fn range_label(&self) -> String {
    match self.max_bpm {
      Some(max) => format!("{}–{} bpm", self.min_bpm, max),
      None => format!("{}+ bpm", self.min_bpm),
    }
  }
}

impl ZoneBand for PaceZone {
  const OPEN_SPAN: f64 = PACE_OPEN_SPAN_M_PER_S;

  fn zone(&self) -> u8 {
    self.zone
  }

  fn name(&self) -> &str {
    &self.name
  }

  fn lower(&self) -> f64 {
    self.min_pace_m_per_s
  }

  fn upper(&self) -> Option<f64> {
    self.max_pace_m_per_s
  }

  /// Pace reads slow-to-fast, so the numeric order flips: the lower speed
  /// bound is the larger min/km figure.
  fn range_label(&self) -> String {
    match self.max_pace_m_per_s {
      None => format!("< {} /km", format_pace(self.min_pace_m_per_s)),
      Some(max) if self.min_pace_m_per_s <= 0.0 => format!("> {} /km", format_pace(max)),
      Some(max) => format!(
        "{}–{} /km",
        format_pace(self.min_pace_m_per_s),
        format_pace(max)
      ),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Proportional Widths
/// ---------------------------------------------------------------------------

/// Span from the lowest lower bound to the highest effective upper bound.
/// Zero for an empty set.
pub fn total_range<Z: ZoneBand>(zones: &[Z]) -> f64 {
  if zones.is_empty() {
    return 0.0;
  }

  let min = zones.iter().map(|z| z.lower()).fold(f64::INFINITY, f64::min);
  let max = zones
    .iter()
    .map(|z| z.effective_upper())
    .fold(f64::NEG_INFINITY, f64::max);

  max - min
}

/// Bar width in percent, always within `[MIN_BAR_WIDTH_PCT, MAX_BAR_WIDTH_PCT]`.
///
/// A non-positive total range falls back to the floor width.
pub fn bar_width<Z: ZoneBand>(zone: &Z, total_range: f64) -> f64 {
  if !(total_range > 0.0) || !total_range.is_finite() {
    return MIN_BAR_WIDTH_PCT;
  }

  let width = (zone.effective_upper() - zone.lower()) / total_range * 100.0;
  if !width.is_finite() {
    return MIN_BAR_WIDTH_PCT;
  }
  width.clamp(MIN_BAR_WIDTH_PCT, MAX_BAR_WIDTH_PCT)
}

/// ---------------------------------------------------------------------------
/// Zone Table
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneRow {
  pub zone: u8,
  pub name: String,
  pub range: String,
  pub bar_width_pct: f64,
}

/// One display row per zone, in input order
pub fn zone_table<Z: ZoneBand>(zones: &[Z]) -> Vec<ZoneRow> {
  let total = total_range(zones);
  if zones.len() > 1 && total <= 0.0 {
    tracing::debug!(zones = zones.len(), "zone set has no span; using floor widths");
  }

  zones
    .iter()
    .map(|z| ZoneRow {
      zone: z.zone(),
      name: z.name().to_string(),
      range: z.range_label(),
      bar_width_pct: bar_width(z, total),
    })
    .collect()
}

/// ---------------------------------------------------------------------------
/// Zone Calculation
/// ---------------------------------------------------------------------------

/// Seven heart-rate zones from lactate threshold heart rate.
///
/// Zones 2-6 start at 82/89/94/100/105% of LTHR and zone 7 is open above
/// 110%. Bounds are whole bpm and inclusive, so each zone's max is the
/// next zone's min minus one.
pub fn calculate_hr_zones(lthr: u16) -> HrZones {
  let pct = |p: f64| -> u16 { (f64::from(lthr) * p).floor() as u16 };

  let z2_min = pct(0.82);
  let z2_max = pct(0.88);
  let z3_max = pct(0.93);
  let z4_max = pct(0.99);
  let z5_max = pct(1.04);
  let z6_max = pct(1.10);

  let band = |zone: u8, min: u16, max: Option<u16>, name: &str| HrZone {
    zone,
    min_bpm: min,
    max_bpm: max,
    name: name.to_string(),
  };

  HrZones {
    zones: vec![
      band(1, 0, Some(z2_min.saturating_sub(1)), "Recovery"),
      band(2, z2_min, Some(z2_max), "Aerobic Base"),
      band(3, z2_max.saturating_add(1), Some(z3_max), "Tempo"),
      band(4, z3_max.saturating_add(1), Some(z4_max), "SubThreshold"),
      band(5, z4_max.saturating_add(1), Some(z5_max), "Threshold"),
      band(6, z5_max.saturating_add(1), Some(z6_max), "VO2max"),
      band(7, z6_max.saturating_add(1), None, "Anaerobic"),
    ],
  }
}

/// Six pace zones from functional threshold pace (m/s).
///
/// Bounds are rounded to 0.01 m/s; a 0.01 offset at the zone 1 and zone 6
/// edges keeps neighbouring zones from sharing a value.
pub fn calculate_pace_zones(ftpace_m_per_s: f64) -> PaceZones {
  let fp = ftpace_m_per_s;
  let r2 = |v: f64| -> f64 { (v * 100.0).round() / 100.0 };

  let band = |zone: u8, min: f64, max: Option<f64>, name: &str| PaceZone {
    zone,
    min_pace_m_per_s: min,
    max_pace_m_per_s: max,
    name: name.to_string(),
  };

  PaceZones {
    zones: vec![
      band(1, 0.0, Some(r2(fp * 0.75 - 0.01)), "Recovery"),
      band(2, r2(fp * 0.75), Some(r2(fp * 0.85)), "Easy"),
      band(3, r2(fp * 0.86), Some(r2(fp * 0.95)), "Tempo"),
      band(4, r2(fp * 0.96), Some(r2(fp * 1.05)), "Threshold"),
      band(5, r2(fp * 1.06), Some(r2(fp * 1.20)), "VO2max"),
      band(6, r2(fp * 1.20 + 0.01), None, "Sprint"),
    ],
  }
}
