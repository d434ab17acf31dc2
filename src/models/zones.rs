use serde::{Deserialize, Serialize};

/// ---------------------------------------------------------------------------
/// Heart-Rate Zones
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HrZone {
  pub zone: u8,
  pub min_bpm: u16,
  /// None for the open-ended top zone
  pub max_bpm: Option<u16>,
  pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct HrZones {
  pub zones: Vec<HrZone>,
}

impl HrZones {
  /// Zone whose inclusive range contains `bpm`
  pub fn zone_for_bpm(&self, bpm: u16) -> Option<&HrZone> {
    self.zones.iter().find(|z| {
      bpm >= z.min_bpm && z.max_bpm.map_or(true, |max| bpm <= max)
    })
  }

  pub fn len(&self) -> usize {
    self.zones.len()
  }

  pub fn is_empty(&self) -> bool {
    self.zones.is_empty()
  }
}

/// ---------------------------------------------------------------------------
/// Pace Zones (stored as speed in m/s, higher = faster)
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaceZone {
  pub zone: u8,
  pub min_pace_m_per_s: f64,
  /// None for the open-ended fastest zone
  pub max_pace_m_per_s: Option<f64>,
  pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PaceZones {
  pub zones: Vec<PaceZone>,
}

impl PaceZones {
  /// Zone whose inclusive range contains `speed` (m/s)
  pub fn zone_for_pace(&self, speed: f64) -> Option<&PaceZone> {
    self.zones.iter().find(|z| {
      speed >= z.min_pace_m_per_s && z.max_pace_m_per_s.map_or(true, |max| speed <= max)
    })
  }

  pub fn len(&self) -> usize {
    self.zones.len()
  }

  pub fn is_empty(&self) -> bool {
    self.zones.is_empty()
  }
}

/// ---------------------------------------------------------------------------
/// Athlete Profile (as served by `GET /athlete/profile`)
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AthleteProfile {
  pub id: i64,
  pub name: String,
  pub age: Option<i64>,
  pub weight_kg: Option<f64>,
  pub resting_hr: Option<i64>,
  pub max_hr: Option<i64>,
  pub lthr: Option<i64>,
  pub ftpace_m_per_s: Option<f64>,
  pub current_weekly_volume_km: Option<f64>,
  #[serde(default)]
  pub experience_level: String,
  pub sports_background: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
  pub profile: AthleteProfile,
  pub hr_zones: HrZones,
  pub pace_zones: Option<PaceZones>,
}
