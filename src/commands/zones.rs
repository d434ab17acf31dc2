//! Zone table render pass

use std::ops::RangeInclusive;

use serde::Serialize;

use crate::client::CoachApiError;
use crate::commands::AppState;
use crate::models::{HrZones, PaceZones, ProfileResponse};
use crate::zones::{calculate_hr_zones, calculate_pace_zones, zone_table, ZoneRow};

/// LTHR values outside this range are treated as missing
const PLAUSIBLE_LTHR_BPM: RangeInclusive<i64> = 1..=300;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneTables {
  pub hr: Vec<ZoneRow>,
  pub pace: Vec<ZoneRow>,
}

/// Zones to show for a profile. Served zones win; when a set is missing it
/// is derived from the athlete's LTHR or threshold pace.
pub fn resolve_zones(profile: &ProfileResponse) -> (HrZones, PaceZones) {
  let hr = if profile.hr_zones.is_empty() {
    profile
      .profile
      .lthr
      .filter(|lthr| {
        let plausible = PLAUSIBLE_LTHR_BPM.contains(lthr);
        if !plausible {
          tracing::debug!(
            athlete_id = profile.profile.id,
            lthr,
            "implausible LTHR; skipping zones"
          );
        }
        plausible
      })
      .and_then(|lthr| u16::try_from(lthr).ok())
      .map(calculate_hr_zones)
      .unwrap_or_default()
  } else {
    profile.hr_zones.clone()
  };

  let pace = match &profile.pace_zones {
    Some(zones) if !zones.is_empty() => zones.clone(),
    _ => profile
      .profile
      .ftpace_m_per_s
      .filter(|fp| fp.is_finite() && *fp > 0.0)
      .map(calculate_pace_zones)
      .unwrap_or_default(),
  };

  (hr, pace)
}

pub fn build_zone_tables(profile: &ProfileResponse) -> ZoneTables {
  let (hr, pace) = resolve_zones(profile);
  if hr.is_empty() {
    tracing::debug!(athlete_id = profile.profile.id, "no heart-rate zones available");
  }
  if pace.is_empty() {
    tracing::debug!(athlete_id = profile.profile.id, "no pace zones available");
  }

  ZoneTables {
    hr: zone_table(&hr.zones),
    pace: zone_table(&pace.zones),
  }
}

/// Fetch the athlete profile and render both zone tables
pub async fn load_zone_tables(state: &AppState) -> Result<ZoneTables, CoachApiError> {
  let profile = state.client.fetch_profile().await?;
  Ok(build_zone_tables(&profile))
}
