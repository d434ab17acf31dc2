pub mod plan;
pub mod zones;

use chrono::NaiveDate;

use crate::client::{load_dotenv, CoachApiClient, CoachApiError};

/// Shared handle for command entry points
#[derive(Debug, Clone)]
pub struct AppState {
  pub client: CoachApiClient,
}

impl AppState {
  pub fn new(client: CoachApiClient) -> Self {
    Self { client }
  }

  /// Load `.env`, then build the API client from the environment
  pub fn from_env() -> Result<Self, CoachApiError> {
    load_dotenv();
    let client = CoachApiClient::from_env()?;
    tracing::info!(base_url = %client.config().base_url, "coach API client ready");
    Ok(Self::new(client))
  }
}

/// Today's calendar date in the local time zone
pub fn local_today() -> NaiveDate {
  chrono::Local::now().date_naive()
}
