use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration as StdDuration;
use url::Url;

use crate::models::{
  GeneratedPlan, MacrocycleSkeleton, Plan, PlannedWorkout, ProfileResponse, WorkoutDetail,
};

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const SESSION_COOKIE: &str = "session_id";

/// ---------------------------------------------------------------------------
/// Configuration
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct CoachApiConfig {
  pub base_url: Url,
  pub session_id: Option<String>,
  pub timeout: StdDuration,
}

impl CoachApiConfig {
  /// Read `COACH_API_BASE_URL`, `COACH_SESSION_ID` and
  /// `COACH_API_TIMEOUT_SECS`. Call [`load_dotenv`] first to pick up a
  /// `.env` file.
  pub fn from_env() -> Result<Self, CoachApiError> {
    let raw_url = env::var("COACH_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    let base_url = Url::parse(&raw_url)
      .map_err(|e| CoachApiError::InvalidConfig(format!("COACH_API_BASE_URL: {}", e)))?;

    let timeout_secs = match env::var("COACH_API_TIMEOUT_SECS") {
      Ok(raw) => raw
        .trim()
        .parse::<u64>()
        .map_err(|e| CoachApiError::InvalidConfig(format!("COACH_API_TIMEOUT_SECS: {}", e)))?,
      Err(_) => DEFAULT_TIMEOUT_SECS,
    };

    Ok(Self {
      base_url,
      session_id: env::var("COACH_SESSION_ID").ok().filter(|s| !s.is_empty()),
      timeout: StdDuration::from_secs(timeout_secs),
    })
  }

  /// Like [`from_env`](Self::from_env) but fails when no session is set
  pub fn from_env_authenticated() -> Result<Self, CoachApiError> {
    let config = Self::from_env()?;
    if config.session_id.is_none() {
      return Err(CoachApiError::MissingConfig("COACH_SESSION_ID".into()));
    }
    Ok(config)
  }
}

/// Load a `.env` file from the working directory, if present
pub fn load_dotenv() {
  if let Err(e) = dotenvy::dotenv() {
    tracing::debug!("no .env loaded: {}", e);
  }
}

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum CoachApiError {
  #[error("Missing configuration: {0}")]
  MissingConfig(String),

  #[error("Invalid configuration: {0}")]
  InvalidConfig(String),

  #[error("Invalid request: {0}")]
  InvalidRequest(String),

  #[error("HTTP request failed: {0}")]
  Request(#[from] reqwest::Error),

  #[error("Not authenticated with the coach API")]
  NotAuthenticated,

  #[error("Not found: {0}")]
  NotFound(String),

  #[error("Coach API error ({status}): {message}")]
  Api { status: u16, message: String },

  #[error("Failed to parse response: {0}")]
  Parse(String),

  #[error("Failed to serialize view: {0}")]
  Serialize(String),
}

impl Serialize for CoachApiError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

/// Error body the server sends with non-success statuses
#[derive(Debug, Deserialize)]
struct ErrorBody {
  error: String,
}

/// ---------------------------------------------------------------------------
/// Request Payloads
/// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct GenerateRequest {
  race_goal_id: i64,
}

/// Athlete feedback sent when marking a workout done
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompleteWorkoutRequest {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub rpe: Option<i64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub athlete_notes: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub actual_duration_min: Option<i64>,
}

/// ---------------------------------------------------------------------------
/// Client
/// ---------------------------------------------------------------------------

/// HTTP client for the plan, workout and profile endpoints
#[derive(Debug, Clone)]
pub struct CoachApiClient {
  http: Client,
  config: CoachApiConfig,
}

impl CoachApiClient {
  pub fn new(config: CoachApiConfig) -> Result<Self, CoachApiError> {
    let http = Client::builder().timeout(config.timeout).build()?;
    Ok(Self { http, config })
  }

  pub fn from_env() -> Result<Self, CoachApiError> {
    Self::new(CoachApiConfig::from_env()?)
  }

  pub fn config(&self) -> &CoachApiConfig {
    &self.config
  }

  fn endpoint(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.as_str().trim_end_matches('/'), path)
  }

  fn request(&self, method: Method, path: &str) -> RequestBuilder {
    let builder = self.http.request(method, self.endpoint(path));
    match &self.config.session_id {
      Some(session) => builder.header(
        reqwest::header::COOKIE,
        format!("{}={}", SESSION_COOKIE, session),
      ),
      None => builder,
    }
  }

  async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, CoachApiError> {
    let response = builder.send().await?;
    let response = check_status(response).await?;
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| CoachApiError::Parse(e.to_string()))
  }

  /// `GET /plan`: the active macrocycle with nested mesocycles and workouts
  pub async fn fetch_plan(&self) -> Result<Plan, CoachApiError> {
    tracing::debug!("fetching active plan");
    self.send(self.request(Method::GET, "/plan")).await
  }

  /// `GET /plan/workout/{id}`
  pub async fn fetch_workout(&self, workout_id: i64) -> Result<WorkoutDetail, CoachApiError> {
    tracing::debug!(workout_id, "fetching workout detail");
    self
      .send(self.request(Method::GET, &format!("/plan/workout/{}", workout_id)))
      .await
  }

  /// `GET /athlete/profile`: profile plus its HR and pace zones
  pub async fn fetch_profile(&self) -> Result<ProfileResponse, CoachApiError> {
    tracing::debug!("fetching athlete profile");
    self.send(self.request(Method::GET, "/athlete/profile")).await
  }

  /// `POST /plan/generate`: ask for a plan skeleton for a race goal
  pub async fn generate_plan(&self, race_goal_id: i64) -> Result<MacrocycleSkeleton, CoachApiError> {
    tracing::debug!(race_goal_id, "requesting plan skeleton");
    let builder = self
      .request(Method::POST, "/plan/generate")
      .json(&GenerateRequest { race_goal_id });
    self.send(builder).await
  }

  /// `POST /plan/confirm`: persist a skeleton and receive the full plan
  pub async fn confirm_plan(&self, skeleton: &MacrocycleSkeleton) -> Result<Plan, CoachApiError> {
    tracing::debug!(weeks = skeleton.total_weeks(), "confirming plan skeleton");
    let builder = self.request(Method::POST, "/plan/confirm").json(skeleton);
    let generated: GeneratedPlan = self.send(builder).await?;
    Ok(generated.into_plan())
  }

  /// `POST /plan/workouts/{id}/complete`
  pub async fn complete_workout(
    &self,
    workout_id: i64,
    feedback: &CompleteWorkoutRequest,
  ) -> Result<PlannedWorkout, CoachApiError> {
    if let Some(rpe) = feedback.rpe {
      if !(1..=10).contains(&rpe) {
        return Err(CoachApiError::InvalidRequest(format!(
          "RPE must be between 1 and 10, got {}",
          rpe
        )));
      }
    }

    tracing::debug!(workout_id, "marking workout complete");
    let builder = self
      .request(Method::POST, &format!("/plan/workouts/{}/complete", workout_id))
      .json(feedback);
    self.send(builder).await
  }
}

/// Map non-success statuses to typed errors, pulling the message out of an
/// `{"error": ...}` body when there is one
async fn check_status(response: Response) -> Result<Response, CoachApiError> {
  let status = response.status();
  if status.is_success() {
    return Ok(response);
  }

  let error_text = response.text().await.unwrap_or_default();
  let message = serde_json::from_str::<ErrorBody>(&error_text)
    .map(|b| b.error)
    .unwrap_or_else(|_| {
      if error_text.is_empty() {
        format!("HTTP {}", status.as_u16())
      } else {
        error_text
      }
    });

  tracing::warn!(status = status.as_u16(), %message, "coach API request failed");

  Err(match status {
    StatusCode::UNAUTHORIZED => CoachApiError::NotAuthenticated,
    StatusCode::NOT_FOUND => CoachApiError::NotFound(message),
    _ => CoachApiError::Api {
      status: status.as_u16(),
      message,
    },
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::Phase;
  use serial_test::serial;

  const PLAN_JSON: &str = r#"{
    "macrocycle": {
      "id": 3, "race_goal_id": 1, "start_date": "2026-01-05", "end_date": "2026-02-01",
      "target_ctl": 50.0, "status": "active", "coach_message": "Easy does it"
    },
    "mesocycles": [{
      "id": 7, "macrocycle_id": 3, "sequence_number": 1, "phase": "capacity",
      "focus": "aerobic_base", "load_weeks": 3, "recovery_weeks": 1,
      "target_volume_km": 40.0, "start_date": "2026-01-05", "end_date": "2026-02-01",
      "workouts": [{
        "id": 11, "mesocycle_id": 7, "scheduled_date": "2026-01-06",
        "workout_type": "easy_run", "duration_min": 45, "duration_category": "short",
        "target_distance_km": 8.0, "expected_tss": 40.0, "target_hr_zones": "Z2",
        "target_pace_zones": null, "description": "Easy", "coach_notes": null,
        "is_completed": 1, "completed_workout_id": 99
      }]
    }]
  }"#;

  fn test_client(server: &mockito::ServerGuard, session: Option<&str>) -> CoachApiClient {
    let config = CoachApiConfig {
      base_url: Url::parse(&server.url()).expect("mock server url"),
      session_id: session.map(String::from),
      timeout: StdDuration::from_secs(5),
    };
    CoachApiClient::new(config).expect("client builds")
  }

  #[tokio::test]
  async fn test_fetch_plan_sends_session_cookie() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
      .mock("GET", "/plan")
      .match_header("cookie", "session_id=abc123")
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(PLAN_JSON)
      .create_async()
      .await;

    let plan = test_client(&server, Some("abc123")).fetch_plan().await.expect("plan");
    mock.assert_async().await;

    assert_eq!(plan.macrocycle.id, 3);
    assert_eq!(plan.mesocycles[0].phase, Phase::Capacity);
    assert!(plan.mesocycles[0].workouts[0].is_completed);
  }

  #[tokio::test]
  async fn test_unauthorized_maps_to_not_authenticated() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
      .mock("GET", "/plan")
      .with_status(401)
      .with_body(r#"{"error":"Unauthorized"}"#)
      .create_async()
      .await;

    let result = test_client(&server, None).fetch_plan().await;
    assert!(matches!(result, Err(CoachApiError::NotAuthenticated)));
  }

  #[tokio::test]
  async fn test_not_found_carries_server_message() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
      .mock("GET", "/plan")
      .with_status(404)
      .with_body(r#"{"error":"No active training plan found"}"#)
      .create_async()
      .await;

    match test_client(&server, None).fetch_plan().await {
      Err(CoachApiError::NotFound(message)) => assert_eq!(message, "No active training plan found"),
      other => panic!("expected NotFound, got {:?}", other),
    }
  }

  #[tokio::test]
  async fn test_server_error_without_json_body() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
      .mock("GET", "/athlete/profile")
      .with_status(500)
      .with_body("")
      .create_async()
      .await;

    match test_client(&server, None).fetch_profile().await {
      Err(CoachApiError::Api { status, message }) => {
        assert_eq!(status, 500);
        assert_eq!(message, "HTTP 500");
      }
      other => panic!("expected Api error, got {:?}", other),
    }
  }

  #[tokio::test]
  async fn test_malformed_body_is_parse_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
      .mock("GET", "/plan/workout/5")
      .with_status(200)
      .with_body(r#"{"workout": 1}"#)
      .create_async()
      .await;

    let result = test_client(&server, None).fetch_workout(5).await;
    assert!(matches!(result, Err(CoachApiError::Parse(_))));
  }

  #[tokio::test]
  async fn test_generate_and_confirm_plan() {
    let mut server = mockito::Server::new_async().await;
    let skeleton_json = r#"{
      "target_ctl": 55.0,
      "coach_message": "Build then sharpen",
      "mesocycles": [{
        "sequence_number": 1, "phase": "capacity", "focus": "aerobic_base",
        "load_weeks": 3, "recovery_weeks": 1, "target_volume_km": 40.0
      }]
    }"#;
    let generate = server
      .mock("POST", "/plan/generate")
      .match_body(mockito::Matcher::Json(serde_json::json!({ "race_goal_id": 4 })))
      .with_status(201)
      .with_body(skeleton_json)
      .create_async()
      .await;

    let confirmed_json = r#"{
      "macrocycle": {
        "id": 1, "start_date": "2026-01-05", "end_date": "2026-02-01",
        "target_ctl": 55.0, "coach_message": null
      },
      "mesocycles": [{
        "id": 2, "sequence_number": 1, "phase": "capacity", "focus": "aerobic_base",
        "load_weeks": 3, "recovery_weeks": 1, "target_volume_km": 40.0,
        "start_date": "2026-01-05", "end_date": "2026-02-01"
      }],
      "workouts": [{
        "id": 9, "mesocycle_id": 2, "scheduled_date": "2026-01-05",
        "workout_type": "rest", "duration_min": null, "duration_category": null,
        "target_distance_km": null, "expected_tss": null, "target_hr_zones": null,
        "target_pace_zones": null, "description": null, "coach_notes": null,
        "is_completed": false, "completed_workout_id": null
      }]
    }"#;
    let confirm = server
      .mock("POST", "/plan/confirm")
      .with_status(201)
      .with_body(confirmed_json)
      .create_async()
      .await;

    let client = test_client(&server, Some("s"));
    let skeleton = client.generate_plan(4).await.expect("skeleton");
    assert_eq!(skeleton.total_weeks(), 4);

    let plan = client.confirm_plan(&skeleton).await.expect("plan");
    generate.assert_async().await;
    confirm.assert_async().await;

    assert_eq!(plan.mesocycles.len(), 1);
    assert_eq!(plan.mesocycles[0].workouts.len(), 1);
    assert!(plan.mesocycles[0].workouts[0].workout_type.is_rest());
  }

  #[tokio::test]
  async fn test_complete_workout_rejects_bad_rpe() {
    let server = mockito::Server::new_async().await;
    let feedback = CompleteWorkoutRequest {
      rpe: Some(11),
      ..Default::default()
    };
    let result = test_client(&server, None).complete_workout(1, &feedback).await;
    assert!(matches!(result, Err(CoachApiError::InvalidRequest(_))));
  }

  #[test]
  fn test_error_serializes_as_message() {
    let err = CoachApiError::Api {
      status: 502,
      message: "upstream".into(),
    };
    let json = serde_json::to_string(&err).expect("serialize");
    assert_eq!(json, "\"Coach API error (502): upstream\"");
  }

  #[test]
  #[serial]
  fn test_config_defaults() {
    temp_env::with_vars_unset(
      ["COACH_API_BASE_URL", "COACH_SESSION_ID", "COACH_API_TIMEOUT_SECS"],
      || {
        let config = CoachApiConfig::from_env().expect("defaults");
        assert_eq!(config.base_url.as_str(), "http://localhost:3000/api");
        assert!(config.session_id.is_none());
        assert_eq!(config.timeout, StdDuration::from_secs(10));
        assert!(matches!(
          CoachApiConfig::from_env_authenticated(),
          Err(CoachApiError::MissingConfig(_))
        ));
      },
    );
  }

  #[test]
  #[serial]
  fn test_config_from_env_values() {
    temp_env::with_vars(
      [
        ("COACH_API_BASE_URL", Some("https://coach.example.com/api/")),
        ("COACH_SESSION_ID", Some("sess-1")),
        ("COACH_API_TIMEOUT_SECS", Some("30")),
      ],
      || {
        let config = CoachApiConfig::from_env().expect("config");
        assert_eq!(config.session_id.as_deref(), Some("sess-1"));
        assert_eq!(config.timeout, StdDuration::from_secs(30));

        let client = CoachApiClient::new(config).expect("client");
        assert_eq!(client.endpoint("/plan"), "https://coach.example.com/api/plan");
      },
    );
  }

  #[test]
  #[serial]
  fn test_config_rejects_invalid_values() {
    temp_env::with_vars(
      [
        ("COACH_API_BASE_URL", Some("not a url")),
        ("COACH_API_TIMEOUT_SECS", None),
      ],
      || {
        assert!(matches!(
          CoachApiConfig::from_env(),
          Err(CoachApiError::InvalidConfig(_))
        ));
      },
    );

    temp_env::with_vars(
      [
        ("COACH_API_BASE_URL", None),
        ("COACH_API_TIMEOUT_SECS", Some("soon")),
      ],
      || {
        assert!(matches!(
          CoachApiConfig::from_env(),
          Err(CoachApiError::InvalidConfig(_))
        ));
      },
    );
  }
}
