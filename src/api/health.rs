//! Health check endpoints

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::types::Json;

use super::state::AppState;

pub const GREETING: &str = "Hello World! SDB Sample Backend is running!";

/// Health check status
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    Ok,
    Error,
}

/// Liveness response: `{status, timestamp}`
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub timestamp: String,
}

/// Readiness response; `message` is present only when the store is unreachable
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadyResponse {
    pub status: HealthStatus,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// GET /
pub async fn root() -> &'static str {
    GREETING
}

/// GET /health
///
/// Never touches the store.
pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Ok,
        timestamp: timestamp(Utc::now()),
    };

    (StatusCode::OK, Json(response))
}

/// GET /ready
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.user_service.count().await {
        Ok(users) => (
            StatusCode::OK,
            Json(ReadyResponse {
                status: HealthStatus::Ok,
                timestamp: timestamp(Utc::now()),
                users: Some(users),
                message: None,
            }),
        ),
        Err(e) => {
            warn!(error = %e, "Readiness check failed");

            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadyResponse {
                    status: HealthStatus::Error,
                    timestamp: timestamp(Utc::now()),
                    users: None,
                    message: Some(e.to_string()),
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_health_status_serialization() {
        assert_eq!(serde_json::to_string(&HealthStatus::Ok).unwrap(), "\"OK\"");
        assert_eq!(
            serde_json::to_string(&HealthStatus::Error).unwrap(),
            "\"ERROR\""
        );
    }

    #[test]
    fn test_timestamp_format() {
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(timestamp(now), "2024-01-02T03:04:05.000Z");
    }

    #[test]
    fn test_ready_response_omits_empty_fields() {
        let response = ReadyResponse {
            status: HealthStatus::Ok,
            timestamp: "t".to_string(),
            users: Some(2),
            message: None,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"OK\""));
        assert!(json.contains("\"users\":2"));
        assert!(!json.contains("message"));
    }
}
