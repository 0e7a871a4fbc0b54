//! HTTP client for the user backend

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{User, UserId};

#[cfg(test)]
use mockall::automock;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors surfaced to the client page
#[derive(Debug, Error)]
pub enum ClientError {
    /// The backend answered with a non-success status
    #[error("Backend responded with status {0}")]
    Status(StatusCode),

    /// The backend could not be reached
    #[error("Failed to reach backend: {0}")]
    Network(String),

    #[error("Failed to decode backend response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Status(status)
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Body of `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatusBody {
    pub status: String,
    pub timestamp: String,
}

/// Body of `POST /users`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Calls the page makes against the backend
#[cfg_attr(test, automock)]
#[async_trait]
pub trait BackendClient: Send + Sync {
    async fn health(&self) -> Result<HealthStatusBody, ClientError>;

    async fn list_users(&self) -> Result<Vec<User>, ClientError>;

    async fn create_user(&self, request: &CreateUserRequest) -> Result<User, ClientError>;

    async fn delete_user(&self, id: UserId) -> Result<(), ClientError>;
}

/// reqwest-backed [`BackendClient`]
#[derive(Debug, Clone)]
pub struct HttpBackendClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackendClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();

    if status.is_success() {
        Ok(response)
    } else {
        Err(ClientError::Status(status))
    }
}

#[async_trait]
impl BackendClient for HttpBackendClient {
    async fn health(&self) -> Result<HealthStatusBody, ClientError> {
        let response = self.client.get(self.url("/health")).send().await?;

        Ok(ensure_success(response)?.json().await?)
    }

    async fn list_users(&self) -> Result<Vec<User>, ClientError> {
        let response = self.client.get(self.url("/users")).send().await?;

        Ok(ensure_success(response)?.json().await?)
    }

    async fn create_user(&self, request: &CreateUserRequest) -> Result<User, ClientError> {
        let response = self
            .client
            .post(self.url("/users"))
            .json(request)
            .send()
            .await?;

        Ok(ensure_success(response)?.json().await?)
    }

    async fn delete_user(&self, id: UserId) -> Result<(), ClientError> {
        let response = self
            .client
            .delete(self.url(&format!("/users/{}", id)))
            .send()
            .await?;

        ensure_success(response)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn user_json(id: i64, email: &str) -> serde_json::Value {
        json!({
            "id": id,
            "email": email,
            "name": null,
            "createdAt": "2024-01-01T00:00:00Z",
            "posts": []
        })
    }

    #[tokio::test]
    async fn test_health() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status": "OK", "timestamp": "2024-01-01T00:00:00Z"})),
            )
            .mount(&server)
            .await;

        let client = HttpBackendClient::new(server.uri()).unwrap();
        let health = client.health().await.unwrap();

        assert_eq!(health.status, "OK");
        assert_eq!(health.timestamp, "2024-01-01T00:00:00Z");
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = HttpBackendClient::new(server.uri()).unwrap();
        let err = client.health().await.unwrap_err();

        assert!(matches!(err, ClientError::Status(StatusCode::SERVICE_UNAVAILABLE)));
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let uri = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let client = HttpBackendClient::with_timeout(uri, Duration::from_secs(2)).unwrap();
        let err = client.list_users().await.unwrap_err();

        assert!(matches!(err, ClientError::Network(_)));
    }

    #[tokio::test]
    async fn test_list_users() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([user_json(1, "a@b.com"), user_json(2, "c@d.com")])),
            )
            .mount(&server)
            .await;

        let client = HttpBackendClient::new(format!("{}/", server.uri())).unwrap();
        let users = client.list_users().await.unwrap();

        assert_eq!(users.len(), 2);
        assert_eq!(users[1].email(), "c@d.com");
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = HttpBackendClient::new(server.uri()).unwrap();
        let err = client.list_users().await.unwrap_err();

        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[tokio::test]
    async fn test_create_user_omits_missing_name() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users"))
            .and(body_json(json!({"email": "a@b.com"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(user_json(1, "a@b.com")))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpBackendClient::new(server.uri()).unwrap();
        let request = CreateUserRequest {
            email: "a@b.com".to_string(),
            name: None,
        };

        let user = client.create_user(&request).await.unwrap();
        assert_eq!(user.id().value(), 1);
    }

    #[tokio::test]
    async fn test_delete_user() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/users/7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json(7, "a@b.com")))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/users/8"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = HttpBackendClient::new(server.uri()).unwrap();

        client.delete_user(UserId::new(7).unwrap()).await.unwrap();

        let err = client.delete_user(UserId::new(8).unwrap()).await.unwrap_err();
        assert!(matches!(err, ClientError::Status(StatusCode::NOT_FOUND)));
    }
}
