//! REST API Client
//!
//! Thin typed wrapper over the task API. Every request except the `/auth`
//! endpoints carries the session's bearer token.

use crate::constants::REQUEST_TIMEOUT_SECS;
use crate::domain::{AuthResponse, Credentials, RegisterRequest, Task, TaskPayload, User};
use crate::error::{Error, Result};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::{debug, warn};

/// Default API root
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:9090/api";

/// Path prefix that never receives the bearer token
const AUTH_PREFIX: &str = "/auth";

/// Which task list to load
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TaskScope {
    /// Tasks created by the signed-in user
    #[default]
    Mine,
    /// Tasks assigned to the signed-in user
    Assigned,
}

impl TaskScope {
    pub fn path(self) -> &'static str {
        match self {
            TaskScope::Mine => "/tasks/mine",
            TaskScope::Assigned => "/tasks/assigned",
        }
    }
}

/// Cheap to clone; clones share the token.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Arc<str>,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').into(),
            token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_token(&self, token: Option<String>) {
        if let Ok(mut guard) = self.token.write() {
            *guard = token;
        }
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|guard| guard.clone())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(method = %method, url = %url, "API request");
        let builder = self.http.request(method, url);
        if path.starts_with(AUTH_PREFIX) {
            return builder;
        }
        match self.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    // ==================== Auth ====================

    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse> {
        let response = self
            .request(Method::POST, "/auth/login")
            .json(credentials)
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse> {
        let response = self
            .request(Method::POST, "/auth/register")
            .json(request)
            .send()
            .await?;
        read_json(response).await
    }

    // ==================== Tasks ====================

    pub async fn tasks(&self, scope: TaskScope) -> Result<Vec<Task>> {
        let response = self.request(Method::GET, scope.path()).send().await?;
        read_json(response).await
    }

    pub async fn create_task(&self, payload: &TaskPayload) -> Result<Task> {
        let response = self
            .request(Method::POST, "/tasks")
            .json(payload)
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn update_task(&self, id: i64, payload: &TaskPayload) -> Result<Task> {
        let response = self
            .request(Method::PUT, &format!("/tasks/{id}"))
            .json(payload)
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn delete_task(&self, id: i64) -> Result<()> {
        let response = self
            .request(Method::DELETE, &format!("/tasks/{id}"))
            .send()
            .await?;
        check_status(response).await.map(|_| ())
    }

    // ==================== Users ====================

    pub async fn users(&self) -> Result<Vec<User>> {
        let response = self.request(Method::GET, "/users").send().await?;
        read_json(response).await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.token().is_some())
            .finish()
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let response = check_status(response).await?;
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Non-2xx answers become [`Error::Api`] with the server's `message`
/// (or `error`) field, else the status reason.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = server_message(&body).unwrap_or_else(|| default_message(status));
    warn!(status = status.as_u16(), message = %message, "API request failed");
    Err(Error::Api {
        status: status.as_u16(),
        message,
    })
}

fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|key| value.get(key).and_then(Value::as_str))
        .filter(|m| !m.trim().is_empty())
        .map(str::to_string)
}

fn default_message(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_extraction() {
        assert_eq!(
            server_message(r#"{"message":"Credenciales incorrectas"}"#).as_deref(),
            Some("Credenciales incorrectas")
        );
        assert_eq!(server_message(r#"{"error":"Forbidden"}"#).as_deref(), Some("Forbidden"));
        assert_eq!(server_message(r#"{"message":""}"#), None);
        assert_eq!(server_message("<html>"), None);
    }

    #[test]
    fn test_base_url_is_normalized() {
        let client = ApiClient::new("http://localhost:9090/api/").expect("client");
        assert_eq!(client.base_url(), "http://localhost:9090/api");
    }

    #[test]
    fn test_token_is_shared_between_clones() {
        let client = ApiClient::new(DEFAULT_API_BASE_URL).expect("client");
        let clone = client.clone();
        client.set_token(Some("abc".into()));
        assert_eq!(clone.token().as_deref(), Some("abc"));
        clone.set_token(None);
        assert!(client.token().is_none());
    }
}
