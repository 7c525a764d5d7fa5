//! Authenticated HTTP client with transparent token refresh.
//!
//! Every request reads the current access token from the credential store at
//! send-time and attaches it as a bearer header. A 401 answer triggers at most
//! one refresh-and-replay per logical request; the replay's outcome is final.

use anyhow::{Context, Result};
use log::{debug, warn};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use super::error::ApiError;
use crate::auth::{CredentialStore, keys};

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Construction options for [`ApiClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Fixed timeout applied to every request. Timeouts are network errors
    /// and never engage the refresh path.
    pub timeout: Duration,
    /// Clear all stored credentials when a token refresh fails. Off by
    /// default; the calling layer decides when to sign the user out.
    pub clear_on_refresh_failure: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            clear_on_refresh_failure: false,
        }
    }
}

/// HTTP client bound to the Ecovia API base URL and a credential store.
pub struct ApiClient {
    client: Client,
    base_url: String,
    store: Arc<dyn CredentialStore>,
    clear_on_refresh_failure: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    access_token: String,
    /// Servers may rotate the refresh token; when absent the old one stays.
    refresh_token: Option<String>,
}

impl ApiClient {
    /// Creates a client for the given base URL (origin plus versioned
    /// prefix, e.g. `https://api.ecovia.app/api/v1`).
    pub fn new(
        base_url: impl Into<String>,
        store: Arc<dyn CredentialStore>,
        options: ClientOptions,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("ecovia-cli/", env!("CARGO_PKG_VERSION")))
            .timeout(options.timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            store,
            clear_on_refresh_failure: options.clear_on_refresh_failure,
        })
    }

    /// Returns a reference to the underlying reqwest Client.
    pub fn inner(&self) -> &Client {
        &self.client
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    pub async fn get(&self, path: &str) -> Result<Response> {
        self.request(Method::GET, path, None, &[]).await
    }

    pub async fn get_with_query(&self, path: &str, query: &[(&str, String)]) -> Result<Response> {
        self.request(Method::GET, path, None, query).await
    }

    pub async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<Response> {
        let body = serde_json::to_value(body).context("Failed to serialize request body")?;
        self.request(Method::POST, path, Some(body), &[]).await
    }

    /// POST with no body, for RSVP-style endpoints.
    pub async fn post_empty(&self, path: &str) -> Result<Response> {
        self.request(Method::POST, path, None, &[]).await
    }

    pub async fn put<B: Serialize>(&self, path: &str, body: &B) -> Result<Response> {
        let body = serde_json::to_value(body).context("Failed to serialize request body")?;
        self.request(Method::PUT, path, Some(body), &[]).await
    }

    pub async fn delete(&self, path: &str) -> Result<Response> {
        self.request(Method::DELETE, path, None, &[]).await
    }

    /// Performs a GET request and deserializes the JSON response.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.get(path).await?;
        response
            .json::<T>()
            .await
            .context("Failed to parse JSON response")
    }

    /// Performs a GET request with query parameters and deserializes the
    /// JSON response.
    pub async fn get_json_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let response = self.get_with_query(path, query).await?;
        response
            .json::<T>()
            .await
            .context("Failed to parse JSON response")
    }

    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.post(path, body).await?;
        response
            .json::<T>()
            .await
            .context("Failed to parse JSON response")
    }

    pub async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.put(path, body).await?;
        response
            .json::<T>()
            .await
            .context("Failed to parse JSON response")
    }

    /// Issues a request, refreshing the access token and replaying once if
    /// the first attempt comes back 401. Returns the 2xx response as-is;
    /// any other outcome is an error carrying the status and body.
    #[tracing::instrument(skip(self, body, query))]
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        query: &[(&str, String)],
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}...", method, url);

        // First attempt: whatever access token is currently stored. No
        // stored token is fine; the server decides whether to reject.
        let token = self.store.get(keys::ACCESS_TOKEN).await?;
        let response = self
            .send(&method, &url, body.as_ref(), query, token.as_deref())
            .await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Self::into_result(response).await;
        }

        let Some(refresh_token) = self.store.get(keys::REFRESH_TOKEN).await? else {
            debug!("{} {} rejected and no refresh token is stored", method, url);
            return Err(ApiError::from_response(response).await.into());
        };

        let access_token = match self.refresh_access_token(&refresh_token).await {
            Ok(token) => token,
            Err(e) => {
                // A failed refresh is a stronger signal than the original
                // 401 and surfaces in its place.
                if self.clear_on_refresh_failure {
                    warn!("Token refresh failed, clearing stored credentials");
                    self.store
                        .remove(&[keys::ACCESS_TOKEN, keys::REFRESH_TOKEN, keys::USER_PROFILE])
                        .await?;
                }
                return Err(e);
            }
        };

        // Single replay with the fresh token. Whatever it returns is the
        // final result; a second 401 is terminal.
        debug!("Replaying {} {} with refreshed access token", method, url);
        let replay = self
            .send(&method, &url, body.as_ref(), query, Some(&access_token))
            .await?;
        Self::into_result(replay).await
    }

    async fn send(
        &self,
        method: &Method,
        url: &str,
        body: Option<&Value>,
        query: &[(&str, String)],
        bearer: Option<&str>,
    ) -> Result<Response> {
        let mut request = self.client.request(method.clone(), url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        request.send().await.context("Failed to send request")
    }

    async fn into_result(response: Response) -> Result<Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(ApiError::from_response(response).await.into())
        }
    }

    /// Exchanges the refresh token for a new access token and persists it.
    #[tracing::instrument(skip(self, refresh_token))]
    async fn refresh_access_token(&self, refresh_token: &str) -> Result<String> {
        debug!("Access token rejected, requesting a new one...");

        let url = format!("{}/auth/refresh", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&RefreshRequest { refresh_token })
            .send()
            .await
            .context("Failed to send token refresh request")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::RefreshFailed { status, body }.into());
        }

        let refreshed: RefreshResponse = response
            .json()
            .await
            .context("Failed to parse token refresh response")?;

        self.store
            .set(keys::ACCESS_TOKEN, &refreshed.access_token)
            .await?;
        if let Some(rotated) = &refreshed.refresh_token {
            self.store.set(keys::REFRESH_TOKEN, rotated).await?;
        }

        Ok(refreshed.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryStore;
    use mockito::Matcher;

    async fn seeded_store(access: Option<&str>, refresh: Option<&str>) -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        if let Some(token) = access {
            store.set(keys::ACCESS_TOKEN, token).await.unwrap();
        }
        if let Some(token) = refresh {
            store.set(keys::REFRESH_TOKEN, token).await.unwrap();
        }
        store
    }

    fn client_for(url: &str, store: Arc<MemoryStore>) -> ApiClient {
        ApiClient::new(url, store, ClientOptions::default()).unwrap()
    }

    #[tokio::test]
    async fn test_request_without_stored_token_sends_no_authorization() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/accommodations")
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let client = client_for(&server.url(), seeded_store(None, None).await);
        let response = client.get("/accommodations").await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_request_attaches_stored_bearer_token() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/accommodations")
            .match_header("authorization", "Bearer A1")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let store = seeded_store(Some("A1"), Some("R1")).await;
        let client = client_for(&server.url(), store);
        client.get("/accommodations").await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_401_refreshes_and_replays_with_new_token() {
        let mut server = mockito::Server::new_async().await;

        let stale = server
            .mock("GET", "/accommodations")
            .match_header("authorization", "Bearer A1")
            .with_status(401)
            .create_async()
            .await;

        let refresh = server
            .mock("POST", "/auth/refresh")
            .match_body(Matcher::Json(serde_json::json!({"refreshToken": "R1"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"accessToken": "A2"}"#)
            .create_async()
            .await;

        let replay = server
            .mock("GET", "/accommodations")
            .match_header("authorization", "Bearer A2")
            .with_status(200)
            .with_body(r#"[{"ok": true}]"#)
            .create_async()
            .await;

        let store = seeded_store(Some("A1"), Some("R1")).await;
        let client = client_for(&server.url(), store.clone());
        let response = client.get("/accommodations").await.unwrap();

        stale.assert_async().await;
        refresh.assert_async().await;
        replay.assert_async().await;
        assert_eq!(response.status(), StatusCode::OK);

        // The new access token is persisted; the refresh token was not
        // rotated by the server, so the old one stays.
        assert_eq!(
            store.get(keys::ACCESS_TOKEN).await.unwrap().as_deref(),
            Some("A2")
        );
        assert_eq!(
            store.get(keys::REFRESH_TOKEN).await.unwrap().as_deref(),
            Some("R1")
        );
    }

    #[tokio::test]
    async fn test_rotated_refresh_token_is_persisted() {
        let mut server = mockito::Server::new_async().await;

        let _stale = server
            .mock("GET", "/users/profile")
            .match_header("authorization", "Bearer A1")
            .with_status(401)
            .create_async()
            .await;

        let _refresh = server
            .mock("POST", "/auth/refresh")
            .with_status(200)
            .with_body(r#"{"accessToken": "A2", "refreshToken": "R2"}"#)
            .create_async()
            .await;

        let _replay = server
            .mock("GET", "/users/profile")
            .match_header("authorization", "Bearer A2")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let store = seeded_store(Some("A1"), Some("R1")).await;
        let client = client_for(&server.url(), store.clone());
        client.get("/users/profile").await.unwrap();

        assert_eq!(
            store.get(keys::REFRESH_TOKEN).await.unwrap().as_deref(),
            Some("R2")
        );
    }

    #[tokio::test]
    async fn test_second_401_on_replay_is_terminal() {
        let mut server = mockito::Server::new_async().await;

        let stale = server
            .mock("GET", "/accommodations")
            .match_header("authorization", "Bearer A1")
            .with_status(401)
            .expect(1)
            .create_async()
            .await;

        let refresh = server
            .mock("POST", "/auth/refresh")
            .with_status(200)
            .with_body(r#"{"accessToken": "A2"}"#)
            .expect(1)
            .create_async()
            .await;

        let replay = server
            .mock("GET", "/accommodations")
            .match_header("authorization", "Bearer A2")
            .with_status(401)
            .expect(1)
            .create_async()
            .await;

        let store = seeded_store(Some("A1"), Some("R1")).await;
        let client = client_for(&server.url(), store);
        let err = client.get("/accommodations").await.unwrap_err();

        // Exactly one refresh, exactly one replay, no third attempt.
        stale.assert_async().await;
        refresh.assert_async().await;
        replay.assert_async().await;

        let api_err = err.downcast_ref::<ApiError>().unwrap();
        assert!(matches!(api_err, ApiError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_401_without_refresh_token_returns_original_error() {
        let mut server = mockito::Server::new_async().await;

        let unauthorized = server
            .mock("GET", "/users/profile")
            .with_status(401)
            .with_body(r#"{"message": "token expired"}"#)
            .create_async()
            .await;

        let refresh = server
            .mock("POST", "/auth/refresh")
            .expect(0)
            .create_async()
            .await;

        let store = seeded_store(Some("A1"), None).await;
        let client = client_for(&server.url(), store);
        let err = client.get("/users/profile").await.unwrap_err();

        unauthorized.assert_async().await;
        refresh.assert_async().await;

        let api_err = err.downcast_ref::<ApiError>().unwrap();
        assert!(matches!(api_err, ApiError::Unauthorized { .. }));
        assert!(api_err.body().contains("token expired"));
    }

    #[tokio::test]
    async fn test_refresh_failure_surfaces_instead_of_original_401() {
        let mut server = mockito::Server::new_async().await;

        let _stale = server
            .mock("GET", "/accommodations")
            .with_status(401)
            .create_async()
            .await;

        let refresh = server
            .mock("POST", "/auth/refresh")
            .with_status(403)
            .with_body(r#"{"message": "refresh token revoked"}"#)
            .create_async()
            .await;

        let store = seeded_store(Some("A1"), Some("R1")).await;
        let client = client_for(&server.url(), store.clone());
        let err = client.get("/accommodations").await.unwrap_err();

        refresh.assert_async().await;

        let api_err = err.downcast_ref::<ApiError>().unwrap();
        assert!(matches!(api_err, ApiError::RefreshFailed { .. }));
        assert_eq!(api_err.status(), StatusCode::FORBIDDEN);

        // Default policy leaves stored credentials alone.
        assert_eq!(
            store.get(keys::ACCESS_TOKEN).await.unwrap().as_deref(),
            Some("A1")
        );
    }

    #[tokio::test]
    async fn test_refresh_failure_clears_store_when_configured() {
        let mut server = mockito::Server::new_async().await;

        let _stale = server
            .mock("GET", "/accommodations")
            .with_status(401)
            .create_async()
            .await;

        let _refresh = server
            .mock("POST", "/auth/refresh")
            .with_status(403)
            .create_async()
            .await;

        let store = seeded_store(Some("A1"), Some("R1")).await;
        let options = ClientOptions {
            clear_on_refresh_failure: true,
            ..ClientOptions::default()
        };
        let client = ApiClient::new(server.url(), store.clone(), options).unwrap();
        let err = client.get("/accommodations").await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::RefreshFailed { .. })
        ));
        assert_eq!(store.get(keys::ACCESS_TOKEN).await.unwrap(), None);
        assert_eq!(store.get(keys::REFRESH_TOKEN).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_non_401_errors_never_trigger_refresh() {
        let mut server = mockito::Server::new_async().await;

        let failing = server
            .mock("GET", "/accommodations")
            .with_status(500)
            .create_async()
            .await;

        let refresh = server
            .mock("POST", "/auth/refresh")
            .expect(0)
            .create_async()
            .await;

        let store = seeded_store(Some("A1"), Some("R1")).await;
        let client = client_for(&server.url(), store);
        let err = client.get("/accommodations").await.unwrap_err();

        failing.assert_async().await;
        refresh.assert_async().await;

        let api_err = err.downcast_ref::<ApiError>().unwrap();
        assert!(matches!(api_err, ApiError::Status { .. }));
        assert_eq!(api_err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_identical_requests_are_independent_network_calls() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/accommodations")
            .with_status(200)
            .with_body("[]")
            .expect(2)
            .create_async()
            .await;

        let store = seeded_store(Some("A1"), Some("R1")).await;
        let client = client_for(&server.url(), store);
        client.get("/accommodations").await.unwrap();
        client.get("/accommodations").await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_replay_resends_body() {
        let mut server = mockito::Server::new_async().await;

        let body = serde_json::json!({"rating": 5, "comment": "quiet and green"});

        let _stale = server
            .mock("POST", "/accommodations/a1/reviews")
            .match_header("authorization", "Bearer A1")
            .with_status(401)
            .create_async()
            .await;

        let _refresh = server
            .mock("POST", "/auth/refresh")
            .with_status(200)
            .with_body(r#"{"accessToken": "A2"}"#)
            .create_async()
            .await;

        let replay = server
            .mock("POST", "/accommodations/a1/reviews")
            .match_header("authorization", "Bearer A2")
            .match_body(Matcher::Json(body.clone()))
            .with_status(201)
            .with_body("{}")
            .create_async()
            .await;

        let store = seeded_store(Some("A1"), Some("R1")).await;
        let client = client_for(&server.url(), store);
        let response = client
            .post("/accommodations/a1/reviews", &body)
            .await
            .unwrap();

        replay.assert_async().await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_get_json_deserializes_payload() {
        let mut server = mockito::Server::new_async().await;

        let _mock = server
            .mock("GET", "/test")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name": "test", "value": 42}"#)
            .create_async()
            .await;

        #[derive(serde::Deserialize)]
        struct TestResponse {
            name: String,
            value: i32,
        }

        let client = client_for(&server.url(), seeded_store(None, None).await);
        let result: TestResponse = client.get_json("/test").await.unwrap();

        assert_eq!(result.name, "test");
        assert_eq!(result.value, 42);
    }

    #[tokio::test]
    async fn test_get_with_query_builds_query_string() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/accommodations?location=lisbon&page=2")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let client = client_for(&server.url(), seeded_store(None, None).await);
        client
            .get_with_query(
                "/accommodations",
                &[("location", "lisbon".to_string()), ("page", "2".to_string())],
            )
            .await
            .unwrap();

        mock.assert_async().await;
    }
}
