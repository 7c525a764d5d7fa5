//! Login, registration and logout against the Ecovia auth endpoints.

use anyhow::{Context, Result};
use log::{debug, warn};
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;

use super::store::{CredentialStore, keys};
use crate::api::types::{AuthResponse, UserProfile};
use crate::http::ApiError;

/// Produces and invalidates the credential pair. Uses a bare client so a
/// stale stored token never leaks into login or registration requests.
pub struct Session {
    client: Client,
    base_url: String,
    store: Arc<dyn CredentialStore>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

impl Session {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        store: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            store,
        }
    }

    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile> {
        debug!("Signing in as {}...", email);

        let url = format!("{}/auth/login", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&LoginRequest { email, password })
            .send()
            .await
            .context("Failed to send login request")?;

        self.establish(response).await
    }

    #[tracing::instrument(skip(self, password))]
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<UserProfile> {
        debug!("Registering {}...", email);

        let url = format!("{}/auth/register", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&RegisterRequest {
                name,
                email,
                password,
            })
            .send()
            .await
            .context("Failed to send registration request")?;

        self.establish(response).await
    }

    /// Persists the credential pair and cached profile from a successful
    /// auth response.
    async fn establish(&self, response: reqwest::Response) -> Result<UserProfile> {
        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await.into());
        }

        let auth: AuthResponse = response
            .json()
            .await
            .context("Failed to parse auth response")?;

        self.store.set(keys::ACCESS_TOKEN, &auth.access_token).await?;
        self.store
            .set(keys::REFRESH_TOKEN, &auth.refresh_token)
            .await?;

        let profile =
            serde_json::to_string(&auth.user).context("Failed to serialize user profile")?;
        self.store.set(keys::USER_PROFILE, &profile).await?;

        Ok(auth.user)
    }

    /// Best-effort server-side logout, then clear local credentials. Local
    /// state is cleared even when the server call fails.
    #[tracing::instrument(skip(self))]
    pub async fn logout(&self) -> Result<()> {
        if let Some(token) = self.store.get(keys::ACCESS_TOKEN).await? {
            let url = format!("{}/auth/logout", self.base_url);
            match self.client.post(&url).bearer_auth(&token).send().await {
                Ok(response) if !response.status().is_success() => {
                    warn!(
                        "Server-side logout returned HTTP {}",
                        response.status().as_u16()
                    );
                }
                Err(e) => warn!("Server-side logout failed: {}", e),
                Ok(_) => debug!("Server-side logout succeeded"),
            }
        }

        self.store
            .remove(&[keys::ACCESS_TOKEN, keys::REFRESH_TOKEN, keys::USER_PROFILE])
            .await
    }

    /// Returns the profile cached at the last login, if any.
    pub async fn cached_profile(&self) -> Result<Option<UserProfile>> {
        match self.store.get(keys::USER_PROFILE).await? {
            Some(raw) => Ok(Some(
                serde_json::from_str(&raw).context("Failed to parse cached user profile")?,
            )),
            None => Ok(None),
        }
    }
}
