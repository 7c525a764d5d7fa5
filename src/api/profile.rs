use anyhow::Result;
use log::debug;
use serde::Serialize;

use super::types::UserProfile;
use crate::http::ApiClient;

/// Partial profile update; unset fields are left untouched server-side.
#[derive(Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

#[tracing::instrument(skip(client))]
pub async fn fetch(client: &ApiClient) -> Result<UserProfile> {
    debug!("Fetching user profile...");
    client.get_json("/users/profile").await
}

#[tracing::instrument(skip(client, update))]
pub async fn update(client: &ApiClient, update: &ProfileUpdate) -> Result<UserProfile> {
    debug!("Updating user profile...");
    client.put_json("/users/profile", update).await
}
