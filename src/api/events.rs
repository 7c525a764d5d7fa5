use anyhow::{Context, Result};
use log::debug;

use super::types::{ConservationEvent, Rsvp};
use crate::http::ApiClient;

#[tracing::instrument(skip(client))]
pub async fn list(client: &ApiClient, joined_only: bool) -> Result<Vec<ConservationEvent>> {
    debug!("Fetching conservation events (joined_only: {})...", joined_only);

    let mut params = Vec::new();
    if joined_only {
        params.push(("joined", "true".to_string()));
    }
    client.get_json_with_query("/events", &params).await
}

/// Registers for an event. A full event comes back as a plain HTTP 409
/// from the server; the client does no capacity accounting of its own.
#[tracing::instrument(skip(client))]
pub async fn join(client: &ApiClient, id: &str) -> Result<Rsvp> {
    debug!("Joining event {}...", id);

    let response = client.post_empty(&format!("/events/{}/rsvp", id)).await?;
    response
        .json()
        .await
        .context("Failed to parse RSVP response")
}

#[tracing::instrument(skip(client))]
pub async fn leave(client: &ApiClient, id: &str) -> Result<()> {
    debug!("Leaving event {}...", id);

    client.delete(&format!("/events/{}/rsvp", id)).await?;
    Ok(())
}
