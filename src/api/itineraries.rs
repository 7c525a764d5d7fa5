use anyhow::Result;
use log::debug;
use serde::Serialize;

use super::types::Itinerary;
use crate::http::ApiClient;

/// Inputs for server-side itinerary generation.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub destination: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub interests: Vec<String>,
}

#[tracing::instrument(skip(client))]
pub async fn list(client: &ApiClient) -> Result<Vec<Itinerary>> {
    debug!("Fetching itineraries...");
    client.get_json("/itineraries").await
}

#[tracing::instrument(skip(client, request))]
pub async fn plan(client: &ApiClient, request: &PlanRequest) -> Result<Itinerary> {
    debug!("Requesting itinerary for {}...", request.destination);
    client.post_json("/itineraries", request).await
}

#[tracing::instrument(skip(client))]
pub async fn remove(client: &ApiClient, id: &str) -> Result<()> {
    debug!("Removing itinerary {}...", id);
    client.delete(&format!("/itineraries/{}", id)).await?;
    Ok(())
}
