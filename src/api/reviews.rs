use anyhow::Result;
use log::debug;
use serde::Serialize;

use super::types::Review;
use crate::http::ApiClient;

/// A review to submit. Rating bounds are enforced server-side.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub rating: u8,
    pub comment: String,
}

#[tracing::instrument(skip(client))]
pub async fn list(client: &ApiClient, accommodation_id: &str) -> Result<Vec<Review>> {
    debug!("Fetching reviews for {}...", accommodation_id);
    client
        .get_json(&format!("/accommodations/{}/reviews", accommodation_id))
        .await
}

#[tracing::instrument(skip(client, review))]
pub async fn add(client: &ApiClient, accommodation_id: &str, review: &NewReview) -> Result<Review> {
    debug!("Submitting review for {}...", accommodation_id);
    client
        .post_json(&format!("/accommodations/{}/reviews", accommodation_id), review)
        .await
}
