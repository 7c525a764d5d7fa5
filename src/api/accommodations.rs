use anyhow::Result;
use log::debug;

use super::types::Accommodation;
use crate::http::ApiClient;

/// Filters for the accommodation listing. Unset fields are omitted from
/// the query string.
#[derive(Debug, Default)]
pub struct AccommodationQuery {
    pub location: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl AccommodationQuery {
    fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(location) = &self.location {
            params.push(("location", location.clone()));
        }
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        if let Some(per_page) = self.per_page {
            params.push(("perPage", per_page.to_string()));
        }
        params
    }
}

#[tracing::instrument(skip(client, query))]
pub async fn list(client: &ApiClient, query: &AccommodationQuery) -> Result<Vec<Accommodation>> {
    debug!("Fetching accommodations...");
    client
        .get_json_with_query("/accommodations", &query.to_params())
        .await
}

#[tracing::instrument(skip(client))]
pub async fn get(client: &ApiClient, id: &str) -> Result<Accommodation> {
    debug!("Fetching accommodation {}...", id);
    client.get_json(&format!("/accommodations/{}", id)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::unauthenticated_client;

    #[tokio::test]
    async fn test_list_with_filters() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/accommodations?location=azores&page=2")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{
                    "id": "a1",
                    "name": "Cedar Lodge",
                    "location": "Azores",
                    "pricePerNight": 92.5,
                    "ecoRating": 4.6,
                    "reviewCount": 18,
                    "amenities": ["solar power"]
                }]"#,
            )
            .create_async()
            .await;

        let client = unauthenticated_client(&server.url());
        let query = AccommodationQuery {
            location: Some("azores".to_string()),
            page: Some(2),
            per_page: None,
        };
        let accommodations = list(&client, &query).await.unwrap();

        mock.assert_async().await;
        assert_eq!(accommodations.len(), 1);
        assert_eq!(accommodations[0].name, "Cedar Lodge");
        assert_eq!(accommodations[0].amenities, vec!["solar power"]);
    }

    #[tokio::test]
    async fn test_list_without_filters_sends_bare_path() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/accommodations")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let client = unauthenticated_client(&server.url());
        let accommodations = list(&client, &AccommodationQuery::default()).await.unwrap();

        mock.assert_async().await;
        assert!(accommodations.is_empty());
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/accommodations/missing")
            .with_status(404)
            .create_async()
            .await;

        let client = unauthenticated_client(&server.url());
        let result = get(&client, "missing").await;

        mock.assert_async().await;
        assert!(result.is_err());
    }
}
