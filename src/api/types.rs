use serde::{Deserialize, Serialize};

/// Profile of a signed-in user. Points and badges are computed server-side.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub points: u32,
    pub badges: Vec<String>,
    pub bio: Option<String>,
}

/// Successful answer from the login and register endpoints.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserProfile,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Accommodation {
    pub id: String,
    pub name: String,
    pub location: String,
    pub price_per_night: f64,
    /// Server-computed sustainability rating, 0.0 to 5.0.
    pub eco_rating: f32,
    pub review_count: u32,
    #[serde(default)]
    pub amenities: Vec<String>,
    pub description: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub author: String,
    pub rating: u8,
    pub comment: String,
    pub created_at: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    pub id: String,
    pub destination: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub days: Vec<ItineraryDay>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryDay {
    pub day: u32,
    pub activities: Vec<String>,
}

/// A volunteer conservation event. Capacity accounting is server-side.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConservationEvent {
    pub id: String,
    pub title: String,
    pub location: String,
    pub date: String,
    pub capacity: u32,
    pub registered: u32,
    #[serde(default)]
    pub joined: bool,
    pub description: Option<String>,
}

impl ConservationEvent {
    pub fn spots_left(&self) -> u32 {
        self.capacity.saturating_sub(self.registered)
    }
}

/// Answer from the RSVP endpoint.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Rsvp {
    pub event_id: String,
    pub spots_left: u32,
}
