//! Typed wrappers over the Ecovia REST endpoints.
//!
//! Ratings, itinerary generation, badge accounting and RSVP capacity all
//! live server-side; these modules fetch and display what the API answers.

pub mod accommodations;
pub mod events;
pub mod itineraries;
pub mod profile;
pub mod reviews;
pub mod types;
