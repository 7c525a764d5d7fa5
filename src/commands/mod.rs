//! CLI command handlers.

pub mod accommodations;
pub mod auth;
pub mod config;
pub mod events;
pub mod itinerary;
pub mod profile;
pub mod reviews;

pub use config::Config;
