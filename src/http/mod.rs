//! Authenticated HTTP client for the Ecovia API.

mod client;
mod error;

pub use client::{ApiClient, ClientOptions, DEFAULT_TIMEOUT_SECS};
pub use error::ApiError;
