//! Client for the Google Places web service: nearby search with pagination
//! tokens, and place detail lookups for postal addresses.

pub mod client;
pub mod error;
mod retry;
pub mod types;

pub use client::PlacesClient;
pub use error::PlacesError;
