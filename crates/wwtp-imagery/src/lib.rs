//! Overhead imagery acquisition: fetches a fixed-view satellite tile from the
//! Static Maps API and re-encodes it as JPEG for the vision provider.

pub mod client;
pub mod encode;
pub mod error;

pub use client::{ImageryClient, DEFAULT_JPEG_QUALITY, DEFAULT_ZOOM, MAP_TYPE};
pub use encode::normalize_to_jpeg;
pub use error::ImageryError;
