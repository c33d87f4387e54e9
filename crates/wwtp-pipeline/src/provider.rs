//! Collaborator seams for the orchestrator.
//!
//! Each trait mirrors one external provider. The concrete HTTP clients
//! implement them here; tests substitute fakes.

use async_trait::async_trait;
use wwtp_core::{Coordinate, ImagePayload, SearchPage};
use wwtp_imagery::{ImageryClient, ImageryError};
use wwtp_places::{PlacesClient, PlacesError};
use wwtp_vision::{GeminiClient, VisionError};

/// Places search with cursor pagination and address lookup.
#[async_trait]
pub trait PlacesSearch: Send + Sync {
    /// First page of results for `keyword` within `radius_meters` of `center`.
    async fn search(
        &self,
        center: Coordinate,
        radius_meters: u32,
        keyword: &str,
    ) -> Result<SearchPage, PlacesError>;

    /// Follow-up page for a token returned by an earlier page.
    async fn search_next_page(&self, page_token: &str) -> Result<SearchPage, PlacesError>;

    /// Postal address for a place; `Ok(None)` when the provider has none.
    async fn place_address(&self, provider_id: &str) -> Result<Option<String>, PlacesError>;
}

/// Overhead imagery at the fixed classification view.
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn fetch(&self, center: Coordinate) -> Result<ImagePayload, ImageryError>;
}

/// Vision classification returning the provider's raw answer text.
#[async_trait]
pub trait ImageClassifier: Send + Sync {
    async fn classify(&self, image: &ImagePayload) -> Result<String, VisionError>;
}

#[async_trait]
impl PlacesSearch for PlacesClient {
    async fn search(
        &self,
        center: Coordinate,
        radius_meters: u32,
        keyword: &str,
    ) -> Result<SearchPage, PlacesError> {
        self.nearby_search(center, radius_meters, keyword).await
    }

    async fn search_next_page(&self, page_token: &str) -> Result<SearchPage, PlacesError> {
        self.nearby_search_page(page_token).await
    }

    async fn place_address(&self, provider_id: &str) -> Result<Option<String>, PlacesError> {
        PlacesClient::place_address(self, provider_id).await
    }
}

#[async_trait]
impl ImageSource for ImageryClient {
    async fn fetch(&self, center: Coordinate) -> Result<ImagePayload, ImageryError> {
        ImageryClient::fetch(self, center).await
    }
}

#[async_trait]
impl ImageClassifier for GeminiClient {
    async fn classify(&self, image: &ImagePayload) -> Result<String, VisionError> {
        GeminiClient::classify(self, image).await
    }
}
