//! HTTP client for the Static Maps API.

use std::time::Duration;

use reqwest::{Client, Url};
use wwtp_core::{Coordinate, ImagePayload, ImageSize};

use crate::encode::normalize_to_jpeg;
use crate::error::ImageryError;

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/";
const STATIC_MAP_PATH: &str = "maps/api/staticmap";

/// Zoom 18 gives roughly 0.6 m per pixel, so a 600×600 frame covers about
/// 360 m × 360 m. The classification prompt is calibrated to this view.
pub const DEFAULT_ZOOM: u8 = 18;
pub const DEFAULT_JPEG_QUALITY: u8 = 90;
pub const MAP_TYPE: &str = "satellite";

/// Fetches fixed-view satellite tiles and hands them back as JPEG payloads.
///
/// No retries: a failed fetch is reported to the caller, which skips the
/// candidate.
pub struct ImageryClient {
    client: Client,
    api_key: String,
    base_url: Url,
    jpeg_quality: u8,
}

impl ImageryClient {
    /// Creates a client pointed at the production Google Maps host.
    ///
    /// # Errors
    ///
    /// Returns [`ImageryError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ImageryError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ImageryError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`ImageryError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, ImageryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| ImageryError::InvalidBaseUrl(format!("{base_url}: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        })
    }

    /// Fetches the default view ([`DEFAULT_ZOOM`], [`ImageSize::DEFAULT`]).
    ///
    /// # Errors
    ///
    /// See [`Self::fetch_view`].
    pub async fn fetch(&self, center: Coordinate) -> Result<ImagePayload, ImageryError> {
        self.fetch_view(center, DEFAULT_ZOOM, ImageSize::DEFAULT)
            .await
    }

    /// Fetches a satellite view centred on `center` and re-encodes it as JPEG.
    ///
    /// # Errors
    ///
    /// - [`ImageryError::Http`] on network failure.
    /// - [`ImageryError::UnexpectedStatus`] on a non-2xx response.
    /// - [`ImageryError::EmptyBody`] / [`ImageryError::Decode`] /
    ///   [`ImageryError::Encode`] if the body is not a usable image.
    pub async fn fetch_view(
        &self,
        center: Coordinate,
        zoom: u8,
        size: ImageSize,
    ) -> Result<ImagePayload, ImageryError> {
        let url = self.static_map_url(center, zoom, size, true)?;
        let label = center.to_string();

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageryError::UnexpectedStatus {
                status: status.as_u16(),
                center: label,
            });
        }

        let raw = response.bytes().await.map_err(reqwest::Error::without_url)?;
        let jpeg = normalize_to_jpeg(&raw, self.jpeg_quality, &label)?;
        tracing::debug!(
            center = %label,
            raw_bytes = raw.len(),
            jpeg_bytes = jpeg.len(),
            "fetched static map"
        );

        Ok(ImagePayload {
            jpeg,
            center,
            zoom,
            size,
            reference_url: self.static_map_url(center, zoom, size, false)?.to_string(),
        })
    }

    /// Builds the static-map request URL. The key is only appended for the
    /// URL actually requested; the copy stored on the payload omits it.
    fn static_map_url(
        &self,
        center: Coordinate,
        zoom: u8,
        size: ImageSize,
        with_key: bool,
    ) -> Result<Url, ImageryError> {
        let mut url = self
            .base_url
            .join(STATIC_MAP_PATH)
            .map_err(|e| ImageryError::InvalidBaseUrl(format!("{}: {e}", self.base_url)))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("center", &center.to_string());
            pairs.append_pair("zoom", &zoom.to_string());
            pairs.append_pair("size", &size.to_string());
            pairs.append_pair("maptype", MAP_TYPE);
            if with_key {
                pairs.append_pair("key", &self.api_key);
            }
        }
        Ok(url)
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
