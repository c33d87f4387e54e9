//! HTTP client for the Places web service.
//!
//! Wraps `reqwest` with API-key handling, status-envelope checks, and typed
//! response deserialization. Transient failures are retried with back-off;
//! pagination delays are the caller's responsibility because the provider
//! only makes a `next_page_token` valid some time after it is issued.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use wwtp_core::{Coordinate, SearchPage};

use crate::error::PlacesError;
use crate::retry::retry_with_backoff;
use crate::types::{NearbySearchResponse, PlaceDetailsResponse};

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/";
const NEARBY_SEARCH_PATH: &str = "maps/api/place/nearbysearch/json";
const DETAILS_PATH: &str = "maps/api/place/details/json";

/// Client for the Places nearby-search and details endpoints.
///
/// Use [`PlacesClient::new`] for production or [`PlacesClient::with_base_url`]
/// to point at a mock server in tests.
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: Url,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl PlacesClient {
    /// Creates a client pointed at the production Google Maps host.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`PlacesError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `Url::join` appends rather than
        // replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| PlacesError::InvalidBaseUrl(format!("{base_url}: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            max_retries: 0,
            backoff_base_secs: 0,
        })
    }

    /// Sets the retry policy for transient failures. `max_retries = 0`
    /// disables retries.
    #[must_use]
    pub fn with_retry_policy(mut self, max_retries: u32, backoff_base_secs: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_secs = backoff_base_secs;
        self
    }

    /// Runs the first page of a keyword nearby search.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::ApiStatus`] for provider statuses other than `OK` /
    ///   `ZERO_RESULTS`.
    /// - [`PlacesError::Http`] / [`PlacesError::UnexpectedStatus`] on transport
    ///   failure after retries.
    /// - [`PlacesError::Deserialize`] if the body does not match the expected shape.
    pub async fn nearby_search(
        &self,
        center: Coordinate,
        radius_meters: u32,
        keyword: &str,
    ) -> Result<SearchPage, PlacesError> {
        let url = self.build_url(
            NEARBY_SEARCH_PATH,
            &[
                ("location", &center.to_string()),
                ("radius", &radius_meters.to_string()),
                ("keyword", keyword),
            ],
        )?;
        self.fetch_search_page(&url, &format!("nearbysearch(keyword={keyword})"))
            .await
    }

    /// Fetches the follow-up page identified by `page_token`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::nearby_search`]. A token used before the provider has
    /// made it valid comes back as `INVALID_REQUEST`.
    pub async fn nearby_search_page(&self, page_token: &str) -> Result<SearchPage, PlacesError> {
        let url = self.build_url(NEARBY_SEARCH_PATH, &[("pagetoken", page_token)])?;
        self.fetch_search_page(&url, "nearbysearch(pagetoken)").await
    }

    /// Looks up the formatted postal address of a place.
    ///
    /// Returns `Ok(None)` when the provider has no address for the place.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::nearby_search`].
    pub async fn place_address(&self, place_id: &str) -> Result<Option<String>, PlacesError> {
        let url = self.build_url(
            DETAILS_PATH,
            &[("place_id", place_id), ("fields", "formatted_address")],
        )?;
        let context = format!("details(place_id={place_id})");
        let (url, context) = (&url, context.as_str());

        let response: PlaceDetailsResponse =
            retry_with_backoff(self.max_retries, self.backoff_base_secs, || async move {
                let response: PlaceDetailsResponse = self.get_json(url, context).await?;
                check_status(&response.status, response.error_message.as_deref())?;
                Ok(response)
            })
            .await?;

        Ok(response
            .result
            .and_then(|r| r.formatted_address)
            .filter(|a| !a.trim().is_empty()))
    }

    async fn fetch_search_page(&self, url: &Url, context: &str) -> Result<SearchPage, PlacesError> {
        let response: NearbySearchResponse =
            retry_with_backoff(self.max_retries, self.backoff_base_secs, || async move {
                let response: NearbySearchResponse = self.get_json(url, context).await?;
                check_status(&response.status, response.error_message.as_deref())?;
                Ok(response)
            })
            .await?;

        let raw_count = response.results.len();
        let hits: Vec<_> = response
            .results
            .into_iter()
            .filter_map(crate::types::PlaceResult::into_hit)
            .collect();
        if hits.len() < raw_count {
            tracing::debug!(
                context,
                skipped = raw_count - hits.len(),
                "dropped place results without id or valid location"
            );
        }

        Ok(SearchPage {
            hits,
            next_page_token: response.next_page_token.filter(|t| !t.is_empty()),
        })
    }

    /// Builds the request URL with percent-encoded query parameters and the
    /// API key appended last.
    fn build_url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, PlacesError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| PlacesError::InvalidBaseUrl(format!("{}{path}: {e}", self.base_url)))?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("key", &self.api_key);
        }
        Ok(url)
    }

    /// Sends a GET request, asserts a 2xx status, and deserializes the body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        context: &str,
    ) -> Result<T, PlacesError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlacesError::UnexpectedStatus {
                status: status.as_u16(),
                endpoint: context.to_owned(),
            });
        }

        let body = response.text().await.map_err(reqwest::Error::without_url)?;
        serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}

/// Maps the envelope `status` to an error unless it is `OK` or `ZERO_RESULTS`.
fn check_status(status: &str, error_message: Option<&str>) -> Result<(), PlacesError> {
    match status {
        "OK" | "ZERO_RESULTS" => Ok(()),
        other => Err(PlacesError::ApiStatus {
            status: other.to_owned(),
            message: error_message.map(str::to_owned),
        }),
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
