//! Places web-service response types.
//!
//! Every response carries a top-level `status` string. `OK` and
//! `ZERO_RESULTS` are successes; anything else is surfaced as
//! [`crate::PlacesError::ApiStatus`].

use serde::Deserialize;
use wwtp_core::{Coordinate, SearchHit};

// ---------------------------------------------------------------------------
// nearbysearch
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct NearbySearchResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub results: Vec<PlaceResult>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// One entry of `results`. Only the fields the pipeline reads are modelled,
/// and each is optional so that one odd entry cannot fail a whole page.
#[derive(Debug, Deserialize)]
pub struct PlaceResult {
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl PlaceResult {
    /// Converts into a [`SearchHit`], or `None` when the id, name, or a valid
    /// location is missing.
    #[must_use]
    pub fn into_hit(self) -> Option<SearchHit> {
        let provider_id = self.place_id.filter(|id| !id.is_empty())?;
        let location = self.geometry?.location;
        let coordinate = Coordinate::new(location.lat, location.lng).ok()?;
        Some(SearchHit {
            provider_id,
            name: self.name.unwrap_or_default(),
            coordinate,
        })
    }
}

// ---------------------------------------------------------------------------
// details
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct PlaceDetailsResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub result: Option<PlaceDetails>,
}

#[derive(Debug, Deserialize)]
pub struct PlaceDetails {
    #[serde(default)]
    pub formatted_address: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_result_without_geometry_is_skipped() {
        let result: PlaceResult =
            serde_json::from_value(serde_json::json!({"place_id": "A", "name": "X"})).unwrap();
        assert!(result.into_hit().is_none());
    }

    #[test]
    fn place_result_with_invalid_latitude_is_skipped() {
        let result: PlaceResult = serde_json::from_value(serde_json::json!({
            "place_id": "A",
            "name": "X",
            "geometry": {"location": {"lat": 123.0, "lng": 1.0}}
        }))
        .unwrap();
        assert!(result.into_hit().is_none());
    }

    #[test]
    fn place_result_converts_to_hit() {
        let result: PlaceResult = serde_json::from_value(serde_json::json!({
            "place_id": "ChIJ1",
            "name": "Bellandur STP",
            "geometry": {"location": {"lat": 12.93, "lng": 77.67}},
            "vicinity": "ignored"
        }))
        .unwrap();
        let hit = result.into_hit().expect("hit");
        assert_eq!(hit.provider_id, "ChIJ1");
        assert_eq!(hit.name, "Bellandur STP");
        assert!((hit.coordinate.lat() - 12.93).abs() < f64::EPSILON);
    }
}
