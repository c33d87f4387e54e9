//! Domain types shared by the discovery pipeline, its provider clients, and
//! the exporters.

use std::fmt;

use serde::Serialize;

use crate::error::CoreError;

/// A WGS84 point in degrees.
///
/// Construct through [`Coordinate::new`]; the fields are private so a value of
/// this type is always within `[-90, 90]` × `[-180, 180]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    lat: f64,
    lng: f64,
}

impl Coordinate {
    /// Validates and builds a coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::LatitudeOutOfRange`] or
    /// [`CoreError::LongitudeOutOfRange`] for out-of-range or non-finite values.
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoreError> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoreError::LatitudeOutOfRange(lat));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(CoreError::LongitudeOutOfRange(lng));
        }
        Ok(Self { lat, lng })
    }

    #[must_use]
    pub fn lat(self) -> f64 {
        self.lat
    }

    #[must_use]
    pub fn lng(self) -> f64 {
        self.lng
    }
}

/// Formats as `lat,lng`, the form every Google Maps endpoint expects.
impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// Checks that a search radius is a positive, finite number of kilometres.
///
/// # Errors
///
/// Returns [`CoreError::InvalidRadius`] otherwise.
pub fn validate_radius_km(radius_km: f64) -> Result<f64, CoreError> {
    if radius_km.is_finite() && radius_km > 0.0 {
        Ok(radius_km)
    } else {
        Err(CoreError::InvalidRadius(radius_km))
    }
}

/// Converts kilometres to whole metres, truncating the fractional part.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn radius_km_to_meters(radius_km: f64) -> u32 {
    (radius_km * 1000.0) as u32
}

/// One raw result from a places-search page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    /// Provider-assigned stable identity (Google `place_id`).
    pub provider_id: String,
    pub name: String,
    pub coordinate: Coordinate,
}

/// One page of places-search results plus the cursor for the next page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPage {
    pub hits: Vec<SearchHit>,
    pub next_page_token: Option<String>,
}

/// A facility, unique by `provider_id`, pending verification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub provider_id: String,
    pub name: String,
    pub coordinate: Coordinate,
    /// Postal address; only resolved once the candidate enters verification.
    pub address: Option<String>,
}

impl From<SearchHit> for Candidate {
    fn from(hit: SearchHit) -> Self {
        Self {
            provider_id: hit.provider_id,
            name: hit.name,
            coordinate: hit.coordinate,
            address: None,
        }
    }
}

/// Pixel dimensions of a static-map request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub const DEFAULT: Self = Self {
        width: 600,
        height: 600,
    };
}

impl Default for ImageSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A JPEG-encoded overhead image ready for the vision provider.
#[derive(Clone, PartialEq)]
pub struct ImagePayload {
    pub jpeg: Vec<u8>,
    pub center: Coordinate,
    pub zoom: u8,
    pub size: ImageSize,
    /// Static-map URL the image came from, without the API key.
    pub reference_url: String,
}

impl ImagePayload {
    pub const MIME_TYPE: &'static str = "image/jpeg";
}

impl fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImagePayload")
            .field("jpeg_len", &self.jpeg.len())
            .field("center", &self.center)
            .field("zoom", &self.zoom)
            .field("size", &self.size)
            .field("reference_url", &self.reference_url)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Decision {
    Yes,
    #[default]
    No,
    Maybe,
}

impl Decision {
    /// Matches `YES` / `NO` / `MAYBE`, ignoring ASCII case.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.to_ascii_uppercase().as_str() {
            "YES" => Some(Self::Yes),
            "NO" => Some(Self::No),
            "MAYBE" => Some(Self::Maybe),
            _ => None,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Yes => write!(f, "YES"),
            Decision::No => write!(f, "NO"),
            Decision::Maybe => write!(f, "MAYBE"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WaterPresence {
    Yes,
    #[default]
    No,
}

impl WaterPresence {
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.to_ascii_uppercase().as_str() {
            "YES" => Some(Self::Yes),
            "NO" => Some(Self::No),
            _ => None,
        }
    }
}

impl fmt::Display for WaterPresence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaterPresence::Yes => write!(f, "YES"),
            WaterPresence::No => write!(f, "NO"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Confidence {
    #[default]
    Low,
    Medium,
    High,
}

impl Confidence {
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.to_ascii_uppercase().as_str() {
            "LOW" => Some(Self::Low),
            "MEDIUM" => Some(Self::Medium),
            "HIGH" => Some(Self::High),
            _ => None,
        }
    }
}

/// Title case, matching the `Low/Medium/High` wording the prompt asks for.
impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::Low => write!(f, "Low"),
            Confidence::Medium => write!(f, "Medium"),
            Confidence::High => write!(f, "High"),
        }
    }
}

/// Structured outcome of classifying one candidate's imagery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub decision: Decision,
    pub water_present: WaterPresence,
    pub reasoning: String,
    pub confidence: Confidence,
    /// Free-form, e.g. `"25 MLD"`.
    pub capacity_estimate: String,
}

impl Verdict {
    pub const UNKNOWN_CAPACITY: &'static str = "Unknown";
}

impl Default for Verdict {
    fn default() -> Self {
        Self {
            decision: Decision::default(),
            water_present: WaterPresence::default(),
            reasoning: String::new(),
            confidence: Confidence::default(),
            capacity_estimate: Self::UNKNOWN_CAPACITY.to_string(),
        }
    }
}

/// A candidate accepted by the verification policy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerifiedCandidate {
    pub candidate: Candidate,
    pub verdict: Verdict,
    pub status_label: String,
    pub imagery_url: String,
}

/// Which step of the pipeline a warning came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningStage {
    Search,
    Address,
    Imagery,
    Classification,
}

impl fmt::Display for WarningStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningStage::Search => write!(f, "search"),
            WarningStage::Address => write!(f, "address"),
            WarningStage::Imagery => write!(f, "imagery"),
            WarningStage::Classification => write!(f, "classification"),
        }
    }
}

/// A non-fatal failure recorded during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineWarning {
    pub stage: WarningStage,
    /// `None` for search-phase warnings, which concern a keyword.
    pub provider_id: Option<String>,
    /// Candidate name, or the keyword for search-phase warnings.
    pub subject: String,
    pub message: String,
}

/// The outputs of one discovery run, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineResult {
    pub all_candidates: Vec<Candidate>,
    pub verified: Vec<VerifiedCandidate>,
    pub warnings: Vec<PipelineWarning>,
}

impl PipelineResult {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.all_candidates.is_empty() && self.verified.is_empty()
    }
}
