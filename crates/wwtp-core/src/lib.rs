//! Shared domain types and environment configuration for the WWTP finder.

pub mod app_config;
pub mod config;
pub mod error;
pub mod types;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env, DEFAULT_SEARCH_KEYWORDS};
pub use error::{ConfigError, CoreError};
pub use types::{
    radius_km_to_meters, validate_radius_km, Candidate, Confidence, Coordinate, Decision,
    ImagePayload, ImageSize, PipelineResult, PipelineWarning, SearchHit, SearchPage, Verdict,
    VerifiedCandidate, WarningStage, WaterPresence,
};
