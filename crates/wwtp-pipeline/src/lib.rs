//! Discovery orchestration: search, deduplicate, verify.
//!
//! Provider clients enter through the traits in [`provider`], so the
//! orchestrator runs unchanged against real HTTP clients or in-memory fakes.

pub mod error;
pub mod orchestrator;
pub mod policy;
pub mod provider;
pub mod resolve;

pub use error::PipelineError;
pub use orchestrator::{DiscoveryOptions, DiscoveryPipeline, MAX_PAGES_PER_KEYWORD};
pub use policy::{accepts, status_label};
pub use provider::{ImageClassifier, ImageSource, PlacesSearch};
pub use resolve::resolve_candidates;
