//! Vision classification of candidate imagery.
//!
//! Sends a JPEG plus a fixed analysis prompt to the Gemini `generateContent`
//! endpoint and parses the tagged free-text answer into a [`wwtp_core::Verdict`].

pub mod client;
pub mod error;
pub mod prompt;
pub mod types;
pub mod verdict;

pub use client::GeminiClient;
pub use error::VisionError;
pub use prompt::{ANALYSIS_PROMPT, CALIBRATED_SIZE, CALIBRATED_ZOOM, PROMPT_VERSION};
pub use verdict::parse_verdict;
