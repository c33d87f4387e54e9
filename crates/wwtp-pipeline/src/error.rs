use thiserror::Error;
use wwtp_core::CoreError;

/// Run-level failures. Per-candidate and per-keyword failures never surface
/// here; they become [`wwtp_core::PipelineWarning`]s in the result.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid discovery input: {0}")]
    InvalidInput(#[from] CoreError),

    #[error("no search keywords configured")]
    NoKeywords,
}
