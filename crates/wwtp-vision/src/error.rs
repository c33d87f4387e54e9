use thiserror::Error;
use wwtp_core::ImageSize;

#[derive(Debug, Error)]
pub enum VisionError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("vision provider returned HTTP {status}: {}", .message.as_deref().unwrap_or("no message"))]
    UnexpectedStatus {
        status: u16,
        message: Option<String>,
    },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The provider answered but produced no text, e.g. a blocked prompt.
    #[error("vision provider returned no text: {reason}")]
    EmptyResponse { reason: String },

    /// The prompt's ground-resolution guidance only holds for one view.
    #[error("image view zoom={zoom} size={size} does not match the prompt calibration")]
    UncalibratedView { zoom: u8, size: ImageSize },

    #[error("invalid base URL '{0}'")]
    InvalidBaseUrl(String),
}
