use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageryError {
    /// Network or TLS failure; the URL (which carries the API key) is stripped.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} for static map at {center}")]
    UnexpectedStatus { status: u16, center: String },

    #[error("static map body for {center} is empty")]
    EmptyBody { center: String },

    #[error("could not decode static map image for {center}: {source}")]
    Decode {
        center: String,
        #[source]
        source: image::ImageError,
    },

    #[error("could not re-encode static map image for {center} as JPEG: {source}")]
    Encode {
        center: String,
        #[source]
        source: image::ImageError,
    },

    #[error("invalid base URL '{0}'")]
    InvalidBaseUrl(String),
}
