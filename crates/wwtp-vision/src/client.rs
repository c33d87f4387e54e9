//! Gemini `generateContent` client.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::{Client, Url};
use wwtp_core::ImagePayload;

use crate::error::VisionError;
use crate::prompt::{ANALYSIS_PROMPT, CALIBRATED_SIZE, CALIBRATED_ZOOM, PROMPT_VERSION};
use crate::types::{
    Content, ErrorEnvelope, GenerateContentRequest, GenerateContentResponse, InlineData,
    RequestPart,
};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Vision client. Performs exactly one request per call; retry policy, if
/// any, belongs to the caller.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    endpoint: Url,
    model: String,
}

impl GeminiClient {
    /// Creates a client for `model` on the production endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`VisionError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, VisionError> {
        Self::with_base_url(api_key, model, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`VisionError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`VisionError::InvalidBaseUrl`] if the endpoint URL does not parse.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, VisionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&normalised)
            .and_then(|base| base.join(&format!("v1beta/models/{model}:generateContent")))
            .map_err(|e| VisionError::InvalidBaseUrl(format!("{base_url}: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            endpoint,
            model: model.to_owned(),
        })
    }

    /// Submits `image` with [`ANALYSIS_PROMPT`] and returns the response text
    /// verbatim apart from surrounding whitespace.
    ///
    /// # Errors
    ///
    /// - [`VisionError::UncalibratedView`] if the image was not taken at the
    ///   view the prompt is calibrated for.
    /// - [`VisionError::Http`] / [`VisionError::UnexpectedStatus`] on transport
    ///   or provider failure.
    /// - [`VisionError::Deserialize`] on an unexpected body.
    /// - [`VisionError::EmptyResponse`] when the answer carries no text.
    pub async fn classify(&self, image: &ImagePayload) -> Result<String, VisionError> {
        if image.zoom != CALIBRATED_ZOOM || image.size != CALIBRATED_SIZE {
            return Err(VisionError::UncalibratedView {
                zoom: image.zoom,
                size: image.size,
            });
        }

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    RequestPart::InlineData {
                        inline_data: InlineData {
                            mime_type: ImagePayload::MIME_TYPE,
                            data: STANDARD.encode(&image.jpeg),
                        },
                    },
                    RequestPart::Text {
                        text: ANALYSIS_PROMPT,
                    },
                ],
            }],
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .ok()
                .and_then(|e| e.error.message);
            return Err(VisionError::UnexpectedStatus {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| VisionError::Deserialize {
                context: format!("generateContent(model={})", self.model),
                source: e,
            })?;

        let text = parsed.first_text().ok_or_else(|| VisionError::EmptyResponse {
            reason: parsed.empty_reason(),
        })?;

        tracing::debug!(
            model = %self.model,
            prompt_version = PROMPT_VERSION,
            center = %image.center,
            chars = text.len(),
            "vision classification complete"
        );

        Ok(text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_includes_model_action() {
        let client =
            GeminiClient::with_base_url("k", "gemini-1.5-flash", 5, "ua", "http://localhost:9")
                .unwrap();
        assert_eq!(
            client.endpoint.as_str(),
            "http://localhost:9/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }
}
