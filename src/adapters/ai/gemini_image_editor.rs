//! Gemini image editor - implementation of ImageEditor over the Gemini REST API.
//!
//! Sends one `generateContent` request with the image as an inline-data part
//! followed by the instruction as a text part, then returns the first
//! inline-data part of the first candidate.
//!
//! # Configuration
//!
//! ```ignore
//! let config = GeminiConfig::new(api_key).with_model("gemini-2.5-flash-image");
//! let editor = GeminiImageEditor::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ports::{ImageEditError, ImageEditRequest, ImageEditor};

/// Configuration for the Gemini image editor.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    api_key: Secret<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gemini-2.5-flash-image".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Gemini-backed image editor. Single attempt, no retries.
pub struct GeminiImageEditor {
    config: GeminiConfig,
    client: Client,
}

impl GeminiImageEditor {
    pub fn new(config: GeminiConfig) -> Result<Self, ImageEditError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ImageEditError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn to_gemini_request(request: &ImageEditRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part {
                        inline_data: Some(InlineData {
                            mime_type: request.mime_type.clone(),
                            data: request.image_base64.clone(),
                        }),
                        text: None,
                    },
                    Part {
                        inline_data: None,
                        text: Some(request.prompt.clone()),
                    },
                ],
            }],
        }
    }

    async fn handle_response_status(&self, response: Response) -> Result<Response, ImageEditError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        match status.as_u16() {
            401 | 403 => Err(ImageEditError::AuthenticationFailed),
            code => Err(ImageEditError::Api {
                status: code,
                message: Self::error_message(&error_body),
            }),
        }
    }

    /// Pulls `error.message` out of a Google API error body.
    fn error_message(body: &str) -> String {
        serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("error")?.get("message")?.as_str().map(String::from))
            .unwrap_or_else(|| body.to_string())
    }
}

/// First inline image of the first candidate, if any.
fn first_inline_image(response: GenerateContentResponse) -> Option<String> {
    response
        .candidates
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .find_map(|part| part.inline_data.map(|d| d.data).filter(|d| !d.is_empty()))
}

#[async_trait]
impl ImageEditor for GeminiImageEditor {
    async fn edit_image(
        &self,
        request: &ImageEditRequest,
    ) -> Result<Option<String>, ImageEditError> {
        request.validate()?;

        tracing::debug!(
            model = %self.config.model,
            mime_type = %request.mime_type,
            "Sending image edit request"
        );

        let response = self
            .client
            .post(self.generate_url())
            .header("x-goog-api-key", self.config.api_key())
            .json(&Self::to_gemini_request(request))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ImageEditError::Timeout {
                        timeout_secs: self.config.timeout.as_secs(),
                    }
                } else {
                    ImageEditError::Network(e.to_string())
                }
            })?;

        let response = self.handle_response_status(response).await.map_err(|e| {
            tracing::error!(error = %e, "Error editing image with Gemini");
            e
        })?;

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ImageEditError::Parse(format!("Failed to parse response: {}", e)))?;

        let image = first_inline_image(body);
        if image.is_none() {
            tracing::warn!(model = %self.config.model, "Model response had no image part");
        }
        Ok(image)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Gemini API Types
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> GenerateContentResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn request_puts_image_before_prompt() {
        let request = ImageEditRequest::new("aGVsbG8=", "image/png", "Add a retro filter");
        let body = serde_json::to_value(GeminiImageEditor::to_gemini_request(&request)).unwrap();

        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[0]["inlineData"]["data"], "aGVsbG8=");
        assert_eq!(parts[1]["text"], "Add a retro filter");
        assert!(parts[0].get("text").is_none());
    }

    #[test]
    fn returns_first_inline_image_part() {
        let response = parse(
            r#"{"candidates":[{"content":{"parts":[
                {"text":"Here you go"},
                {"inlineData":{"mimeType":"image/png","data":"Zmlyc3Q="}},
                {"inlineData":{"mimeType":"image/png","data":"c2Vjb25k"}}
            ]}}]}"#,
        );
        assert_eq!(first_inline_image(response).as_deref(), Some("Zmlyc3Q="));
    }

    #[test]
    fn text_only_response_has_no_image() {
        let response = parse(r#"{"candidates":[{"content":{"parts":[{"text":"no"}]}}]}"#);
        assert_eq!(first_inline_image(response), None);
    }

    #[test]
    fn empty_candidates_have_no_image() {
        assert_eq!(first_inline_image(parse(r#"{}"#)), None);
        assert_eq!(first_inline_image(parse(r#"{"candidates":[{}]}"#)), None);
    }

    #[test]
    fn error_message_reads_google_error_body() {
        let body = r#"{"error":{"code":400,"message":"Image too large","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(GeminiImageEditor::error_message(body), "Image too large");
        assert_eq!(GeminiImageEditor::error_message("oops"), "oops");
    }

    #[test]
    fn url_includes_model() {
        let editor = GeminiImageEditor::new(
            GeminiConfig::new("key").with_base_url("http://localhost:9000/v1beta/"),
        )
        .unwrap();
        assert_eq!(
            editor.generate_url(),
            "http://localhost:9000/v1beta/models/gemini-2.5-flash-image:generateContent"
        );
    }
}
