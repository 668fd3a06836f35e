//! Image editor port.
//!
//! Sends an image and a natural-language instruction to a generative model
//! and returns the edited image. The editing itself happens entirely on the
//! model side.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// An image plus the instruction to apply to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageEditRequest {
    /// Base64 payload without a data-URL prefix.
    pub image_base64: String,
    pub mime_type: String,
    pub prompt: String,
}

impl ImageEditRequest {
    pub fn new(
        image_base64: impl Into<String>,
        mime_type: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            image_base64: image_base64.into(),
            mime_type: mime_type.into(),
            prompt: prompt.into(),
        }
    }

    /// Rejects requests the model would refuse anyway.
    pub fn validate(&self) -> Result<(), ImageEditError> {
        if self.image_base64.trim().is_empty() {
            return Err(ImageEditError::InvalidRequest("image is empty".to_string()));
        }
        if !self.mime_type.starts_with("image/") {
            return Err(ImageEditError::InvalidRequest(format!(
                "unsupported mime type: {}",
                self.mime_type
            )));
        }
        if self.prompt.trim().is_empty() {
            return Err(ImageEditError::InvalidRequest("prompt is empty".to_string()));
        }
        Ok(())
    }
}

/// Image editor errors. None of them are retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageEditError {
    /// The request was rejected before it was sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The model answered with an error status.
    #[error("model returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse the model response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

impl ImageEditError {
    /// Message shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            ImageEditError::InvalidRequest(_) => "يرجى اختيار صورة وكتابة وصف للتعديل.".to_string(),
            ImageEditError::Timeout { .. } => "استغرق تعديل الصورة وقتاً طويلاً.".to_string(),
            _ => "حدث خطأ أثناء تعديل الصورة.".to_string(),
        }
    }
}

/// Port for generative image editing.
#[async_trait]
pub trait ImageEditor: Send + Sync {
    /// Edit an image.
    ///
    /// Returns `Ok(None)` when the model answered without an image part.
    async fn edit_image(&self, request: &ImageEditRequest)
        -> Result<Option<String>, ImageEditError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_editor_is_object_safe() {
        fn _accepts_dyn(_editor: &dyn ImageEditor) {}
    }

    #[test]
    fn validate_rejects_non_image_mime_type() {
        let request = ImageEditRequest::new("aGVsbG8=", "text/plain", "make it blue");
        assert!(matches!(
            request.validate(),
            Err(ImageEditError::InvalidRequest(_))
        ));
    }

    #[test]
    fn validate_rejects_blank_prompt() {
        let request = ImageEditRequest::new("aGVsbG8=", "image/png", "  ");
        assert!(request.validate().is_err());
        let request = ImageEditRequest::new("aGVsbG8=", "image/png", "add a hat");
        assert!(request.validate().is_ok());
    }
}
