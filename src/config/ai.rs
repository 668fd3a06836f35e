//! Image-editing model configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Gemini API key. The image editor is disabled when unset.
    pub gemini_api_key: Option<String>,

    #[serde(default = "default_model")]
    pub gemini_model: String,

    #[serde(default = "default_base_url")]
    pub gemini_base_url: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl AiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn has_gemini(&self) -> bool {
        self.gemini_api_key
            .as_ref()
            .is_some_and(|k| !k.trim().is_empty())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.gemini_model.trim().is_empty() {
            return Err(ValidationError::MissingRequired("AI__GEMINI_MODEL"));
        }
        if !self.gemini_base_url.starts_with("https://")
            && !self.gemini_base_url.starts_with("http://")
        {
            return Err(ValidationError::InvalidUrl("AI__GEMINI_BASE_URL"));
        }
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout("image edit", 300));
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_model: default_model(),
            gemini_base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_model() -> String {
    "gemini-2.5-flash-image".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_timeout() -> u64 {
    60
}
