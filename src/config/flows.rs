//! Limits applied by the application handlers

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct FlowConfig {
    /// Deadline for a single auth or database call made by a handler
    #[serde(default = "default_call_timeout")]
    pub call_timeout_secs: u64,

    /// Deadline for the image edit round trip
    #[serde(default = "default_image_timeout")]
    pub image_timeout_secs: u64,
}

impl FlowConfig {
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    pub fn image_timeout(&self) -> Duration {
        Duration::from_secs(self.image_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.call_timeout_secs == 0 || self.call_timeout_secs > 60 {
            return Err(ValidationError::InvalidTimeout("call", 60));
        }
        if self.image_timeout_secs == 0 || self.image_timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout("image", 300));
        }
        Ok(())
    }
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            call_timeout_secs: default_call_timeout(),
            image_timeout_secs: default_image_timeout(),
        }
    }
}

fn default_call_timeout() -> u64 {
    10
}

fn default_image_timeout() -> u64 {
    70
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = FlowConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.call_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn unbounded_call_timeout_is_rejected() {
        let config = FlowConfig {
            call_timeout_secs: 600,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidTimeout("call", 60))
        );
    }
}
