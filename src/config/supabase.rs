//! Supabase project settings used by the auth adapter

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;

#[derive(Debug, Clone, Deserialize)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://abcd.supabase.co`
    pub url: String,

    /// Public anon key sent as the `apikey` header
    pub anon_key: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl SupabaseConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.url.trim().is_empty() {
            return Err(ValidationError::MissingRequired("SUPABASE__URL"));
        }
        if self.anon_key.trim().is_empty() {
            return Err(ValidationError::MissingRequired("SUPABASE__ANON_KEY"));
        }
        if !self.url.starts_with("https://") && !self.url.starts_with("http://") {
            return Err(ValidationError::InvalidUrl("SUPABASE__URL"));
        }
        if *environment == Environment::Production && !self.url.starts_with("https://") {
            return Err(ValidationError::MustBeHttps("SUPABASE__URL"));
        }
        if self.timeout_secs == 0 || self.timeout_secs > 60 {
            return Err(ValidationError::InvalidTimeout("supabase", 60));
        }
        Ok(())
    }
}

fn default_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str) -> SupabaseConfig {
        SupabaseConfig {
            url: url.to_string(),
            anon_key: "anon".to_string(),
            timeout_secs: default_timeout(),
        }
    }

    #[test]
    fn local_http_project_is_fine_outside_production() {
        let local = config("http://localhost:54321");
        assert!(local.validate(&Environment::Development).is_ok());
        assert_eq!(
            local.validate(&Environment::Production),
            Err(ValidationError::MustBeHttps("SUPABASE__URL"))
        );
    }

    #[test]
    fn anon_key_is_required() {
        let mut cfg = config("https://abcd.supabase.co");
        cfg.anon_key = " ".to_string();
        assert_eq!(
            cfg.validate(&Environment::Development),
            Err(ValidationError::MissingRequired("SUPABASE__ANON_KEY"))
        );
    }

    #[test]
    fn non_http_url_is_rejected() {
        assert_eq!(
            config("abcd.supabase.co").validate(&Environment::Development),
            Err(ValidationError::InvalidUrl("SUPABASE__URL"))
        );
    }
}
