//! Client configuration.
//!
//! Defaults point at the public ECB web service. Every setting can be
//! overridden from the environment (a `.env` file is honoured):
//!
//! - `SDW_BASE_URL`: service root, e.g. `https://sdw-wsrest.ecb.europa.eu/service`
//! - `SDW_TIMEOUT_SECS`: whole-request timeout in seconds
//! - `SDW_LANGUAGE`: language code used to pick localized metadata names

use std::time::Duration;

use crate::error::{Result, SdwError};

pub const DEFAULT_BASE_URL: &str = "https://sdw-wsrest.ecb.europa.eu/service";
pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("sdw-client/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Service root without a trailing slash.
    pub base_url: String,
    pub timeout: Duration,
    pub language: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup("SDW_BASE_URL") {
            config.base_url = url;
        }
        if let Some(raw) = lookup("SDW_TIMEOUT_SECS") {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or_else(|| {
                    SdwError::Config(format!(
                        "SDW_TIMEOUT_SECS must be a positive integer, got '{raw}'."
                    ))
                })?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(language) = lookup("SDW_LANGUAGE") {
            config.language = language;
        }

        config.validated()
    }

    /// Normalize and check the settings.
    pub fn validated(mut self) -> Result<Self> {
        self.base_url = self.base_url.trim().trim_end_matches('/').to_string();
        if !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://")) {
            return Err(SdwError::Config(format!(
                "Base URL must start with http:// or https://, got '{}'.",
                self.base_url
            )));
        }
        self.language = self.language.trim().to_string();
        if self.language.is_empty() {
            return Err(SdwError::Config("Language code must not be empty.".to_string()));
        }
        if self.timeout.is_zero() {
            return Err(SdwError::Config("Timeout must be greater than zero.".to_string()));
        }
        Ok(self)
    }
}
