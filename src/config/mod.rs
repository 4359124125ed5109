#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::{ConfigProvider, Credentials};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::time::Duration;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

/// Connection parameters after merging file, environment and flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub base_url: String,
    pub api_version: String,
    pub credentials: Option<Credentials>,
    pub timeout: Option<Duration>,
}

impl ConnectionSettings {
    pub fn from_provider<C: ConfigProvider>(config: &C) -> Self {
        Self {
            base_url: config.base_url().to_string(),
            api_version: config.api_version().to_string(),
            credentials: config.credentials(),
            timeout: config.timeout(),
        }
    }
}

impl ConfigProvider for ConnectionSettings {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_version(&self) -> &str {
        &self.api_version
    }

    fn credentials(&self) -> Option<Credentials> {
        self.credentials.clone()
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl Validate for ConnectionSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_url("base_url", &self.base_url)?;
        validation::validate_api_version("api_version", &self.api_version)?;
        if let Some(credentials) = &self.credentials {
            validation::validate_non_empty_string("user", &credentials.user)?;
        }
        if let Some(timeout) = self.timeout {
            validation::validate_positive_number("timeout_seconds", timeout.as_secs(), 1)?;
        }
        Ok(())
    }
}
