//! Document settings loaded from YAML and the environment.
//!
//! ```yaml
//! title: Petstore
//! version: 1.0.0
//! base_path: /v2
//! schemes: [https]
//! license:
//!   name: MIT
//!   url: https://opensource.org/licenses/MIT
//! ```
//!
//! Environment variables override the file: `SWAG_TITLE`, `SWAG_VERSION`,
//! `SWAG_DESCRIPTION`, `SWAG_HOST`, `SWAG_BASE_PATH` and `SWAG_SCHEMES`
//! (comma-separated). A `.env` file is read first and never overrides
//! variables already set.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::api::{Api, Contact, License};
use crate::error::SwagError;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LicenseConfig {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// Optional overrides of the document defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub title: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub terms_of_service: Option<String>,
    pub contact_email: Option<String>,
    pub license: Option<LicenseConfig>,
    pub host: Option<String>,
    pub base_path: Option<String>,
    pub schemes: Option<Vec<String>>,
}

impl ApiConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self, SwagError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| SwagError::Config(e.to_string()))
    }

    /// Read a YAML file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SwagError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "No document config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| SwagError::Config(e.to_string()))?;
        Self::from_yaml_str(&content)
    }

    /// Apply `SWAG_*` variables from the process environment, after loading
    /// `.env`.
    pub fn with_env_overrides(self) -> Self {
        let _ = dotenvy::dotenv();
        self.overlay_env_with(|key| std::env::var(key).ok())
    }

    /// Apply `SWAG_*` values obtained from `lookup`.
    pub fn overlay_env_with(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("SWAG_TITLE") {
            self.title = Some(v);
        }
        if let Some(v) = get("SWAG_VERSION") {
            self.version = Some(v);
        }
        if let Some(v) = get("SWAG_DESCRIPTION") {
            self.description = Some(v);
        }
        if let Some(v) = get("SWAG_HOST") {
            self.host = Some(v);
        }
        if let Some(v) = get("SWAG_BASE_PATH") {
            self.base_path = Some(v);
        }
        if let Some(v) = get("SWAG_SCHEMES") {
            self.schemes = Some(
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
            );
        }
        self
    }

    /// Write the configured values over `api`.
    pub fn apply(&self, mut api: Api) -> Api {
        if let Some(v) = &self.title {
            api.info.title = v.clone();
        }
        if let Some(v) = &self.version {
            api.info.version = v.clone();
        }
        if let Some(v) = &self.description {
            api.info.description = v.clone();
        }
        if let Some(v) = &self.terms_of_service {
            api.info.terms_of_service = v.clone();
        }
        if let Some(v) = &self.contact_email {
            api.info.contact = Some(Contact { email: v.clone() });
        }
        if let Some(license) = &self.license {
            api.info.license = License {
                name: license.name.clone(),
                url: license.url.clone(),
            };
        }
        if let Some(v) = &self.host {
            api.host = Some(v.clone());
        }
        if let Some(v) = &self.base_path {
            api.base_path = v.clone();
        }
        if let Some(v) = &self.schemes {
            api.schemes = v.clone();
        }
        api
    }
}

impl Api {
    /// Defaults overridden by `config`.
    pub fn from_config(config: &ApiConfig) -> Self {
        config.apply(Api::new())
    }
}
