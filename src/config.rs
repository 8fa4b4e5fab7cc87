//! Run configuration
//!
//! Everything tied to the aggregator's current layout (selectors, search
//! endpoint) and the keyword sets can be overridden from a TOML file, so a
//! markup change is absorbed without a rebuild. Every table and field is
//! optional and falls back to the built-in Google News values.
//!
//! ```toml
//! [profile]
//! container = "article.IFHyqb"
//! headline = "a.JtKRv"
//! timestamp = "time.hvbAAd"
//! origin = "https://news.google.com"
//!
//! [search]
//! url = "https://news.google.com/search"
//! hl = "en-US"
//!
//! [keywords]
//! alarm = ["recall", "inquiry"]
//! opportunity = ["rebound"]
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{NewsError, Result};
use crate::extract::SelectorProfile;
use crate::scraping::SearchEndpoint;
use crate::sentiment::KeywordSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub profile: SelectorProfile,
    pub search: SearchEndpoint,
    pub keywords: KeywordSet,
}

impl Config {
    /// Load from `path`, or the built-in defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file {}", path.display()))?;
                Self::from_toml_str(&raw)
                    .with_context(|| format!("Invalid config file {}", path.display()))
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Config = toml::from_str(raw).context("Failed to parse TOML")?;
        Ok(config)
    }
}

/// Convert the `--delay` seconds value into a wait duration
pub fn delay_from_secs(secs: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(secs).map_err(|_| NewsError::InvalidDelay(secs).into())
}
