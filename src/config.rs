use crate::filters::{FilterState, SortKey};
use anyhow::{anyhow, bail, Context, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Environment variable overriding `api_base_url`
pub const API_URL_ENV: &str = "STOREFRONT_API_URL";

/// Runtime settings for the listing client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Root of the storefront API, without the `/api/v1` prefix
    pub api_base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Page size of a fresh listing
    pub page_size: u32,
    /// Sort order of a fresh listing
    pub sort_by: SortKey,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            timeout_secs: 30,
            user_agent: concat!("storefront-listing/", env!("CARGO_PKG_VERSION")).to_string(),
            page_size: 20,
            sort_by: SortKey::default(),
        }
    }
}

impl Config {
    /// Defaults, then the TOML file at `path` if given, then the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(std::env::var(API_URL_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    fn apply_env(&mut self, api_url: Option<String>) {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            debug!(%url, "Using API url from {}", API_URL_ENV);
            self.api_base_url = url;
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.base_url()?;
        if self.timeout_secs == 0 {
            bail!("timeout_secs must be greater than zero");
        }
        if self.page_size == 0 {
            bail!("page_size must be greater than zero");
        }
        Ok(())
    }

    pub fn base_url(&self) -> Result<Url> {
        Url::parse(&self.api_base_url)
            .with_context(|| format!("Invalid api_base_url: {}", self.api_base_url))
    }

    /// Storefront page showing the product listing
    pub fn listing_page_url(&self) -> Result<Url> {
        with_path(&self.base_url()?, &["product"])
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Filter state a new listing starts from
    pub fn initial_filters(&self) -> FilterState {
        let mut state = FilterState::with_page_size(self.page_size);
        state.update_sort(self.sort_by);
        state
    }
}

/// `base` with `segments` appended to its path and no query
pub fn with_path(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| anyhow!("Url cannot be a base: {}", base))?
        .pop_if_empty()
        .extend(segments);
    url.set_query(None);
    Ok(url)
}
