//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::num::NonZeroUsize;
use std::path::Path;

/// Environment variable that overrides `access_token`
pub const ACCESS_TOKEN_ENV: &str = "SPACETRAVELING_ACCESS_TOKEN";

const DEFAULT_PAGE_SIZE: NonZeroUsize = match NonZeroUsize::new(2) {
    Some(n) => n,
    None => unreachable!(),
};

const DEFAULT_PATHS_PAGE_SIZE: NonZeroUsize = match NonZeroUsize::new(100) {
    Some(n) => n,
    None => unreachable!(),
};

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub language: String,
    pub date_format: String,

    // Content source
    pub api_endpoint: String,
    pub access_token: Option<String>,
    pub post_type: String,

    // Listing
    pub page_size: NonZeroUsize,
    pub paths_page_size: NonZeroUsize,
    /// Orderings for the home listing, e.g. `first_publication_date desc`.
    /// Empty means upstream insertion order.
    #[serde(default)]
    pub listing_order: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "spacetraveling".to_string(),
            language: "pt-BR".to_string(),
            date_format: "DD MMM YYYY".to_string(),

            api_endpoint: "https://spacetraveling.cdn.prismic.io/api/v2".to_string(),
            access_token: None,
            post_type: "posts".to_string(),

            page_size: DEFAULT_PAGE_SIZE,
            paths_page_size: DEFAULT_PATHS_PAGE_SIZE,
            listing_order: Vec::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        if config.post_type.trim().is_empty() {
            anyhow::bail!("post_type must not be empty in {}", path.display());
        }

        Ok(config)
    }

    /// Load `_config.yml` from a directory, falling back to defaults when it is absent
    pub fn load_from_dir<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let config_path = base_dir.as_ref().join("_config.yml");

        let mut config = if config_path.exists() {
            Self::load(&config_path)?
        } else {
            tracing::debug!("No config at {:?}, using defaults", config_path);
            Self::default()
        };

        if let Ok(token) = std::env::var(ACCESS_TOKEN_ENV) {
            if !token.trim().is_empty() {
                config.access_token = Some(token);
            }
        }

        Ok(config)
    }
}
