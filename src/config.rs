use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use crate::media::ImageLimits;

pub const DEFAULT_CONFIG_PATH: &str = "hikeguide.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Json,
    Sqlite,
}

impl Backend {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Backend::Json),
            "sqlite" => Some(Backend::Sqlite),
            _ => None,
        }
    }
}

/// Startup configuration read from `hikeguide.toml`.
/// Every key is optional; missing keys fall back to `Default`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub backend: Backend,
    pub data_dir: String,
    pub db_path: String,
    pub static_dir: String,
    pub posts_key: String,
    pub last_search_key: String,
    pub blog_markup: String,
    pub blog_page_size: usize,
    pub search_debounce_ms: u64,
    pub max_upload_mb: usize,
    pub max_image_dimension: u32,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            backend: Backend::Json,
            data_dir: "website/data".to_string(),
            db_path: "website/data/hikeguide.db".to_string(),
            static_dir: "website/static".to_string(),
            posts_key: "communityPosts".to_string(),
            last_search_key: "lastSearch".to_string(),
            blog_markup: "website/pages/blog.html".to_string(),
            blog_page_size: 6,
            search_debounce_ms: 300,
            max_upload_mb: 5,
            max_image_dimension: 1600,
        }
    }
}

impl SiteConfig {
    /// Load from `HIKEGUIDE_CONFIG` (or the default path), then apply
    /// `HIKEGUIDE_BACKEND` / `HIKEGUIDE_DATA_DIR` overrides.
    pub fn load() -> Result<Self, String> {
        let path = std::env::var("HIKEGUIDE_CONFIG")
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::from_file(Path::new(&path))?;
        config.apply_overrides(
            std::env::var("HIKEGUIDE_BACKEND").ok(),
            std::env::var("HIKEGUIDE_DATA_DIR").ok(),
        );
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, String> {
        match fs::read_to_string(path) {
            Ok(raw) => Self::parse(&raw)
                .map_err(|e| format!("{}: {}", path.display(), e)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(format!("cannot read {}: {}", path.display(), e)),
        }
    }

    pub fn parse(raw: &str) -> Result<Self, String> {
        toml::from_str(raw).map_err(|e| format!("invalid config: {}", e))
    }

    pub fn apply_overrides(&mut self, backend: Option<String>, data_dir: Option<String>) {
        if let Some(raw) = backend {
            match Backend::parse(&raw) {
                Some(b) => self.backend = b,
                None => warn!("Ignoring unknown HIKEGUIDE_BACKEND value '{}'", raw),
            }
        }
        if let Some(dir) = data_dir.filter(|d| !d.trim().is_empty()) {
            self.data_dir = dir;
        }
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn image_limits(&self) -> ImageLimits {
        ImageLimits {
            max_bytes: self.max_upload_mb.max(1) * 1024 * 1024,
            max_dimension: self.max_image_dimension.max(1),
        }
    }
}
