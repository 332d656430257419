//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{NiteError, NiteResult};

/// Global application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory where saved posts and uploaded bitmaps are stored.
    pub posts_dir: PathBuf,

    /// Base directory for relative image references.
    pub assets_dir: PathBuf,

    /// Rendering defaults.
    pub render: RenderDefaults,

    /// Brand assets drawn in the logo slot.
    pub brand: BrandConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Default rendering parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderDefaults {
    /// Width in pixels of generated thumbnails.
    pub thumbnail_width: u32,

    /// Family used when a requested font is unavailable.
    pub fallback_font: String,

    /// Extra directories scanned for fonts.
    pub font_dirs: Vec<PathBuf>,

    /// Whether installed system fonts are loaded.
    pub load_system_fonts: bool,
}

/// Brand identity for the logo slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandConfig {
    /// Text wordmark drawn when no logo image is configured.
    pub wordmark: String,

    /// Optional logo image reference (path, `file://` or `data:` URL).
    pub logo: Option<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "nitepost=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            posts_dir: dirs_default_posts(),
            assets_dir: PathBuf::from("."),
            render: RenderDefaults::default(),
            brand: BrandConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for RenderDefaults {
    fn default() -> Self {
        Self {
            thumbnail_width: 400,
            fallback_font: "Poppins".to_string(),
            font_dirs: vec![],
            load_system_fonts: true,
        }
    }
}

impl Default for BrandConfig {
    fn default() -> Self {
        Self {
            wordmark: "NITEPOST".to_string(),
            logo: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load config from an explicit file.
    pub fn load_from(path: impl AsRef<Path>) -> NiteResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            NiteError::config(format!("Failed to read {}: {e}", path.display()))
        })?;
        serde_json::from_str(&content)
            .map_err(|e| NiteError::config(format!("Failed to parse {}: {e}", path.display())))
    }

    /// Standard config file location.
    pub fn default_path() -> PathBuf {
        config_file_path()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("nitepost").join("config.json")
}

/// Default saved-posts directory.
fn dirs_default_posts() -> PathBuf {
    let base = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".local").join("share")
        });
    base.join("nitepost").join("posts")
}
