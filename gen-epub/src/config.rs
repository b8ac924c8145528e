//! gen-epub configuration: book metadata, transcript markers, and assets.

use anyhow::{Context, Result};
use novel_text::PartitionOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpubConfig {
    /// Book title (dc:title)
    #[serde(default = "default_title")]
    pub title: String,

    /// Book author (dc:creator)
    #[serde(default = "default_author")]
    pub author: String,

    /// Language tag (dc:language)
    #[serde(default = "default_language")]
    pub language: String,

    /// Fixed book identifier. None means a fresh UUID per build.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,

    /// Literal that separates the TOC region from the body
    #[serde(default = "default_marker")]
    pub marker: String,

    /// Page title for text between the marker and the first chapter
    #[serde(default = "default_front_matter_label")]
    pub front_matter_label: String,

    /// Page title used when no chapter headings are found
    #[serde(default = "default_full_text_label")]
    pub full_text_label: String,

    /// Stylesheet to package instead of the built-in one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stylesheet: Option<PathBuf>,

    /// Cover image (PNG or JPEG)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<PathBuf>,
}

fn default_title() -> String {
    "癸酉本《红楼梦》".to_string()
}

fn default_author() -> String {
    "吴氏石头记".to_string()
}

fn default_language() -> String {
    "zh-CN".to_string()
}

fn default_marker() -> String {
    PartitionOptions::default().marker
}

fn default_front_matter_label() -> String {
    PartitionOptions::default().front_matter_label
}

fn default_full_text_label() -> String {
    PartitionOptions::default().full_text_label
}

impl Default for EpubConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            author: default_author(),
            language: default_language(),
            identifier: None,
            marker: default_marker(),
            front_matter_label: default_front_matter_label(),
            full_text_label: default_full_text_label(),
            stylesheet: None,
            cover: None,
        }
    }
}

impl EpubConfig {
    /// Default config file path: <config dir>/gen-epub/config.toml
    pub fn default_path() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(dir.join("gen-epub").join("config.toml"))
    }

    /// Load config from `path`, or the default path when None.
    ///
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path()?,
        };

        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: EpubConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// Save config to `path`, or the default path when None.
    pub fn save(&self, path: Option<&Path>) -> Result<()> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path()?,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Marker and labels for the partitioner.
    pub fn partition_options(&self) -> PartitionOptions {
        PartitionOptions {
            marker: self.marker.clone(),
            front_matter_label: self.front_matter_label.clone(),
            full_text_label: self.full_text_label.clone(),
        }
    }
}
