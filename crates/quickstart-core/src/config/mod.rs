//! Configuration loading and management

mod admin;
mod features;
mod settings;

pub use admin::{normalize_base_path, AdminConfig, CmsOptions, DebugConfig, ReplConfig};
pub use features::*;
pub use settings::{ErrorConfig, PdfEngine, PdfExportSettings, SecureLinkSettings};

use crate::error::{Error, Result};
use camino::Utf8Path;
use serde::de::DeserializeOwned;
use std::fs;

/// Serialization format of a config file, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Map a file extension (with or without the dot, any case) to a format
    pub fn from_extension(ext: &str) -> Result<Self> {
        let ext = ext.trim().trim_start_matches('.').to_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            _ => Err(Error::unsupported_extension(ext)),
        }
    }

    /// Format for `path`, based on its extension
    pub fn from_path(path: &Utf8Path) -> Result<Self> {
        Self::from_extension(path.extension().unwrap_or_default())
    }
}

/// Deserialize config contents in the given format
pub fn parse_config<T: DeserializeOwned>(content: &str, format: ConfigFormat) -> Result<T> {
    match format {
        ConfigFormat::Yaml => {
            if content.trim().is_empty() {
                // serde_yaml_ng rejects empty documents for structs
                return Ok(serde_yaml_ng::from_str("{}")?);
            }
            Ok(serde_yaml_ng::from_str(content)?)
        }
        ConfigFormat::Json => Ok(serde_json::from_str(content)?),
    }
}

/// Read and deserialize a YAML or JSON config file
pub fn load_config_file<T: DeserializeOwned>(path: &Utf8Path) -> Result<T> {
    let format = ConfigFormat::from_path(path)?;
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::config_not_found(path.as_str())
        } else {
            Error::Io(e)
        }
    })?;
    parse_config(&content, format)
}
