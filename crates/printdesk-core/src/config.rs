//! Editor configuration, persisted as JSON.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::encode::ExportFormat;
use crate::error::Result;
use crate::page::{Page, PaperSize};

/// Preview width of the on-screen page in CSS pixels.
pub const DEFAULT_PREVIEW_WIDTH: f64 = 900.0;

/// Errors reading or writing a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },
}

/// Light or dark UI palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Settings an editor session is created from.
///
/// Unknown fields are ignored and missing ones take their defaults, so
/// older configuration files keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub paper: PaperSize,
    pub preview_width: f64,
    pub theme: Theme,
    pub export_format: ExportFormat,
    pub export_filename: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            paper: PaperSize::A4,
            preview_width: DEFAULT_PREVIEW_WIDTH,
            theme: Theme::Light,
            export_format: ExportFormat::Png,
            export_filename: "export.png".to_string(),
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> std::result::Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> std::result::Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load from `path`; a missing file yields the default configuration.
    pub fn load(path: &Path) -> std::result::Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(json) => Self::from_json(&json),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::debug!("no config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(err) => Err(ConfigError::Io {
                path: path.display().to_string(),
                message: err.to_string(),
            }),
        }
    }

    pub fn save(&self, path: &Path) -> std::result::Result<(), ConfigError> {
        let json = self.to_json()?;
        fs::write(path, json).map_err(|err| ConfigError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })
    }

    /// An empty page for the configured paper and preview width.
    pub fn page(&self) -> Result<Page> {
        Page::for_paper(self.paper, self.preview_width)
    }
}
