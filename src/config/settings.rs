//! Configuration structures for deserialisation.
//!
//! These structures map directly to the JSON configuration file format.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::cad::DocumentKind;
use crate::error::ConfigError;

/// Root configuration structure.
///
/// This is the top-level structure that matches the JSON config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Optional JSON schema reference (ignored during parsing).
    #[serde(rename = "$schema", default)]
    _schema: Option<String>,

    /// Optional comment field (ignored during parsing).
    #[serde(rename = "_comment", default)]
    _comment: Option<String>,

    /// Directories that documents may be opened from, saved to, or placed
    /// from. When empty the server is limited to the working directory.
    #[serde(default)]
    pub allowed_paths: Vec<PathBuf>,

    /// Default templates for new documents.
    #[serde(default)]
    pub templates: TemplateConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for kind in DocumentKind::ALL {
            if let Some(template) = self.templates.for_kind(kind) {
                if DocumentKind::from_path(template) != Some(kind) {
                    return Err(ConfigError::TemplateExtension {
                        kind: kind.to_string(),
                        extension: kind.extension(),
                        path: template.to_path_buf(),
                    });
                }
            }
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "Invalid log level '{}'. Must be one of: {}",
                    self.logging.level,
                    valid_levels.join(", ")
                ),
            });
        }

        Ok(())
    }
}

/// Template files used when creating documents.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateConfig {
    /// Part template (`.par`).
    #[serde(default)]
    pub part: Option<PathBuf>,

    /// Assembly template (`.asm`).
    #[serde(default)]
    pub assembly: Option<PathBuf>,

    /// Sheet metal template (`.psm`).
    #[serde(default)]
    pub sheet_metal: Option<PathBuf>,

    /// Draft template (`.dft`).
    #[serde(default)]
    pub draft: Option<PathBuf>,
}

impl TemplateConfig {
    /// Returns the configured template for a document kind.
    #[must_use]
    pub fn for_kind(&self, kind: DocumentKind) -> Option<&Path> {
        match kind {
            DocumentKind::Part => self.part.as_deref(),
            DocumentKind::Assembly => self.assembly.as_deref(),
            DocumentKind::SheetMetal => self.sheet_metal.as_deref(),
            DocumentKind::Draft => self.draft.as_deref(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
