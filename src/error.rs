//! Crate-level error types.
//!
//! Domain errors live next to the code that raises them: [`crate::cad::CadError`],
//! [`crate::sketch::ProfileError`], [`crate::sketch::SketchError`] and
//! [`crate::features::FeatureError`]. This module holds the errors raised
//! before a session exists.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed.
    #[error("failed to parse configuration file: {path}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {path}")]
    NotFound {
        /// Path where the configuration file was expected.
        path: PathBuf,
    },

    /// A template path does not match the document kind it is configured for.
    #[error("template for {kind} documents must be a .{extension} file: {path}")]
    TemplateExtension {
        /// Document kind the template was configured for.
        kind: String,
        /// Extension that kind requires.
        extension: &'static str,
        /// The configured template.
        path: PathBuf,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation failure.
        message: String,
    },
}
