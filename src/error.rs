//! Error types for digikey-kicad-gen.
//!
//! # Security Note
//!
//! Error messages never include credentials. Transport errors name the endpoint
//! and status only; tokens and client secrets stay out of every variant.

use std::path::PathBuf;

use thiserror::Error;

use crate::component::ComponentKind;
use crate::digikey::FetchError;

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

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation failure.
        message: String,
    },
}

impl ConfigError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }
}

/// Errors that abort a generation run.
#[derive(Error, Debug)]
pub enum GenerateError {
    /// The search could not be completed.
    #[error("search failed")]
    Fetch(#[from] FetchError),

    /// The footprint output directory could not be created.
    #[error("failed to create output directory: {path}")]
    OutputDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Generation for this component kind is not implemented.
    #[error("component type '{kind}' is not supported yet")]
    Unsupported {
        /// Requested kind.
        kind: ComponentKind,
    },
}
