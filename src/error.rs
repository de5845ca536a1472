//! Error types for pitfall operations.
//!
//! This module defines [`PitfallError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `PitfallError` for domain errors that callers handle distinctly
//! - Use `anyhow::Error` (via `PitfallError::Other`) for unexpected errors
//! - Malformed evidence and failed supplementary analysis degrade the result
//!   instead of aborting it; only input that cannot be read at all is fatal

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pitfall operations.
#[derive(Debug, Error)]
pub enum PitfallError {
    /// Configuration or input file not found at expected location.
    #[error("File not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse a configuration or input file.
    #[error("Failed to parse {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// The tool registry could not be loaded.
    #[error("Tool registry unavailable: {message}")]
    RegistryUnavailable { message: String },

    /// An evidence source could not be decoded as a whole.
    #[error("Invalid evidence from {source_name}: {message}")]
    EvidenceParseError {
        source_name: String,
        message: String,
    },

    /// The supplementary (free-text) analysis could not be used.
    #[error("Supplementary analysis failed: {message}")]
    SupplementaryAnalysis { message: String },

    /// A source file could not be parsed structurally.
    #[error("Failed to parse source: {message}")]
    SourceParse { message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for pitfall operations.
pub type Result<T> = std::result::Result<T, PitfallError>;
