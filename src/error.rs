//! Domain-specific error types for the configuration patcher.
//!
//! This module provides a structured error hierarchy using [`thiserror`].
//! Library modules return typed errors (e.g., [`PatchError`], [`ConfigError`])
//! while command handlers at the CLI boundary convert them to [`anyhow::Error`]
//! via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! Error
//! ├── Patch(PatchError)       : missing values, bad patterns, file access
//! ├── Config(ConfigError)     : persisted config parsing, prompting
//! └── Platform(PlatformError) : unknown platform identifiers
//!
//! FsError                     : shared by PatchError and ConfigError
//! ```
//!
//! A pattern that matches nothing is **not** an error: strategies leave the
//! text untouched and the resolver reports the file as unchanged.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the configuration patcher.
///
/// Aggregates domain-specific sub-errors and is convertible to
/// [`anyhow::Error`] for use at CLI command boundaries.
#[derive(Error, Debug)]
pub enum Error {
    /// Applying a patch schema failed.
    #[error("Patch error: {0}")]
    Patch(#[from] PatchError),

    /// Loading, prompting for, or persisting configuration values failed.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The requested platform is not known.
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),
}

/// Errors raised by the filesystem seam.
#[derive(Error, Debug)]
pub enum FsError {
    /// The file does not exist.
    #[error("File not found: {}", .path.display())]
    NotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// Reading or writing the file failed for another reason.
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors that arise while applying a patch schema to a native project.
#[derive(Error, Debug)]
pub enum PatchError {
    /// A typed rule was reached but its configuration key has no value.
    #[error("Config:[{0}] must have a value")]
    MissingValue(String),

    /// A pattern target could not be compiled into a regular expression.
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The offending pattern source.
        pattern: String,
        /// Compiler error from the regex engine.
        source: regex::Error,
    },

    /// The target file could not be read or written.
    #[error(transparent)]
    Fs(#[from] FsError),
}

/// Errors that arise while resolving configuration values.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A persisted configuration file exists but is not a flat string mapping.
    #[error("Invalid configuration file {}: {message}", .path.display())]
    Parse {
        /// Path to the malformed file.
        path: PathBuf,
        /// Human-readable description of the problem.
        message: String,
    },

    /// A persisted configuration file could not be read or written.
    #[error(transparent)]
    Fs(#[from] FsError),

    /// The prompt collaborator failed to collect answers.
    #[error("Prompt failed: {0}")]
    Prompt(String),
}

/// Errors that arise from platform identifiers.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// The identifier does not name a supported platform.
    #[error("Unsupported platform '{0}': must be one of ios, android")]
    Unsupported(String),
}
