//! Native project configuration patcher.
//!
//! Rewrites the handful of values a native iOS or Android project needs
//! (application id, display name, entry bundle, signing identity, …) directly
//! in the project's own files with pattern-anchored text substitution. Files
//! are never parsed into a tree; everything outside a matched region is left
//! byte-for-byte untouched.
//!
//! The public API is organised into four layers:
//!
//! - **[`patch`]**: strategies, the file → key → rule schema, and its resolver
//! - **[`config`]**: merge defaults, persisted values and overrides; prompt for gaps
//! - **[`platform`]**: the built-in iOS and Android schemas
//! - **[`commands`]**: top-level subcommand orchestration (`apply`, `properties`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod fs;
pub mod logging;
pub mod patch;
pub mod platform;
pub mod prompt;

pub use error::Error;
