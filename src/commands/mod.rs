//! Top-level subcommand orchestration.
pub mod apply;
pub mod properties;
pub mod version;

use std::path::PathBuf;

use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;

/// Environment variable naming the project root when `--root` is absent.
pub const ROOT_ENV: &str = "PLATFORM_CONFIG_ROOT";

/// Resolve the project root: `--root`, then `PLATFORM_CONFIG_ROOT`, then the
/// current directory.
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined.
pub fn resolve_root(global: &GlobalOpts) -> Result<PathBuf> {
    if let Some(ref root) = global.root {
        return Ok(root.clone());
    }
    if let Some(root) = std::env::var_os(ROOT_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(root));
    }
    std::env::current_dir().context("cannot determine project root: current directory unavailable")
}
