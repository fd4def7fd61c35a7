//! Pattern-anchored patching of native project files.
//!
//! A [`PatchSchema`] lists target files; each file lists configuration keys;
//! each key lists [`PatchRule`]s. [`PatchSchema::resolve`] walks that tree in
//! declaration order, reading each file once, threading its text through every
//! rule, and writing it back once.
pub mod builtin;
pub mod schema;
pub mod strategy;

use std::fmt;
use std::path::{Path, PathBuf};

pub use schema::{FilePatch, Handler, KeyRules, PatchRule, PatchSchema, TypedRule};
pub use strategy::{Strategies, Strategy, Target};

use crate::config::ConfigValues;
use crate::error::PatchError;
use crate::fs::FileSystem;
use crate::logging::{Log, PatchStatus};

/// Collaborators for one resolution pass.
pub struct PatchContext<'a> {
    /// Where target files are read from and written to.
    pub fs: &'a dyn FileSystem,
    /// Progress and per-file summary.
    pub log: &'a dyn Log,
    /// Compute patches without writing any file.
    pub dry_run: bool,
}

impl fmt::Debug for PatchContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatchContext")
            .field("dry_run", &self.dry_run)
            .finish_non_exhaustive()
    }
}

/// What happened to one target file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    /// Absolute (base-joined) path of the file.
    pub path: PathBuf,
    /// Whether any rule changed the text.
    pub changed: bool,
    /// Whether the file was written back.
    pub written: bool,
}

impl PatchSchema {
    /// Apply every file of the schema under `base`.
    ///
    /// Files are processed strictly one after another. A failure stops the
    /// pass: the failing file is not written, files already written stay
    /// written.
    ///
    /// # Errors
    ///
    /// Returns [`PatchError::Fs`] if a file cannot be read or written,
    /// [`PatchError::MissingValue`] when a typed rule's key has no value, and
    /// [`PatchError::InvalidPattern`] for a pattern that does not compile.
    pub fn resolve(
        &self,
        values: &ConfigValues,
        base: &Path,
        ctx: &PatchContext<'_>,
    ) -> Result<Vec<FileOutcome>, PatchError> {
        let mut outcomes = Vec::with_capacity(self.files().len());
        for file in self.files() {
            let name = file.path.display().to_string();
            let outcome = file.resolve(values, base, ctx).inspect_err(|e| {
                ctx.log.error(&format!("{name}: {e}"));
                ctx.log
                    .record_file(&name, PatchStatus::Failed, Some(&e.to_string()));
            })?;
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }
}

impl FilePatch {
    /// Read, patch, and write back this file under `base`.
    ///
    /// # Errors
    ///
    /// See [`PatchSchema::resolve`].
    pub fn resolve(
        &self,
        values: &ConfigValues,
        base: &Path,
        ctx: &PatchContext<'_>,
    ) -> Result<FileOutcome, PatchError> {
        let path = base.join(&self.path);
        let name = self.path.display().to_string();
        ctx.log.debug(&format!(
            "{name}: {} key(s) from {}",
            self.keys.len(),
            path.display()
        ));

        let source = ctx.fs.read_text(&path)?;
        let patched = self.patch_text(&source, values)?;
        let changed = patched != source;

        if ctx.dry_run {
            if changed {
                ctx.log.dry_run(&format!("would patch {name}"));
            }
            let message = if changed { "would change" } else { "no match" };
            ctx.log
                .record_file(&name, PatchStatus::DryRun, Some(message));
            return Ok(FileOutcome {
                path,
                changed,
                written: false,
            });
        }

        ctx.fs.write_text(&path, &patched)?;
        if changed {
            ctx.log.debug(&format!("patched {name}"));
            ctx.log.record_file(&name, PatchStatus::Patched, None);
        } else {
            ctx.log.record_file(&name, PatchStatus::Unchanged, Some("no match"));
        }
        Ok(FileOutcome {
            path,
            changed,
            written: true,
        })
    }
}
