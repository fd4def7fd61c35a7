//! Core logging types: per-file entries, status, and the [`Log`] trait.

/// Outcome of one patched file, kept for the run summary.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// File path relative to the project directory.
    pub name: String,
    /// Final status of the file.
    pub status: PatchStatus,
    /// Optional detail message (e.g., the error that stopped the run).
    pub message: Option<String>,
}

/// Status of a file after a resolution pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchStatus {
    /// At least one rule changed the file and it was written.
    Patched,
    /// No rule matched; the file was written back unchanged.
    Unchanged,
    /// Dry-run mode; the file was not written.
    DryRun,
    /// Patching stopped on this file with an error.
    Failed,
}

impl PatchStatus {
    /// Lower-case tag used in the log file.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Patched => "patched",
            Self::Unchanged => "unchanged",
            Self::DryRun => "dry run",
            Self::Failed => "failed",
        }
    }
}

/// Abstraction over logging backends.
///
/// [`Logger`](super::logger::Logger) implements it for the CLI; resolvers
/// take `&dyn Log` so tests can capture messages instead.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
    /// Record a file result for the summary.
    fn record_file(&self, name: &str, status: PatchStatus, message: Option<&str>);
}
