//! Structured logger with dry-run awareness and summary collection.
use std::path::PathBuf;
use std::sync::Mutex;

use super::types::{FileEntry, Log, PatchStatus};
use super::utils::log_file_path;

/// Implement the display methods of [`Log`] by delegating to inherent methods
/// of the same name on the implementing type.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Structured logger with dry-run awareness and summary collection.
///
/// Console and file output both go through [`tracing`]; the persistent log
/// lives at `$XDG_CACHE_HOME/platform-config/<command>.log` and is written by
/// the layer installed with [`init_subscriber`](super::subscriber::init_subscriber).
#[derive(Debug)]
pub struct Logger {
    files: Mutex<Vec<FileEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a new logger for `command`.
    ///
    /// Only remembers the log file path for the summary; the file itself is
    /// created by the layer [`init_subscriber`](super::subscriber::init_subscriber)
    /// installs.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            files: Mutex::new(Vec::new()),
            log_file: log_file_path(command),
        }
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: "platform_config::stage", "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (console only when verbose; always in the log file).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a dry-run action message.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: "platform_config::dry_run", "{msg}");
    }

    /// Record a file result for the summary.
    ///
    /// Also emitted as a `debug` event carrying `file` and `status` fields, so
    /// the log file keeps one line per patched file.
    pub fn record_file(&self, name: &str, status: PatchStatus, message: Option<&str>) {
        tracing::debug!(
            target: "platform_config::file",
            file = name,
            status = status.label(),
            "{}",
            message.unwrap_or_default()
        );
        if let Ok(mut guard) = self.files.lock() {
            guard.push(FileEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Return a clone of all recorded file entries.
    #[must_use]
    pub fn entries(&self) -> Vec<FileEntry> {
        self.files.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Print the summary of all recorded files.
    pub fn print_summary(&self) {
        let files = self.entries();
        if files.is_empty() {
            return;
        }

        self.stage("Summary");
        for file in &files {
            let (icon, color) = status_style(file.status);
            let suffix = file
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));
            self.info(&format!("{color}{icon} {}{suffix}\x1b[0m", file.name));
        }

        self.info(&summary_line(&files));
        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, dry_run);

    fn record_file(&self, name: &str, status: PatchStatus, message: Option<&str>) {
        self.record_file(name, status, message);
    }
}

/// Icon and ANSI color for a status line.
const fn status_style(status: PatchStatus) -> (&'static str, &'static str) {
    match status {
        PatchStatus::Patched => ("✓", "\x1b[32m"),
        PatchStatus::Unchanged => ("·", "\x1b[2m"),
        PatchStatus::DryRun => ("~", "\x1b[37m"),
        PatchStatus::Failed => ("✗", "\x1b[31m"),
    }
}

/// One-line count of files per status.
fn summary_line(files: &[FileEntry]) -> String {
    let count = |status: PatchStatus| files.iter().filter(|f| f.status == status).count();
    format!(
        "{} files: \x1b[32m{} patched\x1b[0m, \x1b[2m{} unchanged\x1b[0m, \x1b[37m{} dry-run\x1b[0m, \x1b[31m{} failed\x1b[0m",
        files.len(),
        count(PatchStatus::Patched),
        count(PatchStatus::Unchanged),
        count(PatchStatus::DryRun),
        count(PatchStatus::Failed),
    )
}
