//! Filesystem seam used by the patch and configuration resolvers.
//!
//! Resolvers never touch `std::fs` directly; they go through [`FileSystem`]
//! so tests can run against an in-memory tree and observe every write.
use std::io;
use std::path::Path;

use crate::error::FsError;

/// Text-level access to files keyed by path.
#[cfg_attr(test, mockall::automock)]
pub trait FileSystem: Send + Sync {
    /// Whether a file exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Read the whole file as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::NotFound`] if the file does not exist and
    /// [`FsError::Io`] for any other read failure.
    fn read_text(&self, path: &Path) -> Result<String, FsError>;

    /// Replace the file's content with `content`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::Io`] if the file cannot be written.
    fn write_text(&self, path: &Path, content: &str) -> Result<(), FsError>;
}

/// [`FileSystem`] backed by the real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_text(&self, path: &Path) -> Result<String, FsError> {
        std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                FsError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                FsError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })
    }

    fn write_text(&self, path: &Path, content: &str) -> Result<(), FsError> {
        let io_error = |source: io::Error| FsError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        std::fs::write(path, content).map_err(io_error)
    }
}
