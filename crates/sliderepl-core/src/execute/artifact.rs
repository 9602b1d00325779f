//! Scoped ownership of temporary files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A temporary file removed when the guard goes out of scope.
///
/// The file does not need to exist when the guard is created; a missing
/// file at drop time is not an error. Other removal failures are logged
/// and otherwise ignored, so they never replace the outcome being reported.
#[derive(Debug)]
pub struct Artifact {
    path: PathBuf,
}

impl Artifact {
    /// Take ownership of `path`.
    pub fn claim(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the guarded file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for Artifact {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => tracing::trace!("Removed {}", self.path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Failed to remove {}: {}", self.path.display(), e),
        }
    }
}
