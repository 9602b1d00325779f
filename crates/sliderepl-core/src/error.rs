//! Error types for sliderepl-core.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for sliderepl-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sliderepl-core.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to read the slide source document.
    #[error("failed to read slides from {path}: {message}")]
    SlideSource { path: PathBuf, message: String },

    /// The temporary directory could not be resolved.
    #[error("failed to resolve temp directory {path}: {message}")]
    TempRoot { path: PathBuf, message: String },

    /// Toolchain error.
    #[error("toolchain error: {0}")]
    Toolchain(String),

    /// The unique name producer is no longer running.
    #[error("unique name source closed")]
    NameSourceClosed,

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Format the error together with a recovery hint, for terminal display.
    pub fn with_hint(&self) -> String {
        let hint = match self {
            Error::SlideSource { .. } => {
                Some("pass the presentation file with --slides <path>")
            }
            Error::TempRoot { .. } => Some("check that TMPDIR points to an existing directory"),
            Error::Toolchain(_) => {
                Some("install Go from https://go.dev/dl/ or pass its location with --go <path>")
            }
            Error::NameSourceClosed | Error::Io(_) => None,
        };

        match hint {
            Some(hint) => format!("{self}\n  hint: {hint}"),
            None => self.to_string(),
        }
    }
}
