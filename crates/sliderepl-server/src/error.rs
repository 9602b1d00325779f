//! Error types for the sliderepl server.

use std::path::PathBuf;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// IO error.
    #[error("IO error at {path}: {message}")]
    Io { path: PathBuf, message: String },

    /// sliderepl core error.
    #[error("Core error: {0}")]
    Core(#[from] sliderepl_core::Error),

    /// The configured listen address is not a valid socket address.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// The listener could not be bound.
    #[error("Failed to listen on {addr}: {message}")]
    Bind { addr: String, message: String },
}

impl ServerError {
    /// Format the error with a recovery hint where one is known.
    pub fn with_hint(&self) -> String {
        match self {
            Self::Core(e) => e.with_hint(),
            Self::InvalidAddress(_) => format!("{self}\n  hint: use host:port, e.g. 127.0.0.1:3999"),
            Self::Bind { .. } => {
                format!("{self}\n  hint: the port may be in use; choose another with --http")
            }
            Self::Io { .. } => self.to_string(),
        }
    }
}

impl From<std::io::Error> for ServerError {
    fn from(e: std::io::Error) -> Self {
        Self::Io {
            path: PathBuf::new(),
            message: e.to_string(),
        }
    }
}

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
