//! Temporary artifact locations.
//!
//! Every build-and-run invocation places its files directly under one
//! temp root, named after a number drawn from [`UniqueNames`]:
//!
//! ```text
//! <temp root>/
//! ├── compile17.go   # normalized source
//! └── compile17      # built executable (.exe on Windows)
//! ```
//!
//! [`UniqueNames`]: crate::names::UniqueNames

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Prefix shared by every artifact base name.
const ARTIFACT_PREFIX: &str = "compile";

/// The real (symlink-resolved) directory that holds per-request artifacts.
///
/// Resolved once at startup. The resolved form matters because diagnostics
/// printed by the toolchain use the canonical path, and those are rewritten
/// by exact string match.
#[derive(Debug, Clone)]
pub struct TempRoot {
    dir: PathBuf,
}

impl TempRoot {
    /// Resolve the system temp directory.
    pub fn system() -> Result<Self> {
        Self::resolve(std::env::temp_dir())
    }

    /// Resolve an explicit directory, following symlinks.
    pub fn resolve(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let dir = dir.canonicalize().map_err(|e| Error::TempRoot {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;

        if !dir.is_dir() {
            return Err(Error::TempRoot {
                path: dir,
                message: "not a directory".to_string(),
            });
        }

        Ok(Self { dir })
    }

    /// The resolved directory.
    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Paths for the artifacts of invocation `id`.
    pub fn artifacts(&self, id: u64) -> ArtifactPaths {
        ArtifactPaths::new(self.dir.join(format!("{ARTIFACT_PREFIX}{id}")))
    }
}

/// Source and executable paths derived from one artifact base path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// Base path without extension.
    pub base: PathBuf,
    /// `<base>.go`
    pub source: PathBuf,
    /// `<base>` plus the platform executable suffix.
    pub executable: PathBuf,
}

impl ArtifactPaths {
    fn new(base: PathBuf) -> Self {
        let source = with_suffix(&base, ".go");
        let executable = with_suffix(&base, std::env::consts::EXE_SUFFIX);
        Self {
            base,
            source,
            executable,
        }
    }

    /// File name of the source artifact, as passed to the build step.
    pub fn source_file_name(&self) -> &Path {
        self.source
            .file_name()
            .map(Path::new)
            .unwrap_or(self.source.as_path())
    }

    /// Directory holding both artifacts.
    pub fn dir(&self) -> &Path {
        self.base.parent().unwrap_or(Path::new("."))
    }
}

fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
