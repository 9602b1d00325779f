//! Go toolchain discovery.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{Error, Result};

/// Locates the `go` command used to build snippets.
#[derive(Debug, Clone)]
pub struct Toolchain {
    /// Path to the `go` executable.
    go_path: PathBuf,
}

impl Toolchain {
    /// Find `go` in PATH.
    pub fn detect() -> Result<Self> {
        let go_path = which::which("go")
            .map_err(|_| Error::Toolchain("go not found in PATH".to_string()))?;
        Ok(Self { go_path })
    }

    /// Use an explicit `go` executable.
    ///
    /// Bare names are looked up in PATH; anything containing a path
    /// separator must exist as given.
    pub fn with_program(program: impl AsRef<Path>) -> Result<Self> {
        let program = program.as_ref();
        let go_path = which::which(program).map_err(|e| {
            Error::Toolchain(format!("{} is not executable: {}", program.display(), e))
        })?;
        Ok(Self { go_path })
    }

    /// Get the `go` path.
    pub fn go_path(&self) -> &Path {
        &self.go_path
    }

    /// Get the toolchain version string (`go version` output).
    pub fn version(&self) -> Result<String> {
        let output = Command::new(&self.go_path)
            .arg("version")
            .stdin(Stdio::null())
            .output()
            .map_err(|e| Error::Toolchain(format!("Failed to run go: {}", e)))?;

        if !output.status.success() {
            return Err(Error::Toolchain("Failed to get go version".to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Build command for `file` (relative to `dir`), writing `executable`.
    ///
    /// The command runs inside `dir`, as `go build` expects for a single
    /// file outside any module.
    pub fn build_command(&self, dir: &Path, file: &Path, executable: &Path) -> Command {
        let mut cmd = Command::new(&self.go_path);
        cmd.arg("build")
            .arg("-o")
            .arg(executable)
            .arg(file)
            .current_dir(dir);
        cmd
    }
}
