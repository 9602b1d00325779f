//! Build-and-run orchestration for submitted snippets.

use std::fs;
use std::process::Command;
use std::time::{Duration, Instant};

use crate::compile::{Toolchain, normalize, rewrite};
use crate::names::UniqueNames;
use crate::paths::{ArtifactPaths, TempRoot};

use super::artifact::Artifact;
use super::process::{Captured, Termination, run_combined};

/// Result of one build-and-run invocation.
///
/// The caller only learns *that* something failed; which step failed is
/// visible in the output text alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Rewritten combined output of the last step attempted.
    pub output: Vec<u8>,
    /// Whether writing, building, or running failed.
    pub failed: bool,
}

impl Outcome {
    fn failure(output: impl Into<Vec<u8>>) -> Self {
        Self {
            output: output.into(),
            failed: true,
        }
    }

    /// Output as text, replacing invalid UTF-8.
    pub fn output_lossy(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }
}

/// Runner configuration.
#[derive(Debug, Clone, Default)]
pub struct RunnerConfig {
    /// Limit applied separately to the build and to the run step.
    /// `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

/// Builds and runs snippets with the Go toolchain.
///
/// Each call to [`SnippetRunner::execute`] is independent: it draws its own
/// artifact name, spawns its own processes, and removes its own files. A
/// runner can be shared between threads.
#[derive(Clone)]
pub struct SnippetRunner {
    toolchain: Toolchain,
    root: TempRoot,
    names: UniqueNames,
    config: RunnerConfig,
}

impl SnippetRunner {
    /// Create a new runner.
    pub fn new(toolchain: Toolchain, root: TempRoot, names: UniqueNames) -> Self {
        Self {
            toolchain,
            root,
            names,
            config: RunnerConfig::default(),
        }
    }

    /// Set the runner configuration.
    pub fn with_config(mut self, config: RunnerConfig) -> Self {
        self.config = config;
        self
    }

    /// Temp root used for artifacts.
    pub fn root(&self) -> &TempRoot {
        &self.root
    }

    /// Normalize, build, and run `source`, returning its rewritten output.
    ///
    /// Blocks until both child processes are done. Never leaves artifacts
    /// behind, whatever the outcome.
    pub fn execute(&self, source: &[u8]) -> Outcome {
        let id = match self.names.next_id() {
            Ok(id) => id,
            Err(e) => return Outcome::failure(e.to_string()),
        };
        let artifacts = self.root.artifacts(id);
        let start = Instant::now();

        let (step, failed) = self.build_and_run(id, &artifacts, source);
        let output = match step {
            Step::Io(message) => return Outcome::failure(message),
            Step::Captured(Captured {
                mut output,
                termination,
            }) => {
                if failed {
                    append_termination(&mut output, termination);
                }
                output
            }
        };

        tracing::debug!(
            id,
            failed,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Snippet finished"
        );

        Outcome {
            output: rewrite(&output, &artifacts, failed),
            failed,
        }
    }

    /// Write, build, and run. Both artifacts are removed when this returns.
    fn build_and_run(&self, id: u64, artifacts: &ArtifactPaths, source: &[u8]) -> (Step, bool) {
        let source_file = Artifact::claim(&artifacts.source);
        if let Err(e) = fs::write(source_file.path(), normalize(source)) {
            tracing::warn!(id, "Failed to write {}: {}", source_file.path().display(), e);
            return (Step::Io(e.to_string()), true);
        }

        tracing::debug!(id, "Building {}", artifacts.source.display());
        let build = self.toolchain.build_command(
            artifacts.dir(),
            artifacts.source_file_name(),
            &artifacts.executable,
        );
        let built = self.spawn("go build", build);
        let executable = Artifact::claim(&artifacts.executable);

        match built {
            Ok(captured) if captured.success() => {}
            Ok(captured) => return (Step::Captured(captured), true),
            Err(message) => return (Step::Io(message), true),
        }

        tracing::debug!(id, "Running {}", executable.path().display());
        match self.spawn("program", Command::new(executable.path())) {
            Ok(captured) => {
                let failed = !captured.success();
                (Step::Captured(captured), failed)
            }
            Err(message) => (Step::Io(message), true),
        }
    }

    fn spawn(&self, what: &str, cmd: Command) -> Result<Captured, String> {
        run_combined(cmd, self.config.timeout).map_err(|e| format!("failed to run {what}: {e}"))
    }
}

/// What the last attempted step left behind.
enum Step {
    /// The step could not be carried out at all.
    Io(String),
    /// The step ran; its output and exit are known.
    Captured(Captured),
}

/// Make sure a failed step never comes back empty, and that a timeout is
/// visible in the output.
fn append_termination(output: &mut Vec<u8>, termination: Termination) {
    match termination {
        Termination::TimedOut(_) => {
            if !output.is_empty() && !output.ends_with(b"\n") {
                output.push(b'\n');
            }
            output.extend_from_slice(termination.describe().as_bytes());
        }
        Termination::Exited(_) if output.is_empty() => {
            output.extend_from_slice(termination.describe().as_bytes());
        }
        Termination::Exited(_) => {}
    }
}
