//! Build-and-run execution of normalized snippets.
//!
//! [`SnippetRunner`] drives the whole pipeline for one request; the
//! submodules cover scoped artifact removal and child process capture.

mod artifact;
mod process;
mod runner;

pub use artifact::Artifact;
pub use process::{Captured, Termination, run_combined};
pub use runner::{Outcome, RunnerConfig, SnippetRunner};
