//! Core engine for sliderepl, a live-coding slide server for Go talks.
//!
//! This crate provides:
//! - Slide deck parsing with speaker notes
//! - Previous/next navigation indices
//! - Snippet normalization into complete Go programs
//! - Build-and-run execution with guaranteed artifact cleanup
//! - A lock-free source of unique artifact names

pub mod compile;
pub mod error;
pub mod execute;
pub mod names;
pub mod navigation;
pub mod paths;
pub mod slides;

pub use compile::{Toolchain, normalize};
pub use error::{Error, Result};
pub use execute::{Outcome, RunnerConfig, SnippetRunner};
pub use names::UniqueNames;
pub use navigation::{Neighbors, neighbors};
pub use paths::{ArtifactPaths, TempRoot};
pub use slides::{Slide, SlideDeck};
