//! Compilation side of the pipeline.
//!
//! This module provides:
//! - Snippet normalization (fragment → `package main` program)
//! - Toolchain discovery (`go` on PATH)
//! - Diagnostic rewriting (preamble stripping, path hiding)
//!
//! # Architecture
//!
//! ```text
//! request body ──► normalize ──► compileN.go ──► go build ──► compileN ──► run
//!                                                    │                       │
//!                                                    └──── rewrite ◄─────────┘
//! ```

pub mod diagnostics;
mod snippet;
mod toolchain;

pub use diagnostics::{PLACEHOLDER_SOURCE, rewrite};
pub use snippet::{is_complete_unit, normalize};
pub use toolchain::Toolchain;
