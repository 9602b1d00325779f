//! Rewriting of captured toolchain output.

use std::sync::LazyLock;

use regex::bytes::{NoExpand, Regex};

use crate::paths::ArtifactPaths;

/// Name shown to callers in place of the temporary source path.
pub const PLACEHOLDER_SOURCE: &str = "main.go";

/// Lines like `# command-line-arguments` that `go build` prints ahead of
/// its diagnostics.
static PREAMBLE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#[^\n]*(?:\n|$)").expect("preamble pattern is valid"));

/// Post-process output captured from the build or run step.
///
/// Preamble lines are only dropped for failed outcomes; a successful
/// program may legitimately print lines starting with `#`. In both cases
/// every mention of the temporary source file, by absolute path or by file
/// name, becomes [`PLACEHOLDER_SOURCE`].
pub fn rewrite(output: &[u8], artifacts: &ArtifactPaths, failed: bool) -> Vec<u8> {
    let mut text = if failed {
        PREAMBLE_LINE.replace_all(output, &b""[..]).into_owned()
    } else {
        output.to_vec()
    };

    let absolute = artifacts.source.to_string_lossy();
    let file_name = artifacts.source_file_name().to_string_lossy();
    for needle in [&*absolute, &*file_name] {
        text = replace_literal(&text, needle, PLACEHOLDER_SOURCE);
    }

    text
}

/// Replace every occurrence of `needle`, taken literally.
fn replace_literal(haystack: &[u8], needle: &str, replacement: &str) -> Vec<u8> {
    if needle.is_empty() {
        return haystack.to_vec();
    }

    match Regex::new(&regex::escape(needle)) {
        Ok(pattern) => pattern
            .replace_all(haystack, NoExpand(replacement.as_bytes()))
            .into_owned(),
        Err(e) => {
            tracing::warn!("Cannot match {:?} in output: {}", needle, e);
            haystack.to_vec()
        }
    }
}
