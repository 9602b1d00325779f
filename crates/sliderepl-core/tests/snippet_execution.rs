//! Build-and-run pipeline tests.
//!
//! Most tests drive the pipeline through a stand-in `go` shell script so
//! they need no Go installation. The script checks that it receives a
//! normalized program and writes a small shell "executable" whose
//! behavior is picked by marker words in the snippet.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use sliderepl_core::{RunnerConfig, SnippetRunner, TempRoot, Toolchain, UniqueNames};
use tempfile::TempDir;

// =============================================================================
// Test Helpers
// =============================================================================

const FAKE_GO: &str = r##"#!/bin/sh
[ "$1" = "build" ] || { echo "unsupported: $*"; exit 2; }
[ "$2" = "-o" ] || { echo "missing -o"; exit 2; }
bin="$3"
src="$4"
dir=$(pwd -P)
if [ "$(head -n 1 "$src")" != "package main" ]; then
    echo "# command-line-arguments"
    echo "./$src:1:1: expected 'package', found x"
    exit 1
fi
if grep -q BROKEN "$src"; then
    echo "# command-line-arguments"
    echo "./$src:4:1: syntax error: unexpected BROKEN"
    echo "$dir/$src:4:1: same error, absolute"
    exit 1
fi
if grep -q CRASH "$src"; then
    printf '#!/bin/sh\necho about to crash\necho "panic at %s:5" 1>&2\nexit 2\n' "$dir/$src" > "$bin"
elif grep -q SILENT_FAIL "$src"; then
    printf '#!/bin/sh\nexit 7\n' > "$bin"
elif grep -q SLOW_CHILD "$src"; then
    printf '#!/bin/sh\necho waiting\nsleep 5\necho never\n' > "$bin"
elif grep -q HANG "$src"; then
    printf '#!/bin/sh\nexec sleep 5\n' > "$bin"
else
    printf '#!/bin/sh\necho "# not a preamble"\necho hello\n' > "$bin"
fi
chmod +x "$bin"
"##;

/// Scratch temp root plus a stand-in toolchain.
struct Fixture {
    _tools: TempDir,
    root_dir: TempDir,
    go: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let tools = TempDir::new().expect("Failed to create tools dir");
        let go = tools.path().join("go");
        fs::write(&go, FAKE_GO).expect("Failed to write fake go");
        fs::set_permissions(&go, fs::Permissions::from_mode(0o755))
            .expect("Failed to chmod fake go");

        Self {
            _tools: tools,
            root_dir: TempDir::new().expect("Failed to create temp root"),
            go,
        }
    }

    fn runner(&self) -> SnippetRunner {
        let toolchain = Toolchain::with_program(&self.go).expect("fake go is executable");
        let root = TempRoot::resolve(self.root_dir.path()).expect("Failed to resolve root");
        let names = UniqueNames::start().expect("Failed to start name source");
        SnippetRunner::new(toolchain, root, names)
    }

    fn root(&self) -> &Path {
        self.root_dir.path()
    }

    fn leftover_artifacts(&self) -> Vec<String> {
        fs::read_dir(self.root())
            .expect("Failed to list temp root")
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }
}

fn text(output: &[u8]) -> String {
    String::from_utf8_lossy(output).into_owned()
}

// =============================================================================
// Outcomes
// =============================================================================

#[test]
fn test_successful_run_returns_stdout() {
    let fixture = Fixture::new();
    let outcome = fixture.runner().execute(b"fmt.Println(\"hello\")");

    assert!(!outcome.failed, "unexpected failure: {}", text(&outcome.output));
    // Lines starting with '#' survive when nothing failed.
    assert_eq!(text(&outcome.output), "# not a preamble\nhello\n");
    assert!(fixture.leftover_artifacts().is_empty());
}

#[test]
fn test_complete_program_passes_through() {
    let fixture = Fixture::new();
    let source = b"package main\n\nfunc main() {}\n";
    let outcome = fixture.runner().execute(source);

    assert!(!outcome.failed);
    assert!(fixture.leftover_artifacts().is_empty());
}

#[test]
fn test_build_failure_hides_preamble_and_paths() {
    let fixture = Fixture::new();
    let outcome = fixture.runner().execute(b"BROKEN");

    assert!(outcome.failed);
    let output = text(&outcome.output);
    assert!(
        output.lines().all(|line| !line.starts_with('#')),
        "preamble leaked: {output}"
    );
    assert!(output.contains("./main.go:4:1: syntax error: unexpected BROKEN"));
    assert!(output.contains("\nmain.go:4:1: same error, absolute"));
    assert!(!output.contains("compile"));
    assert!(!output.contains(&fixture.root().to_string_lossy().to_string()));
    assert!(fixture.leftover_artifacts().is_empty());
}

#[test]
fn test_run_failure_returns_combined_output() {
    let fixture = Fixture::new();
    let outcome = fixture.runner().execute(b"CRASH()");

    assert!(outcome.failed);
    assert_eq!(text(&outcome.output), "about to crash\npanic at main.go:5\n");
    assert!(fixture.leftover_artifacts().is_empty());
}

#[test]
fn test_silent_failure_reports_exit_status() {
    let fixture = Fixture::new();
    let outcome = fixture.runner().execute(b"SILENT_FAIL()");

    assert!(outcome.failed);
    assert_eq!(text(&outcome.output), "exit status: 7");
}

#[test]
fn test_timeout_kills_program() {
    let fixture = Fixture::new();
    let runner = fixture.runner().with_config(RunnerConfig {
        timeout: Some(Duration::from_millis(1000)),
    });

    let outcome = runner.execute(b"HANG()");
    assert!(outcome.failed);
    assert!(text(&outcome.output).starts_with("timed out after"));
    assert!(fixture.leftover_artifacts().is_empty());
}

#[test]
fn test_timeout_kills_processes_started_by_program() {
    let fixture = Fixture::new();
    let runner = fixture.runner().with_config(RunnerConfig {
        timeout: Some(Duration::from_millis(500)),
    });

    let start = Instant::now();
    let outcome = runner.execute(b"SLOW_CHILD()");

    assert!(start.elapsed() < Duration::from_secs(3));
    assert!(outcome.failed);
    let output = text(&outcome.output);
    assert!(output.starts_with("waiting\ntimed out after"), "got: {output}");
    assert!(!output.contains("never"));
    assert!(fixture.leftover_artifacts().is_empty());
}

#[test]
fn test_write_failure_short_circuits() {
    let fixture = Fixture::new();
    let runner = fixture.runner();
    fs::remove_dir(fixture.root()).expect("Failed to remove temp root");

    let outcome = runner.execute(b"fmt.Println(1)");
    assert!(outcome.failed);
    assert!(!outcome.output.is_empty());
    assert!(!text(&outcome.output).contains("hello"));
}

#[test]
fn test_missing_toolchain_is_a_failure_outcome() {
    let fixture = Fixture::new();
    let runner = fixture.runner();
    fs::remove_file(&fixture.go).expect("Failed to remove fake go");

    let outcome = runner.execute(b"fmt.Println(1)");
    assert!(outcome.failed);
    assert!(text(&outcome.output).starts_with("failed to run go build"));
    assert!(fixture.leftover_artifacts().is_empty());
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_concurrent_requests_are_independent() {
    let fixture = Fixture::new();
    let runner = Arc::new(fixture.runner());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let runner = Arc::clone(&runner);
            thread::spawn(move || {
                let source = if i % 2 == 0 { "ok()" } else { "BROKEN" };
                (i, runner.execute(source.as_bytes()))
            })
        })
        .collect();

    for handle in handles {
        let (i, outcome) = handle.join().unwrap();
        assert_eq!(outcome.failed, i % 2 == 1, "request {i}");
    }
    assert!(fixture.leftover_artifacts().is_empty());
}

// =============================================================================
// Real toolchain
// =============================================================================

#[test]
fn test_real_go_when_installed() {
    let Ok(toolchain) = Toolchain::detect() else {
        eprintln!("go not installed, skipping");
        return;
    };
    let root_dir = TempDir::new().unwrap();
    let root = TempRoot::resolve(root_dir.path()).unwrap();
    let runner = SnippetRunner::new(toolchain, root, UniqueNames::start().unwrap());

    let ok = runner.execute(b"import \"fmt\"\nfmt.Println(\"hi from go\")\n");
    assert!(!ok.failed, "build failed: {}", text(&ok.output));
    assert_eq!(text(&ok.output), "hi from go\n");

    let broken = runner.execute(b"x := \n");
    assert!(broken.failed);
    let output = text(&broken.output);
    assert!(output.lines().all(|line| !line.starts_with('#')));
    assert!(output.contains("main.go"));
    assert!(fs::read_dir(root_dir.path()).unwrap().next().is_none());
}
