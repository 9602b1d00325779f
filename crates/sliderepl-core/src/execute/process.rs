//! Child process invocation with merged output capture.
//!
//! On Unix each child leads its own process group, so a timeout kills
//! everything it started (the compiler and linker under `go build`, or
//! processes a submitted program spawns), not only the direct child.

use std::io::{self, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

/// How often a time-limited child is polled for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// How long to keep draining output after the process group was killed.
const DRAIN_GRACE: Duration = Duration::from_millis(500);

/// How a child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The process exited (or was killed by a signal) on its own.
    Exited(ExitStatus),
    /// The process exceeded its time limit and was killed.
    TimedOut(Duration),
}

impl Termination {
    /// Human-readable description, e.g. `exit status: 2`.
    pub fn describe(&self) -> String {
        match self {
            Termination::Exited(status) => status.to_string(),
            Termination::TimedOut(limit) => format!("timed out after {limit:?}"),
        }
    }
}

/// Output and termination of one child process.
#[derive(Debug)]
pub struct Captured {
    /// Interleaved stdout and stderr, in the order the child wrote them.
    pub output: Vec<u8>,
    /// How the process ended.
    pub termination: Termination,
}

impl Captured {
    /// Whether the process exited with status zero.
    pub fn success(&self) -> bool {
        matches!(self.termination, Termination::Exited(status) if status.success())
    }
}

/// Run `cmd` to completion with stdout and stderr sent into one pipe.
///
/// Stdin is closed. With a `timeout`, the whole call is bounded: a child
/// still running at the deadline is killed together with its process
/// group, and output still held open by leftover processes is abandoned
/// shortly after. Errors are spawn, wait, or read failures only; a
/// non-zero exit is reported through [`Captured::termination`].
pub fn run_combined(mut cmd: Command, timeout: Option<Duration>) -> io::Result<Captured> {
    let deadline = timeout.map(|limit| Instant::now() + limit);

    let (reader, writer) = io::pipe()?;
    cmd.stdin(Stdio::null())
        .stdout(writer.try_clone()?)
        .stderr(writer);

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        cmd.process_group(0);
    }

    let mut child = cmd.spawn()?;
    // Release our copies of the write end, or the reader never sees EOF.
    drop(cmd);

    let output = Arc::new(Mutex::new(Vec::new()));
    let done = spawn_collector(reader, Arc::clone(&output));

    let termination = match timeout {
        Some(limit) => wait_with_deadline(&mut child, limit)?,
        None => Termination::Exited(child.wait()?),
    };

    let drained = match deadline {
        None => done.recv().map_err(|_| RecvTimeoutError::Disconnected),
        Some(deadline) => {
            let remaining = deadline.saturating_duration_since(Instant::now());
            done.recv_timeout(remaining).or_else(|_| {
                // Something outside the direct child still holds the pipe.
                kill_group(&mut child);
                done.recv_timeout(DRAIN_GRACE)
            })
        }
    };

    match drained {
        Ok(result) => result?,
        Err(RecvTimeoutError::Timeout) => {
            tracing::debug!("Abandoning output of {} still held open", child.id());
        }
        Err(RecvTimeoutError::Disconnected) => {
            return Err(io::Error::other("output reader panicked"));
        }
    }

    let output = std::mem::take(&mut *output.lock().unwrap_or_else(PoisonError::into_inner));

    Ok(Captured {
        output,
        termination,
    })
}

/// Read `reader` to EOF into `output`, reporting completion on the
/// returned channel.
fn spawn_collector(
    mut reader: io::PipeReader,
    output: Arc<Mutex<Vec<u8>>>,
) -> mpsc::Receiver<io::Result<()>> {
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let mut chunk = [0u8; 8192];
        let result = loop {
            match reader.read(&mut chunk) {
                Ok(0) => break Ok(()),
                Ok(n) => output
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => break Err(e),
            }
        };
        let _ = tx.send(result);
    });

    rx
}

fn wait_with_deadline(child: &mut Child, limit: Duration) -> io::Result<Termination> {
    let deadline = Instant::now() + limit;

    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Termination::Exited(status));
        }

        let now = Instant::now();
        if now >= deadline {
            kill_group(child);
            child.wait()?;
            return Ok(Termination::TimedOut(limit));
        }

        thread::sleep(POLL_INTERVAL.min(deadline - now));
    }
}

/// Kill `child` and every process in its group.
#[cfg(unix)]
fn kill_group(child: &mut Child) {
    // The child leads its group, so its pid is the group id.
    let pgid = child.id() as libc::pid_t;
    if unsafe { libc::killpg(pgid, libc::SIGKILL) } != 0 {
        let e = io::Error::last_os_error();
        if e.raw_os_error() != Some(libc::ESRCH) {
            tracing::debug!("Failed to kill process group {}: {}", pgid, e);
        }
    }
}

#[cfg(not(unix))]
fn kill_group(child: &mut Child) {
    if let Err(e) = child.kill() {
        tracing::debug!("Failed to kill child {}: {}", child.id(), e);
    }
}
