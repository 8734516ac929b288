//! Bounded subprocess execution.
//!
//! Child output is drained on background threads while the parent polls
//! for exit, so a chatty child cannot block on a full pipe before the
//! timeout is observed.

use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Outcome of a finished (or killed) subprocess
#[derive(Debug)]
pub struct CapturedOutput {
    /// Exit status, `None` if the process was killed on timeout
    pub status: Option<ExitStatus>,
    pub stdout: String,
    pub stderr: String,
}

impl CapturedOutput {
    pub fn timed_out(&self) -> bool {
        self.status.is_none()
    }

    pub fn success(&self) -> bool {
        self.status.map(|s| s.success()).unwrap_or(false)
    }
}

/// Run `program args...` in `cwd`, killing it once `timeout` elapses.
///
/// Spawn failures are returned as I/O errors; a timeout is reported through
/// [`CapturedOutput::timed_out`].
pub fn run_with_timeout(
    program: &str,
    args: &[String],
    cwd: &Path,
    timeout: Duration,
) -> std::io::Result<CapturedOutput> {
    let mut child = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let status = match child.wait_timeout(timeout) {
        Ok(status) => status,
        Err(e) => {
            let _ = child.kill();
            let _ = child.wait();
            return Err(e);
        }
    };

    if status.is_none() {
        tracing::debug!(program, ?timeout, "subprocess timed out, killing");
        let _ = child.kill();
        let _ = child.wait(); // reap
        // Grandchildren may still hold the pipes open; leave the readers detached.
        return Ok(CapturedOutput {
            status,
            stdout: String::new(),
            stderr: String::new(),
        });
    }

    Ok(CapturedOutput {
        status,
        stdout: join(stdout),
        stderr: join(stderr),
    })
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<String>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            String::from_utf8_lossy(&buf).into_owned()
        })
    })
}

fn join(handle: Option<JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

/// Extension trait to add `wait_timeout` to `Child`.
trait ChildExt {
    fn wait_timeout(&mut self, timeout: Duration) -> std::io::Result<Option<ExitStatus>>;
}

impl ChildExt for Child {
    fn wait_timeout(&mut self, timeout: Duration) -> std::io::Result<Option<ExitStatus>> {
        let start = Instant::now();

        loop {
            match self.try_wait()? {
                Some(status) => return Ok(Some(status)),
                None => {
                    if start.elapsed() >= timeout {
                        return Ok(None);
                    }
                    thread::sleep(POLL_INTERVAL);
                }
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Vec<String> {
        vec!["-c".to_string(), script.to_string()]
    }

    #[test]
    fn test_captures_stdout_and_stderr() {
        let out = run_with_timeout(
            "sh",
            &sh("echo hello; echo oops >&2"),
            Path::new("."),
            Duration::from_secs(10),
        )
        .unwrap();

        assert!(out.success());
        assert_eq!(out.stdout.trim(), "hello");
        assert_eq!(out.stderr.trim(), "oops");
    }

    #[test]
    fn test_reports_non_zero_exit() {
        let out = run_with_timeout("sh", &sh("exit 3"), Path::new("."), Duration::from_secs(10))
            .unwrap();

        assert!(!out.success());
        assert!(!out.timed_out());
        assert_eq!(out.status.and_then(|s| s.code()), Some(3));
    }

    #[test]
    fn test_kills_on_timeout() {
        let started = Instant::now();
        let out = run_with_timeout(
            "sh",
            &sh("exec sleep 5"),
            Path::new("."),
            Duration::from_millis(200),
        )
        .unwrap();

        assert!(out.timed_out());
        assert!(!out.success());
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn test_large_output_does_not_block() {
        // Well past a pipe buffer
        let out = run_with_timeout(
            "sh",
            &sh("i=0; while [ $i -lt 20000 ]; do echo line-$i; i=$((i+1)); done"),
            Path::new("."),
            Duration::from_secs(30),
        )
        .unwrap();

        assert!(out.success());
        assert_eq!(out.stdout.lines().count(), 20000);
    }

    #[test]
    fn test_missing_program_is_io_error() {
        let result = run_with_timeout(
            "definitely-not-a-real-program-xyz",
            &[],
            Path::new("."),
            Duration::from_secs(1),
        );
        assert!(result.is_err());
    }
}
