//! Process execution utilities with timeout support
//!
//! Provides helpers for running external processes (yt-dlp, ffmpeg) with
//! timeouts so a hung tool cannot pin a worker thread forever.

use std::io::{self, Read};
use std::process::{Child, Output};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tokio::process::Command;

/// How often a blocking wait re-checks the child.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Error of a timed process run.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("failed to run {program}: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} timed out after {secs}s", secs = .timeout.as_secs())]
    TimedOut { program: String, timeout: Duration },
}

/// Run an async Command with a timeout.
///
/// Used for short probes (`--version`) from async code. The child is killed
/// when the future is dropped on timeout.
pub async fn run_with_timeout(program: &str, cmd: &mut Command, timeout: Duration) -> Result<Output, ProcessError> {
    cmd.kill_on_drop(true);
    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(source)) => Err(ProcessError::Io {
            program: program.to_string(),
            source,
        }),
        Err(_) => Err(ProcessError::TimedOut {
            program: program.to_string(),
            timeout,
        }),
    }
}

/// Wait for a spawned child from a blocking thread. Kills the child on timeout.
///
/// Piped stdout/stderr are drained on reader threads while waiting, so a
/// tool that writes more than the pipe buffer holds does not stall.
pub fn wait_with_output_timeout(program: &str, mut child: Child, timeout: Duration) -> Result<Output, ProcessError> {
    let deadline = Instant::now() + timeout;
    let io_err = |source| ProcessError::Io {
        program: program.to_string(),
        source,
    };

    let stdout_reader = child.stdout.take().map(spawn_reader);
    let stderr_reader = child.stderr.take().map(spawn_reader);

    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                return Ok(Output {
                    status,
                    stdout: join_reader(stdout_reader).map_err(io_err)?,
                    stderr: join_reader(stderr_reader).map_err(io_err)?,
                });
            }
            Ok(None) => {
                if Instant::now() >= deadline {
                    log::error!("{} timed out after {}s, killing", program, timeout.as_secs());
                    let _ = child.kill();
                    let _ = child.wait(); // Reap the zombie
                    // Readers are left detached: a grandchild may still hold the pipes open
                    return Err(ProcessError::TimedOut {
                        program: program.to_string(),
                        timeout,
                    });
                }
                std::thread::sleep(POLL_INTERVAL);
            }
            Err(e) => return Err(io_err(e)),
        }
    }
}

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<io::Result<Vec<u8>>> {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

fn join_reader(reader: Option<JoinHandle<io::Result<Vec<u8>>>>) -> io::Result<Vec<u8>> {
    match reader {
        Some(handle) => handle
            .join()
            .map_err(|_| io::Error::other("pipe reader thread panicked"))?,
        None => Ok(Vec::new()),
    }
}
