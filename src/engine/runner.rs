// Runs a built job as an ffmpeg child process

use super::core::{BuildError, Job, ProcessError, build_args, format_ffmpeg_cmd};
use super::progress::ProgressObserver;
use chrono::Local;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStderr, Command, ExitStatus, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(20);
const MIN_SAMPLE_PERIOD: Duration = Duration::from_millis(1);
/// How long to keep reading stderr once the child itself is gone
const STDERR_GRACE: Duration = Duration::from_millis(500);

/// Cancellation flag plus optional deadline bounding one `exec` call
///
/// Clones share the flag, so a clone handed to another thread (or a Ctrl-C
/// handler) can stop a running child.
#[derive(Debug, Clone, Default)]
pub struct ExecContext {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl ExecContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deadline `timeout` from now
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new().deadline(Instant::now() + timeout)
    }

    pub fn deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

/// An ffmpeg binary plus an optional progress observer
pub struct Ffmpeg {
    binary_path: PathBuf,
    observer: Option<Box<dyn ProgressObserver>>,
}

enum Outcome {
    Exited(ExitStatus),
    Cancelled,
    TimedOut,
}

impl Ffmpeg {
    pub fn new(binary_path: impl Into<PathBuf>) -> Self {
        Self {
            binary_path: binary_path.into(),
            observer: None,
        }
    }

    pub fn binary_path(&self) -> &Path {
        &self.binary_path
    }

    pub fn set_observer(&mut self, observer: Box<dyn ProgressObserver>) {
        self.observer = Some(observer);
    }

    pub fn with_observer(mut self, observer: Box<dyn ProgressObserver>) -> Self {
        self.set_observer(observer);
        self
    }

    /// Build the `Command` for a job without running it
    pub fn build_cmd(&self, job: &Job) -> Result<Command, BuildError> {
        Ok(build_args(job)?.to_command(&self.binary_path))
    }

    /// Build and run a job to completion
    ///
    /// stdin and stdout are bound to null; stderr is captured and returned in
    /// every failure past spawning. The registered observer, if any, is
    /// sampled once per period until the child exits. Once the child is gone,
    /// stderr is drained for at most a short grace period, so a grandchild
    /// still holding the pipe cannot keep `exec` from returning.
    pub fn exec(&mut self, ctx: &ExecContext, job: &Job) -> Result<(), ProcessError> {
        let args = build_args(job)?;
        let command = format_ffmpeg_cmd(&self.binary_path.to_string_lossy(), &args);

        if ctx.is_cancelled() {
            return Err(ProcessError::Cancelled {
                command,
                stderr: String::new(),
            });
        }

        let mut cmd = args.to_command(&self.binary_path);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::null());
        cmd.stderr(Stdio::piped());

        tracing::debug!(command = %command, "spawning ffmpeg");
        let mut child = cmd.spawn().map_err(|source| ProcessError::Spawn {
            command: command.clone(),
            source,
        })?;

        let buffer = Arc::new(Mutex::new(Vec::new()));
        let reader_done = spawn_stderr_reader(child.stderr.take(), Arc::clone(&buffer));
        let observer = self.observer.as_deref_mut();
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let outcome = thread::scope(|s| {
            if let Some(observer) = observer {
                let buffer = Arc::clone(&buffer);
                s.spawn(move || {
                    let period = observer.period().max(MIN_SAMPLE_PERIOD);
                    while let Err(RecvTimeoutError::Timeout) = stop_rx.recv_timeout(period) {
                        let snapshot = lock(&buffer).clone();
                        observer.on_sample(Local::now(), &snapshot);
                    }
                });
            }

            let outcome = wait_for_child(&mut child, ctx);
            drop(stop_tx);
            outcome
        });

        // Processes the child started can inherit the pipe and hold it open
        if let Err(RecvTimeoutError::Timeout) = reader_done.recv_timeout(STDERR_GRACE) {
            tracing::warn!(
                grace_ms = STDERR_GRACE.as_millis() as u64,
                "stderr still open after ffmpeg exited, returning without it"
            );
        }

        let stderr = String::from_utf8_lossy(&lock(&buffer)).into_owned();
        match outcome {
            Ok(Outcome::Exited(status)) if status.success() => Ok(()),
            Ok(Outcome::Exited(status)) => Err(ProcessError::Exited {
                command,
                status,
                stderr,
            }),
            Ok(Outcome::Cancelled) => Err(ProcessError::Cancelled { command, stderr }),
            Ok(Outcome::TimedOut) => Err(ProcessError::TimedOut { command, stderr }),
            Err(source) => Err(ProcessError::Wait { command, source }),
        }
    }
}

/// Drain the pipe into `buffer` on a detached thread
///
/// The returned channel disconnects once the pipe hits EOF (or when there is
/// no pipe at all).
fn spawn_stderr_reader(
    pipe: Option<ChildStderr>,
    buffer: Arc<Mutex<Vec<u8>>>,
) -> mpsc::Receiver<()> {
    let (done_tx, done_rx) = mpsc::channel::<()>();
    if let Some(mut pipe) = pipe {
        thread::spawn(move || {
            let _done = done_tx;
            let mut chunk = [0u8; 4096];
            loop {
                match pipe.read(&mut chunk) {
                    Ok(0) => break,
                    Ok(n) => lock(&buffer).extend_from_slice(&chunk[..n]),
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(_) => break,
                }
            }
        });
    }
    done_rx
}

fn lock(buffer: &Mutex<Vec<u8>>) -> MutexGuard<'_, Vec<u8>> {
    buffer.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Poll the child until it exits or the context asks us to stop it
fn wait_for_child(child: &mut Child, ctx: &ExecContext) -> io::Result<Outcome> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Outcome::Exited(status));
        }

        let stop = if ctx.is_cancelled() {
            Some(Outcome::Cancelled)
        } else if ctx.is_expired() {
            Some(Outcome::TimedOut)
        } else {
            None
        };

        if let Some(outcome) = stop {
            let reason = match outcome {
                Outcome::TimedOut => "deadline passed",
                _ => "cancelled",
            };
            tracing::warn!(pid = child.id(), reason, "killing ffmpeg");
            // Already exited between try_wait and kill is fine
            let _ = child.kill();
            child.wait()?;
            return Ok(outcome);
        }

        thread::sleep(POLL_INTERVAL);
    }
}
