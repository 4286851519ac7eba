// Process layer against small shell scripts standing in for ffmpeg
#![cfg(unix)]

use crate::common::helpers::{fake_ffmpeg, ladder_job};
use chrono::{DateTime, Local};
use ffjob::engine::{
    ExecContext, Ffmpeg, GlobalOptions, Input, Job, LogOptions, Output, ProcessError,
    ProgressObserver, Stats, StderrProgress, build_args,
};
use std::fs;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn simple_job() -> Job {
    Job::new()
        .input(Input::new("in.mp4"))
        .output(Output::new("out.mp4"))
}

#[test]
fn test_success() {
    let dir = TempDir::new().unwrap();
    let bin = fake_ffmpeg(dir.path(), "echo 'frame=  10 fps=5.0 time=00:00:01.00' >&2\nexit 0");

    Ffmpeg::new(bin)
        .exec(&ExecContext::new(), &simple_job())
        .unwrap();
}

#[test]
fn test_child_receives_exact_tokens() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("args.txt");
    let bin = fake_ffmpeg(
        dir.path(),
        &format!("printf '%s\\n' \"$@\" > '{}'", out.display()),
    );

    let job = ladder_job();
    Ffmpeg::new(bin).exec(&ExecContext::new(), &job).unwrap();

    let recorded = fs::read_to_string(&out).unwrap();
    let recorded: Vec<&str> = recorded.lines().collect();
    assert_eq!(recorded, build_args(&job).unwrap().args());
}

#[test]
fn test_log_env_vars_reach_child() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("env.txt");
    let bin = fake_ffmpeg(
        dir.path(),
        &format!("printf '%s' \"$AV_LOG_FORCE_COLOR\" > '{}'", out.display()),
    );

    let job = simple_job().global(GlobalOptions {
        log: Some(LogOptions {
            color: Some(true),
            ..LogOptions::default()
        }),
        ..GlobalOptions::default()
    });
    Ffmpeg::new(bin).exec(&ExecContext::new(), &job).unwrap();

    assert_eq!(fs::read_to_string(&out).unwrap(), "1");
}

#[test]
fn test_nonzero_exit_carries_command_and_stderr() {
    let dir = TempDir::new().unwrap();
    let bin = fake_ffmpeg(dir.path(), "echo \"Unknown encoder 'libfoo'\" >&2\nexit 3");

    let err = Ffmpeg::new(&bin)
        .exec(&ExecContext::new(), &simple_job())
        .unwrap_err();

    match &err {
        ProcessError::Exited {
            command,
            status,
            stderr,
        } => {
            assert_eq!(status.code(), Some(3));
            assert!(command.contains("-i in.mp4 -y out.mp4"), "{}", command);
            assert!(command.starts_with(&*bin.to_string_lossy()), "{}", command);
            assert!(stderr.contains("Unknown encoder 'libfoo'"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(err.stderr().unwrap().contains("libfoo"));
}

#[test]
fn test_timeout_kills_child() {
    let dir = TempDir::new().unwrap();
    let bin = fake_ffmpeg(dir.path(), "echo waiting >&2\nexec sleep 30");

    let started = Instant::now();
    let err = Ffmpeg::new(bin)
        .exec(
            &ExecContext::with_timeout(Duration::from_millis(300)),
            &simple_job(),
        )
        .unwrap_err();

    assert!(matches!(err, ProcessError::TimedOut { .. }), "{:?}", err);
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[test]
fn test_cancel_from_another_thread() {
    let dir = TempDir::new().unwrap();
    let bin = fake_ffmpeg(dir.path(), "echo started >&2\nexec sleep 30");

    let ctx = ExecContext::new();
    let handle = ctx.clone();
    let canceller = thread::spawn(move || {
        thread::sleep(Duration::from_millis(300));
        handle.cancel();
    });

    let started = Instant::now();
    let err = Ffmpeg::new(bin).exec(&ctx, &simple_job()).unwrap_err();
    canceller.join().unwrap();

    match err {
        ProcessError::Cancelled { stderr, .. } => assert!(stderr.contains("started")),
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[test]
fn test_timeout_returns_while_grandchild_holds_stderr() {
    let dir = TempDir::new().unwrap();
    // No exec: the shell is killed but sleep keeps the stderr pipe open
    let bin = fake_ffmpeg(dir.path(), "echo started >&2\nsleep 5");

    let started = Instant::now();
    let err = Ffmpeg::new(bin)
        .exec(
            &ExecContext::with_timeout(Duration::from_millis(300)),
            &simple_job(),
        )
        .unwrap_err();

    match err {
        ProcessError::TimedOut { stderr, .. } => assert!(stderr.contains("started")),
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(
        started.elapsed() < Duration::from_secs(2),
        "took {:?}",
        started.elapsed()
    );
}

#[test]
fn test_cancel_returns_while_grandchild_holds_stderr() {
    let dir = TempDir::new().unwrap();
    let bin = fake_ffmpeg(dir.path(), "echo started >&2\nsleep 5");

    let ctx = ExecContext::new();
    let handle = ctx.clone();
    let canceller = thread::spawn(move || {
        thread::sleep(Duration::from_millis(300));
        handle.cancel();
    });

    let started = Instant::now();
    let err = Ffmpeg::new(bin).exec(&ctx, &simple_job()).unwrap_err();
    canceller.join().unwrap();

    assert!(matches!(err, ProcessError::Cancelled { .. }), "{:?}", err);
    assert!(
        started.elapsed() < Duration::from_secs(2),
        "took {:?}",
        started.elapsed()
    );
}

struct Recorder {
    samples: Arc<Mutex<Vec<(DateTime<Local>, usize)>>>,
}

impl ProgressObserver for Recorder {
    fn period(&self) -> Duration {
        Duration::from_millis(50)
    }

    fn on_sample(&mut self, at: DateTime<Local>, stderr: &[u8]) {
        self.samples.lock().unwrap().push((at, stderr.len()));
    }
}

#[test]
fn test_observer_sampled_while_running() {
    let dir = TempDir::new().unwrap();
    let bin = fake_ffmpeg(
        dir.path(),
        "for i in 1 2 3 4; do echo \"line $i\" >&2; sleep 0.1; done",
    );

    let samples = Arc::new(Mutex::new(Vec::new()));
    let mut ffmpeg = Ffmpeg::new(bin).with_observer(Box::new(Recorder {
        samples: Arc::clone(&samples),
    }));
    ffmpeg.exec(&ExecContext::new(), &simple_job()).unwrap();

    let samples = samples.lock().unwrap();
    assert!(samples.len() >= 2, "only {} samples", samples.len());
    assert!(samples.windows(2).all(|w| w[0].0 <= w[1].0));
    // The buffer only grows
    assert!(samples.windows(2).all(|w| w[0].1 <= w[1].1));
}

#[test]
fn test_stderr_progress_parses_status_lines() {
    let dir = TempDir::new().unwrap();
    let bin = fake_ffmpeg(
        dir.path(),
        "for i in 1 2 3; do printf 'frame=%d fps=25 size=%dkB time=00:00:0%d.00 bitrate=100.0kbits/s speed=1.0x\\r' $i $i $i >&2; sleep 0.15; done",
    );

    let seen = Arc::new(Mutex::new(Vec::<Stats>::new()));
    let sink = Arc::clone(&seen);
    let observer = StderrProgress::new(Duration::from_millis(30), move |stats: &Stats| {
        sink.lock().unwrap().push(stats.clone());
    });

    let mut ffmpeg = Ffmpeg::new(bin);
    ffmpeg.set_observer(Box::new(observer));
    ffmpeg.exec(&ExecContext::new(), &simple_job()).unwrap();

    let seen = seen.lock().unwrap();
    assert!(!seen.is_empty());
    let frames: Vec<u64> = seen.iter().filter_map(|s| s.frame).collect();
    assert!(frames.windows(2).all(|w| w[0] < w[1]), "{:?}", frames);
    assert!(frames.iter().all(|f| (1..=3).contains(f)));
}
