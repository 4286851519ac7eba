//! Typed FFmpeg job descriptions rendered to exact, ordered command lines,
//! plus a cancellable runner that executes them.
//!
//! ```no_run
//! use ffjob::engine::{ExecContext, Ffmpeg, Input, Job, Output};
//!
//! let job = Job::new()
//!     .input(Input::new("in.mp4"))
//!     .output(Output::new("out.mp4"));
//! Ffmpeg::new("ffmpeg").exec(&ExecContext::new(), &job)?;
//! # Ok::<(), ffjob::engine::ProcessError>(())
//! ```

pub mod config;
pub mod engine;
