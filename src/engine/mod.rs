// Job serialization and process execution - independent of the CLI

pub mod core;
pub mod progress;
pub mod runner;

pub use self::core::*;
pub use progress::{ProgressObserver, Stats, StatsParser, StderrProgress, parse_status_line};
pub use runner::{ExecContext, Ffmpeg};
