// Progress sampling of ffmpeg's stderr status line

use chrono::{DateTime, Local};
use std::time::Duration;

/// Receives periodic snapshots of the child's stderr while it runs
///
/// `on_sample` is called once per `period()` from a background thread with
/// everything written to stderr so far. It is never called when no observer
/// is registered.
pub trait ProgressObserver: Send {
    fn period(&self) -> Duration;
    fn on_sample(&mut self, at: DateTime<Local>, stderr: &[u8]);
}

/// Values from ffmpeg's periodic status line
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Stats {
    pub frame: Option<u64>,
    pub fps: Option<f64>,
    pub size_kb: Option<u64>,
    /// Output timestamp reached, in seconds
    pub out_time_s: Option<f64>,
    pub bitrate_kbps: Option<f64>,
    pub speed: Option<f64>,
}

impl Stats {
    /// Percentage of `duration_s` covered, capped at 100
    pub fn progress_pct(&self, duration_s: Option<f64>) -> f64 {
        match (self.out_time_s, duration_s) {
            (Some(t), Some(dur)) if dur > 0.0 => (t / dur * 100.0).min(100.0),
            _ => 0.0,
        }
    }
}

/// Parser for the `frame=  100 fps= 25 ... speed=1.0x` status line
#[derive(Debug, Default, Clone)]
pub struct StatsParser {
    latest: Stats,
}

impl StatsParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest(&self) -> &Stats {
        &self.latest
    }

    /// Parse the most recent status line in a stderr snapshot
    ///
    /// ffmpeg rewrites the status line with `\r`, so both `\r` and `\n` end a
    /// line. Returns `true` when a status line was found.
    pub fn parse_snapshot(&mut self, stderr: &[u8]) -> bool {
        let text = String::from_utf8_lossy(stderr);
        let line = text
            .split(['\r', '\n'])
            .rev()
            .find(|l| is_status_line(l));

        match line {
            Some(line) => {
                self.latest = parse_status_line(line);
                true
            }
            None => false,
        }
    }
}

fn is_status_line(line: &str) -> bool {
    line.contains("time=") && (line.starts_with("frame=") || line.starts_with("size="))
}

/// Parse `key= value` pairs; padding after `=` is ignored
pub fn parse_status_line(line: &str) -> Stats {
    let mut stats = Stats::default();
    let mut tokens = line.split_whitespace();

    while let Some(token) = tokens.next() {
        let Some((key, value)) = token.split_once('=') else {
            continue;
        };
        let value = if value.is_empty() {
            match tokens.next() {
                Some(v) => v,
                None => break,
            }
        } else {
            value
        };

        match key {
            "frame" => stats.frame = value.parse().ok(),
            "fps" => stats.fps = value.parse().ok(),
            "size" | "Lsize" => {
                stats.size_kb = value
                    .trim_end_matches("KiB")
                    .trim_end_matches("kB")
                    .parse()
                    .ok()
            }
            "time" => stats.out_time_s = parse_timestamp(value),
            "bitrate" => stats.bitrate_kbps = value.trim_end_matches("kbits/s").parse().ok(),
            "speed" => stats.speed = value.trim_end_matches('x').parse().ok(),
            _ => {}
        }
    }
    stats
}

/// `HH:MM:SS.cc` to seconds; negative or `N/A` values yield `None`
fn parse_timestamp(value: &str) -> Option<f64> {
    let mut parts = value.split(':');
    let hours: f64 = parts.next()?.parse().ok()?;
    let minutes: f64 = parts.next()?.parse().ok()?;
    let seconds: f64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() || hours < 0.0 {
        return None;
    }
    Some(hours * 3600.0 + minutes * 60.0 + seconds)
}

/// Observer that parses each snapshot and hands new stats to a callback
pub struct StderrProgress<F> {
    period: Duration,
    parser: StatsParser,
    callback: F,
}

impl<F> StderrProgress<F>
where
    F: FnMut(&Stats) + Send,
{
    pub fn new(period: Duration, callback: F) -> Self {
        Self {
            period,
            parser: StatsParser::new(),
            callback,
        }
    }
}

impl<F> ProgressObserver for StderrProgress<F>
where
    F: FnMut(&Stats) + Send,
{
    fn period(&self) -> Duration {
        self.period
    }

    fn on_sample(&mut self, _at: DateTime<Local>, stderr: &[u8]) {
        let previous = self.parser.latest().clone();
        if self.parser.parse_snapshot(stderr) && *self.parser.latest() != previous {
            tracing::trace!(stats = ?self.parser.latest(), "ffmpeg progress");
            (self.callback)(self.parser.latest());
        }
    }
}
