use super::args::CommandArgs;
use serde::{Deserialize, Serialize};

/// Options placed before any input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalOptions {
    pub log: Option<LogOptions>,
    /// `Some(true)` -> `-y`, `Some(false)` -> `-n`
    pub overwrite: Option<bool>,
    pub no_stats: bool,
    /// Dump the full command line and console output to
    /// `ffmpeg-YYYYMMDD-HHMMSS.log`; implies `-loglevel verbose`
    pub report: bool,
}

impl GlobalOptions {
    pub fn apply(&self, cmd: &mut CommandArgs) {
        cmd.flag("-hide_banner");
        if let Some(log) = &self.log {
            log.apply(cmd);
        }
        match self.overwrite {
            Some(true) => {
                cmd.flag("-y");
            }
            Some(false) => {
                cmd.flag("-n");
            }
            None => {}
        }
        if self.no_stats {
            cmd.flag("-nostats");
        }
        if self.report {
            cmd.flag("-report");
        }
    }
}

/// FFmpeg log levels, quietest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show nothing at all
    Quiet,
    /// Only fatal errors that could crash the process
    Panic,
    /// Errors after which the process cannot continue
    Fatal,
    /// All errors, including recoverable ones
    Error,
    Warning,
    /// FFmpeg's default
    Info,
    Verbose,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Panic => "panic",
            LogLevel::Fatal => "fatal",
            LogLevel::Error => "error",
            LogLevel::Warning => "warning",
            LogLevel::Info => "info",
            LogLevel::Verbose => "verbose",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogOptions {
    /// Force colored (`true`) or plain (`false`) log output via the environment
    pub color: Option<bool>,
    pub level: Option<LogLevel>,
    /// Show repeated lines instead of collapsing them (`repeat+` flag)
    pub repeated: bool,
    /// Prefix each line with its level (`level+` flag)
    pub prefix_level: bool,
}

impl LogOptions {
    pub fn apply(&self, cmd: &mut CommandArgs) {
        match self.color {
            Some(true) => {
                cmd.env("AV_LOG_FORCE_COLOR", "1");
            }
            Some(false) => {
                cmd.env("AV_LOG_FORCE_NOCOLOR", "1");
            }
            None => {}
        }
        if let Some(level) = self.level {
            let mut value = String::new();
            if self.repeated {
                value.push_str("repeat+");
            }
            if self.prefix_level {
                value.push_str("level+");
            }
            value.push_str(level.as_str());
            cmd.pair("-loglevel", value);
        }
    }
}
