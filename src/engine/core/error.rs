// Error types for job serialization and execution.
//
// Errors are wrapped as they travel up (option -> group -> input/output ->
// process), so the source chain of a top-level error names every layer.
// Print it with `{:#}` through `anyhow` to get the whole path on one line.

use std::process::ExitStatus;
use thiserror::Error;

/// Malformed numeric shorthand text (e.g. `"12Q"`, `"abcK"`)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid number shorthand {input:?}: {reason}")]
pub struct ParseNumberError {
    pub input: String,
    pub reason: &'static str,
}

/// A value that cannot be rendered to its textual form
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    #[error("value is not a finite number: {0}")]
    NonFinite(f64),

    #[error("value does not fit a 64-bit integer: {0}")]
    OutOfRange(f64),

    #[error("value is empty")]
    Empty,

    #[error("filter options have no parameter set")]
    EmptyFilter,
}

/// A formatting failure tagged with the flag it was rendered for
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{flag} option{} failed", .index.map(|i| format!(" #{i}")).unwrap_or_default())]
pub struct OptionError {
    pub flag: String,
    /// Zero-based position in a repeated field, `None` for scalar fields
    pub index: Option<usize>,
    #[source]
    pub source: FormatError,
}

impl OptionError {
    pub fn new(flag: impl Into<String>, index: Option<usize>, source: FormatError) -> Self {
        Self {
            flag: flag.into(),
            index,
            source,
        }
    }
}

/// Failure inside a nested option group
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptionsError {
    #[error("decoding options failed")]
    Decoding(#[source] OptionError),

    #[error("encoding options failed")]
    Encoding(#[source] OptionError),
}

/// Failure while assembling the full command line
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error("adapting input #{index} failed")]
    Input {
        index: usize,
        #[source]
        source: OptionsError,
    },

    #[error("adapting output #{index} failed")]
    Output {
        index: usize,
        #[source]
        source: OptionsError,
    },
}

impl BuildError {
    /// The option error at the bottom of the chain
    pub fn option_error(&self) -> &OptionError {
        let source = match self {
            BuildError::Input { source, .. } | BuildError::Output { source, .. } => source,
        };
        match source {
            OptionsError::Decoding(e) | OptionsError::Encoding(e) => e,
        }
    }
}

/// Failure while building or running the external process
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("building command failed")]
    Build(#[from] BuildError),

    #[error("starting {command} failed")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("waiting for {command} failed")]
    Wait {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("running {command} failed with {status}, stderr: {stderr}")]
    Exited {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("running {command} was cancelled, stderr: {stderr}")]
    Cancelled { command: String, stderr: String },

    #[error("running {command} timed out, stderr: {stderr}")]
    TimedOut { command: String, stderr: String },
}

impl ProcessError {
    /// Captured stderr of the child, when the process got far enough to have one
    pub fn stderr(&self) -> Option<&str> {
        match self {
            ProcessError::Exited { stderr, .. }
            | ProcessError::Cancelled { stderr, .. }
            | ProcessError::TimedOut { stderr, .. } => Some(stderr),
            _ => None,
        }
    }
}
