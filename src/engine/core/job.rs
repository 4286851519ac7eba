use super::filter::ComplexFilterGraph;
use super::global::GlobalOptions;
use super::input::Input;
use super::output::Output;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A complete transcoding job
///
/// `ffmpeg [global] {[input options] -i input}... [-filter_complex graph]
/// {[output options] output}...`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Job {
    pub global: GlobalOptions,
    pub inputs: Vec<Input>,
    pub complex_filter: Option<ComplexFilterGraph>,
    pub outputs: Vec<Output>,
}

impl Job {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(mut self, input: Input) -> Self {
        self.inputs.push(input);
        self
    }

    pub fn output(mut self, output: Output) -> Self {
        self.outputs.push(output);
        self
    }

    pub fn complex_filter(mut self, graph: ComplexFilterGraph) -> Self {
        self.complex_filter = Some(graph);
        self
    }

    pub fn global(mut self, global: GlobalOptions) -> Self {
        self.global = global;
        self
    }

    /// Parse a job from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Failed to parse job TOML")
    }

    /// Parse a job from JSON text
    pub fn from_json(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).context("Failed to parse job JSON")
    }
}

/// Load a job file; `.json` files are read as JSON, everything else as TOML
pub fn load_job(path: &Path) -> Result<Job> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read job file: {}", path.display()))?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let job = if is_json {
        Job::from_json(&contents)
    } else {
        Job::from_toml(&contents)
    };
    job.with_context(|| format!("Invalid job file: {}", path.display()))
}
