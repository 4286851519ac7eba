use super::args::CommandArgs;
use super::encoding::EncodingOptions;
use super::error::OptionsError;
use super::stream::StreamSpecifier;
use serde::{Deserialize, Serialize};

/// One output file with the options that precede it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Output {
    #[serde(default)]
    pub options: Option<OutputOptions>,
    pub path: String,
}

impl Output {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            options: None,
            path: path.into(),
        }
    }

    pub fn with_options(mut self, options: OutputOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Options, then `-y <path>`; outputs always overwrite
    pub fn apply(&self, cmd: &mut CommandArgs) -> Result<(), OptionsError> {
        if let Some(options) = &self.options {
            options.apply(cmd)?;
        }
        cmd.flag("-y");
        cmd.flag(self.path.as_str());
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    pub map: Vec<MapOption>,
    pub encoding: Option<EncodingOptions>,
    /// Output container format (`-f mp4`, `-f hls`, ...)
    pub format: Option<String>,
}

impl OutputOptions {
    pub fn apply(&self, cmd: &mut CommandArgs) -> Result<(), OptionsError> {
        let mut staged = CommandArgs::new();
        for map in &self.map {
            map.apply(&mut staged);
        }
        if let Some(encoding) = &self.encoding {
            encoding.apply(&mut staged).map_err(OptionsError::Encoding)?;
        }
        if let Some(format) = self.format.as_deref().filter(|f| !f.is_empty()) {
            staged.pair("-f", format);
        }
        cmd.extend(staged);
        Ok(())
    }
}

/// A `-map` selection: a raw label, or an input file plus optional stream
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapOption {
    /// Used verbatim when set (e.g. a `-filter_complex` output label `[out0]`)
    pub name: Option<String>,
    pub input_file_id: u32,
    pub stream: Option<StreamSpecifier>,
}

impl MapOption {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn input(input_file_id: u32, stream: Option<StreamSpecifier>) -> Self {
        Self {
            name: None,
            input_file_id,
            stream,
        }
    }

    pub fn apply(&self, cmd: &mut CommandArgs) {
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            cmd.pair("-map", name);
            return;
        }
        let value = match &self.stream {
            Some(stream) => format!("{}:{}", self.input_file_id, stream),
            None => self.input_file_id.to_string(),
        };
        cmd.pair("-map", value);
    }
}
