use super::args::CommandArgs;
use super::error::{OptionError, OptionsError};
use super::stream::{StreamOption, non_empty};
use serde::{Deserialize, Serialize};

/// One `-i` input with the options that precede it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Input {
    #[serde(default)]
    pub options: Option<InputOptions>,
    pub path: String,
}

impl Input {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            options: None,
            path: path.into(),
        }
    }

    pub fn with_options(mut self, options: InputOptions) -> Self {
        self.options = Some(options);
        self
    }

    pub fn apply(&self, cmd: &mut CommandArgs) -> Result<(), OptionsError> {
        if let Some(options) = &self.options {
            options.apply(cmd)?;
        }
        cmd.pair("-i", self.path.as_str());
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputOptions {
    pub decoding: Option<DecodingOptions>,
    /// Force the input container/device format (`-f lavfi`, `-f concat`, ...)
    pub format: Option<String>,
}

impl InputOptions {
    pub fn apply(&self, cmd: &mut CommandArgs) -> Result<(), OptionsError> {
        if let Some(decoding) = &self.decoding {
            decoding.apply(cmd).map_err(OptionsError::Decoding)?;
        }
        if let Some(format) = self.format.as_deref().filter(|f| !f.is_empty()) {
            cmd.pair("-f", format);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeinterlacingMode {
    Adaptive,
    Bob,
    Weave,
}

impl DeinterlacingMode {
    pub fn as_str(self) -> &'static str {
        match self {
            DeinterlacingMode::Adaptive => "adaptive",
            DeinterlacingMode::Bob => "bob",
            DeinterlacingMode::Weave => "weave",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodingOptions {
    pub hardware_acceleration: Option<String>,
    /// Only emitted together with `hardware_acceleration`
    pub hardware_acceleration_device: Option<u32>,
    pub deinterlacing_mode: Option<DeinterlacingMode>,
    /// FFmpeg time duration syntax (`"10"`, `"00:01:30.5"`)
    pub duration: Option<String>,
    /// Seek position, same syntax as `duration`
    pub position: Option<String>,
    pub drop_second_field: Option<bool>,
    pub codec: Option<StreamOption<String>>,
}

impl DecodingOptions {
    /// Append decoding flags; nothing is appended if any value fails to render
    pub fn apply(&self, cmd: &mut CommandArgs) -> Result<(), OptionError> {
        let mut staged = CommandArgs::new();

        if let Some(hwaccel) = self.hardware_acceleration.as_deref().filter(|v| !v.is_empty()) {
            staged.pair("-hwaccel", hwaccel);
            if let Some(device) = self.hardware_acceleration_device {
                staged.pair("-hwaccel_device", device.to_string());
            }
        }
        if let Some(mode) = self.deinterlacing_mode {
            staged.pair("-deint", mode.as_str());
        }
        if let Some(duration) = self.duration.as_deref().filter(|v| !v.is_empty()) {
            staged.pair("-t", duration);
        }
        if let Some(position) = self.position.as_deref().filter(|v| !v.is_empty()) {
            staged.pair("-ss", position);
        }
        if let Some(drop) = self.drop_second_field {
            staged.pair("-drop_second_field", if drop { "1" } else { "0" });
        }
        if let Some(codec) = &self.codec {
            let (flag, value) = codec.render("-c", None, non_empty)?;
            staged.pair(flag, value);
        }

        cmd.extend(staged);
        Ok(())
    }
}
