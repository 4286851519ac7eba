// Per-output encoding options

use super::args::CommandArgs;
use super::error::{FormatError, OptionError};
use super::filter::FilterOptions;
use super::number::Number;
use super::stream::{StreamOption, apply_stream_options, non_empty};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Common `-coder` values
pub mod coders {
    pub const AC: &str = "ac";
    pub const CABAC: &str = "cabac";
    pub const CAVLC: &str = "cavlc";
    pub const DEFAULT: &str = "default";
    pub const VLC: &str = "vlc";
}

/// x264/x265 `-preset` values
pub mod presets {
    pub const ULTRAFAST: &str = "ultrafast";
    pub const SUPERFAST: &str = "superfast";
    pub const VERYFAST: &str = "veryfast";
    pub const FASTER: &str = "faster";
    pub const FAST: &str = "fast";
    pub const MEDIUM: &str = "medium";
    pub const SLOW: &str = "slow";
    pub const SLOWER: &str = "slower";
    pub const VERYSLOW: &str = "veryslow";
}

/// H.264 `-profile` values
pub mod profiles {
    pub const BASELINE: &str = "baseline";
    pub const MAIN: &str = "main";
    pub const HIGH: &str = "high";
    pub const HIGH10: &str = "high10";
    pub const HIGH422: &str = "high422";
    pub const HIGH444: &str = "high444";
}

/// x264 `-tune` values
pub mod tunes {
    pub const ANIMATION: &str = "animation";
    pub const FASTDECODE: &str = "fastdecode";
    pub const FILM: &str = "film";
    pub const GRAIN: &str = "grain";
    pub const STILLIMAGE: &str = "stillimage";
    pub const ZEROLATENCY: &str = "zerolatency";
}

/// Value of a pass-through `-<key> <value>` option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomValue {
    Int(i64),
    /// Rendered truncated to an integer
    Float(f64),
    Text(String),
}

impl CustomValue {
    pub fn render(&self) -> Result<String, FormatError> {
        match self {
            CustomValue::Int(v) => Ok(v.to_string()),
            CustomValue::Float(v) if !v.is_finite() => Err(FormatError::NonFinite(*v)),
            CustomValue::Float(v) => {
                // i64::MAX as f64 rounds up to 2^63, which is already out of range
                let t = v.trunc();
                if t < i64::MIN as f64 || t >= i64::MAX as f64 {
                    return Err(FormatError::OutOfRange(*v));
                }
                Ok((t as i64).to_string())
            }
            CustomValue::Text(s) => Ok(s.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingOptions {
    pub audio_sample_rate: Option<u32>,
    pub audio_channels: Option<u32>,
    pub b_frames: Option<i32>,
    pub bitrate: Vec<StreamOption<Number>>,
    pub b_strategy: Option<i32>,
    pub buf_size: Option<Number>,
    pub codec: Vec<StreamOption<String>>,
    pub coder: Option<String>,
    pub constant_quality: Option<f64>,
    pub crf: Option<i32>,
    pub filters: Vec<StreamOption<FilterOptions>>,
    pub framerate: Option<f64>,
    /// `WxH` or an abbreviation such as `hd720`
    pub frame_size: Option<String>,
    pub gop: Option<i32>,
    pub keyint_min: Option<i32>,
    pub level: Option<f64>,
    pub max_rate: Vec<StreamOption<Number>>,
    pub min_rate: Vec<StreamOption<Number>>,
    pub preset: Option<String>,
    pub profile: Vec<StreamOption<String>>,
    pub rate_control: Option<String>,
    pub sc_threshold: Option<i32>,
    pub tune: Option<String>,
    pub max_muxing_queue_size: Option<u32>,
    pub hls_time: Option<u32>,
    pub hls_list_size: Option<u32>,
    pub hls_key_info_file: Option<String>,
    pub hls_segment_filename: Option<String>,
    /// Options with no dedicated field, emitted as `-<key> <value>` in key order
    pub custom: BTreeMap<String, CustomValue>,
    pub remove_audio: bool,
}

fn number(n: &Number) -> Result<String, FormatError> {
    n.render()
}

fn filter(f: &FilterOptions) -> Result<String, FormatError> {
    f.render()
}

/// Fixed-point formatting (no trimming) for scalar float flags
fn fixed(flag: &str, value: f64, precision: usize) -> Result<String, OptionError> {
    if !value.is_finite() {
        return Err(OptionError::new(flag, None, FormatError::NonFinite(value)));
    }
    Ok(format!("{:.*}", precision, value))
}

fn text(cmd: &mut CommandArgs, flag: &str, value: &Option<String>) {
    if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
        cmd.pair(flag, v);
    }
}

fn int<T: ToString>(cmd: &mut CommandArgs, flag: &str, value: Option<T>) {
    if let Some(v) = value {
        cmd.pair(flag, v.to_string());
    }
}

impl EncodingOptions {
    /// Append encoding flags in their fixed order
    ///
    /// All-or-nothing: if any value fails to render, `cmd` is left as it was.
    pub fn apply(&self, cmd: &mut CommandArgs) -> Result<(), OptionError> {
        let mut staged = CommandArgs::new();
        let c = &mut staged;

        int(c, "-ar", self.audio_sample_rate);
        int(c, "-ac", self.audio_channels);
        int(c, "-bf", self.b_frames);
        apply_stream_options(c, "-b", &self.bitrate, number)?;
        int(c, "-b_strategy", self.b_strategy);
        if let Some(buf_size) = &self.buf_size {
            let value = buf_size
                .render()
                .map_err(|e| OptionError::new("-bufsize", None, e))?;
            c.pair("-bufsize", value);
        }
        apply_stream_options(c, "-codec", &self.codec, non_empty)?;
        text(c, "-coder", &self.coder);
        if let Some(cq) = self.constant_quality {
            c.pair("-cq", fixed("-cq", cq, 3)?);
        }
        int(c, "-crf", self.crf);
        apply_stream_options(c, "-filter", &self.filters, filter)?;
        if let Some(rate) = self.framerate {
            c.pair("-r", fixed("-r", rate, 3)?);
        }
        text(c, "-s", &self.frame_size);
        int(c, "-g", self.gop);
        int(c, "-keyint_min", self.keyint_min);
        if let Some(level) = self.level {
            c.pair("-level", fixed("-level", level, 1)?);
        }
        apply_stream_options(c, "-maxrate", &self.max_rate, number)?;
        apply_stream_options(c, "-minrate", &self.min_rate, number)?;
        text(c, "-preset", &self.preset);
        apply_stream_options(c, "-profile", &self.profile, non_empty)?;
        text(c, "-rc", &self.rate_control);
        int(c, "-sc_threshold", self.sc_threshold);
        text(c, "-tune", &self.tune);
        int(c, "-max_muxing_queue_size", self.max_muxing_queue_size);
        int(c, "-hls_time", self.hls_time);
        int(c, "-hls_list_size", self.hls_list_size);
        text(c, "-hls_key_info_file", &self.hls_key_info_file);
        text(c, "-hls_segment_filename", &self.hls_segment_filename);
        for (key, value) in &self.custom {
            let flag = format!("-{}", key);
            let value = value
                .render()
                .map_err(|e| OptionError::new(flag.as_str(), None, e))?;
            c.pair(flag, value);
        }
        if self.remove_audio {
            c.flag("-an");
        }

        cmd.extend(staged);
        Ok(())
    }
}
