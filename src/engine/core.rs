mod args;
mod encoding;
mod error;
mod ffmpeg_cmd;
mod ffmpeg_info;
mod filter;
mod global;
mod input;
mod job;
mod number;
mod output;
mod stream;

pub use args::{CommandArgs, format_ffmpeg_cmd};
pub use encoding::{CustomValue, EncodingOptions, coders, presets, profiles, tunes};
pub use error::{
    BuildError, FormatError, OptionError, OptionsError, ParseNumberError, ProcessError,
};
pub use ffmpeg_cmd::build_args;
pub use ffmpeg_info::ffmpeg_version;
pub use filter::{
    ChainSeparator, ComplexFilterGraph, FilterChain, FilterOptions, Ratio, Scale,
};
pub use global::{GlobalOptions, LogLevel, LogOptions};
pub use input::{DecodingOptions, DeinterlacingMode, Input, InputOptions};
pub use job::{Job, load_job};
pub use number::{Number, NumberValue, UnitPrefix};
pub use output::{MapOption, Output, OutputOptions};
pub use stream::{MediaType, StreamOption, StreamSpecifier};
