use super::args::CommandArgs;
use super::error::{FormatError, OptionError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stream type selector in a stream specifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MediaType {
    Audio,
    Subtitle,
    Video,
    /// Video streams that are not attached pictures or thumbnails
    VideoNotThumbnail,
}

impl MediaType {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Audio => "a",
            MediaType::Subtitle => "s",
            MediaType::Video => "v",
            MediaType::VideoNotThumbnail => "V",
        }
    }
}

/// Reference to a stream by type and/or index, or by a raw name
///
/// A non-empty `name` is used verbatim and the other fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamSpecifier {
    pub name: Option<String>,
    pub media_type: Option<MediaType>,
    pub index: Option<u32>,
}

impl StreamSpecifier {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn of_type(media_type: MediaType) -> Self {
        Self {
            media_type: Some(media_type),
            ..Self::default()
        }
    }

    pub fn at_index(index: u32) -> Self {
        Self {
            index: Some(index),
            ..Self::default()
        }
    }

    pub fn typed(media_type: MediaType, index: u32) -> Self {
        Self {
            media_type: Some(media_type),
            index: Some(index),
            ..Self::default()
        }
    }
}

impl fmt::Display for StreamSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            return f.write_str(name);
        }
        match (self.media_type, self.index) {
            (Some(t), Some(i)) => write!(f, "{}:{}", t.as_str(), i),
            (Some(t), None) => f.write_str(t.as_str()),
            (None, Some(i)) => write!(f, "{}", i),
            (None, None) => Ok(()),
        }
    }
}

/// An option that can be scoped to one stream (`-b:v`, `-codec:a:1`, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamOption<T> {
    #[serde(default)]
    pub stream: Option<StreamSpecifier>,
    pub value: T,
}

impl<T> StreamOption<T> {
    /// Option applying to every stream
    pub fn all(value: T) -> Self {
        Self {
            stream: None,
            value,
        }
    }

    pub fn for_stream(stream: StreamSpecifier, value: T) -> Self {
        Self {
            stream: Some(stream),
            value,
        }
    }

    /// Produce the `(flag, value)` token pair
    ///
    /// `index` is the entry's position when the option belongs to a list; it
    /// only tags the error.
    pub fn render<F>(
        &self,
        flag: &str,
        index: Option<usize>,
        format: F,
    ) -> Result<(String, String), OptionError>
    where
        F: FnOnce(&T) -> Result<String, FormatError>,
    {
        let value = format(&self.value).map_err(|e| OptionError::new(flag, index, e))?;
        let flag = match &self.stream {
            Some(stream) => format!("{}:{}", flag, stream),
            None => flag.to_string(),
        };
        Ok((flag, value))
    }
}

/// Append one `flag value` pair per entry, preserving order
///
/// Stops at the first entry that fails to format; the caller decides what
/// happens to tokens already appended.
pub(crate) fn apply_stream_options<T, F>(
    cmd: &mut CommandArgs,
    flag: &str,
    options: &[StreamOption<T>],
    format: F,
) -> Result<(), OptionError>
where
    F: Fn(&T) -> Result<String, FormatError>,
{
    for (idx, option) in options.iter().enumerate() {
        let (flag, value) = option.render(flag, Some(idx), &format)?;
        cmd.pair(flag, value);
    }
    Ok(())
}

/// Formatter for plain text values; an empty string is never a valid token value
#[allow(clippy::ptr_arg)]
pub(crate) fn non_empty(value: &String) -> Result<String, FormatError> {
    if value.is_empty() {
        return Err(FormatError::Empty);
    }
    Ok(value.clone())
}
