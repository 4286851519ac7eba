// Simple per-stream filters (-filter) and the -filter_complex graph

use super::error::FormatError;
use super::stream::StreamSpecifier;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Aspect ratio written as `antecedent/consequent`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ratio {
    pub antecedent: u32,
    pub consequent: u32,
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.antecedent, self.consequent)
    }
}

/// Frame dimensions written as `width:height`
///
/// Negative values keep their FFmpeg meaning (`-1`/`-2` preserve aspect).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scale {
    pub width: i32,
    pub height: i32,
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

/// Filters accepted by `-filter`, rendered in a fixed order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterOptions {
    /// `setsar`
    pub sar: Option<Ratio>,
    /// `scale` (software)
    pub scale: Option<Scale>,
    /// `scale_npp` (CUDA)
    pub scale_npp: Option<Scale>,
    /// `format`
    pub pixel_format: Option<String>,
}

impl FilterOptions {
    /// Comma-joined `name=value` fragments; a filter with nothing set is an error
    pub fn render(&self) -> Result<String, FormatError> {
        let mut items = Vec::new();
        if let Some(sar) = &self.sar {
            items.push(format!("setsar={}", sar));
        }
        if let Some(scale) = &self.scale {
            items.push(format!("scale={}", scale));
        }
        if let Some(scale) = &self.scale_npp {
            items.push(format!("scale_npp={}", scale));
        }
        if let Some(fmt) = self.pixel_format.as_deref().filter(|f| !f.is_empty()) {
            items.push(format!("format={}", fmt));
        }

        if items.is_empty() {
            return Err(FormatError::EmptyFilter);
        }
        Ok(items.join(","))
    }
}

/// One labelled filter chain: `[in1][in2]f1,f2[out1][out2]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterChain {
    pub inputs: Vec<StreamSpecifier>,
    pub filters: Vec<String>,
    pub outputs: Vec<StreamSpecifier>,
}

impl FilterChain {
    pub fn render(&self) -> String {
        let mut out = String::new();
        for input in &self.inputs {
            out.push_str(&format!("[{}]", input));
        }
        out.push_str(&self.filters.join(","));
        for output in &self.outputs {
            out.push_str(&format!("[{}]", output));
        }
        out
    }
}

/// Text placed between chains in the rendered graph
///
/// FFmpeg's graph syntax separates independent chains with `;`. Jobs built
/// against the historical behaviour join them with `,`, which stays the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainSeparator {
    #[default]
    Comma,
    Semicolon,
}

impl ChainSeparator {
    pub fn as_str(self) -> &'static str {
        match self {
            ChainSeparator::Comma => ",",
            ChainSeparator::Semicolon => ";",
        }
    }
}

/// The script passed to `-filter_complex`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplexFilterGraph {
    /// Prepend `split=N[out0]...[out(N-1)]`
    pub auto_split: Option<u32>,
    pub chains: Vec<FilterChain>,
    pub separator: ChainSeparator,
}

impl ComplexFilterGraph {
    /// Render the whole graph; empty chains are dropped, empty graph is `""`
    pub fn render(&self) -> String {
        let split = self.auto_split.map(|n| {
            let mut filter = format!("split={}", n);
            for idx in 0..n {
                filter.push_str(&format!("[out{}]", idx));
            }
            FilterChain {
                filters: vec![filter],
                ..FilterChain::default()
            }
        });

        split
            .iter()
            .chain(self.chains.iter())
            .map(FilterChain::render)
            .filter(|chain| !chain.is_empty())
            .collect::<Vec<_>>()
            .join(self.separator.as_str())
    }
}
