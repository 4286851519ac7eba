// Numeric shorthand: "2M", "128Ki", "1.5GiB"

use super::error::{FormatError, ParseNumberError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unit prefix of a shorthand number
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UnitPrefix {
    #[default]
    None,
    Kilo,
    Mega,
    Giga,
    Tera,
    Peta,
}

impl UnitPrefix {
    pub const ALL: [UnitPrefix; 6] = [
        UnitPrefix::None,
        UnitPrefix::Kilo,
        UnitPrefix::Mega,
        UnitPrefix::Giga,
        UnitPrefix::Tera,
        UnitPrefix::Peta,
    ];

    /// Exponent applied to the base (1000 or 1024)
    pub fn rank(self) -> i32 {
        match self {
            UnitPrefix::None => 0,
            UnitPrefix::Kilo => 1,
            UnitPrefix::Mega => 2,
            UnitPrefix::Giga => 3,
            UnitPrefix::Tera => 4,
            UnitPrefix::Peta => 5,
        }
    }

    pub fn letter(self) -> &'static str {
        match self {
            UnitPrefix::None => "",
            UnitPrefix::Kilo => "K",
            UnitPrefix::Mega => "M",
            UnitPrefix::Giga => "G",
            UnitPrefix::Tera => "T",
            UnitPrefix::Peta => "P",
        }
    }

    fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'k' => Some(UnitPrefix::Kilo),
            'm' => Some(UnitPrefix::Mega),
            'g' => Some(UnitPrefix::Giga),
            't' => Some(UnitPrefix::Tera),
            'p' => Some(UnitPrefix::Peta),
            _ => None,
        }
    }
}

/// Base value of a shorthand number
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberValue {
    Int(i64),
    Float(f64),
}

impl NumberValue {
    pub fn as_f64(self) -> f64 {
        match self {
            NumberValue::Int(v) => v as f64,
            NumberValue::Float(v) => v,
        }
    }
}

/// A number whose value may be written with unit shortcuts
///
/// Text form is `<value><prefix>[i][B]`: `i` switches the prefix base from
/// 1000 to 1024 and `B` multiplies by 8 (bytes to bits).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NumberRepr", into = "String")]
pub struct Number {
    pub value: NumberValue,
    pub prefix: UnitPrefix,
    pub binary_multiple: bool,
    pub bit_multiple: bool,
}

impl Number {
    pub fn int(value: i64) -> Self {
        Self::new(NumberValue::Int(value))
    }

    pub fn float(value: f64) -> Self {
        Self::new(NumberValue::Float(value))
    }

    fn new(value: NumberValue) -> Self {
        Self {
            value,
            prefix: UnitPrefix::None,
            binary_multiple: false,
            bit_multiple: false,
        }
    }

    pub fn with_prefix(mut self, prefix: UnitPrefix) -> Self {
        self.prefix = prefix;
        self
    }

    pub fn binary(mut self) -> Self {
        self.binary_multiple = true;
        self
    }

    pub fn bits(mut self) -> Self {
        self.bit_multiple = true;
        self
    }

    /// Expand the shorthand to an absolute magnitude
    pub fn to_absolute(&self) -> f64 {
        let mut out = self.value.as_f64();
        if self.bit_multiple {
            out *= 8.0;
        }
        let base: f64 = if self.binary_multiple { 1024.0 } else { 1000.0 };
        out * base.powi(self.prefix.rank())
    }

    /// Text form for the command line; non-finite values are rejected
    pub fn render(&self) -> Result<String, FormatError> {
        if let NumberValue::Float(v) = self.value {
            if !v.is_finite() {
                return Err(FormatError::NonFinite(v));
            }
        }
        Ok(self.to_string())
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            NumberValue::Int(v) => write!(f, "{}", v)?,
            NumberValue::Float(v) => f.write_str(&trim_fixed(v))?,
        }
        f.write_str(self.prefix.letter())?;
        if self.binary_multiple {
            f.write_str("i")?;
        }
        if self.bit_multiple {
            f.write_str("B")?;
        }
        Ok(())
    }
}

/// Three decimals, trailing zeros and a dangling point removed
fn trim_fixed(v: f64) -> String {
    let fixed = format!("{:.3}", v);
    if !fixed.contains('.') {
        return fixed;
    }
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

impl FromStr for Number {
    type Err = ParseNumberError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let err = |reason| ParseNumberError {
            input: input.to_string(),
            reason,
        };

        let mut rest = input;
        let mut number = Number::float(0.0);

        if let Some(stripped) = rest.strip_suffix('B') {
            number.bit_multiple = true;
            rest = stripped;
        }
        if let Some(stripped) = rest.strip_suffix('i') {
            number.binary_multiple = true;
            rest = stripped;
        }

        let last = rest.chars().last().ok_or_else(|| err("missing value"))?;
        if !last.is_ascii_digit() {
            number.prefix = UnitPrefix::from_letter(last).ok_or_else(|| err("unknown unit prefix"))?;
            rest = &rest[..rest.len() - last.len_utf8()];
        }

        let value: f64 = rest.parse().map_err(|_| err("value is not numeric"))?;
        number.value = NumberValue::Float(value);
        Ok(number)
    }
}

/// Accepted serde forms: shorthand text, integer, or float
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberRepr {
    Int(i64),
    Float(f64),
    Text(String),
}

impl TryFrom<NumberRepr> for Number {
    type Error = ParseNumberError;

    fn try_from(repr: NumberRepr) -> Result<Self, Self::Error> {
        match repr {
            NumberRepr::Int(v) => Ok(Number::int(v)),
            NumberRepr::Float(v) => Ok(Number::float(v)),
            NumberRepr::Text(s) => s.parse(),
        }
    }
}

impl From<Number> for String {
    fn from(n: Number) -> Self {
        n.to_string()
    }
}
