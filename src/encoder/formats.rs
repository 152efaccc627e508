//! Per-encoder format choices.

use crate::error::EncodeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";
pub const DEFAULT_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S.%f%z";

/// How decimals are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecimalFormat {
    /// As a JSON number (nearest `f64`), so `1.50` becomes `1.5`.
    #[default]
    Float,
    /// As the exact decimal text, so `1.50` stays `"1.50"`.
    String,
}

impl fmt::Display for DecimalFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DecimalFormat::Float => "float",
            DecimalFormat::String => "string",
        })
    }
}

impl FromStr for DecimalFormat {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "float" => Ok(DecimalFormat::Float),
            "string" => Ok(DecimalFormat::String),
            other => Err(EncodeError::InvalidDecimalFormat(other.to_string())),
        }
    }
}

/// Format specifiers for the encoder's configurable categories.
///
/// Date and time patterns use strftime directives. `%f` is six-digit
/// microseconds, and offset directives (`%z`, `%:z`, `%Z`) write nothing for
/// values that carry no offset. Unset fields keep their defaults:
///
/// | category    | default                     |
/// |-------------|-----------------------------|
/// | `decimal`   | `float`                     |
/// | `date`      | `%Y-%m-%d`                  |
/// | `datetime`  | `%Y-%m-%dT%H:%M:%S.%f%z`    |
/// | `timestamp` | `%Y-%m-%dT%H:%M:%S.%f%z`    |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncoderFormats {
    pub decimal: DecimalFormat,
    pub date: String,
    pub datetime: String,
    pub timestamp: String,
}

impl Default for EncoderFormats {
    fn default() -> Self {
        Self {
            decimal: DecimalFormat::Float,
            date: DEFAULT_DATE_FORMAT.to_string(),
            datetime: DEFAULT_DATETIME_FORMAT.to_string(),
            timestamp: DEFAULT_DATETIME_FORMAT.to_string(),
        }
    }
}

impl EncoderFormats {
    /// Build from `(category, specifier)` pairs over the defaults.
    ///
    /// ```
    /// use recordcodec::{DecimalFormat, EncoderFormats};
    ///
    /// let formats = EncoderFormats::from_pairs([("decimal", "string"), ("date", "%d/%m/%Y")]).unwrap();
    /// assert_eq!(formats.decimal, DecimalFormat::String);
    /// assert_eq!(formats.timestamp, "%Y-%m-%dT%H:%M:%S.%f%z");
    /// ```
    ///
    /// # Errors
    /// [`EncodeError::UnknownCategory`] for a category other than `decimal`,
    /// `date`, `datetime` or `timestamp`, and
    /// [`EncodeError::InvalidDecimalFormat`] for a bad `decimal` value.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, EncodeError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut formats = Self::default();
        for (key, value) in pairs {
            let value = value.into();
            match key.as_ref() {
                "decimal" => formats.decimal = value.parse()?,
                "date" => formats.date = value,
                "datetime" => formats.datetime = value,
                "timestamp" => formats.timestamp = value,
                other => return Err(EncodeError::UnknownCategory(other.to_string())),
            }
        }
        Ok(formats)
    }

    #[must_use]
    pub fn with_decimal(mut self, decimal: DecimalFormat) -> Self {
        self.decimal = decimal;
        self
    }

    #[must_use]
    pub fn with_date(mut self, pattern: impl Into<String>) -> Self {
        self.date = pattern.into();
        self
    }

    #[must_use]
    pub fn with_datetime(mut self, pattern: impl Into<String>) -> Self {
        self.datetime = pattern.into();
        self
    }

    #[must_use]
    pub fn with_timestamp(mut self, pattern: impl Into<String>) -> Self {
        self.timestamp = pattern.into();
        self
    }
}
