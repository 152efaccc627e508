//! JSON text encoding with rules for values JSON cannot represent natively.
//!
//! An [`Encoder`] is built once from [`EncoderFormats`] and reused freely. It
//! turns a [`Value`] tree into JSON, passing every [`Value::Other`] leaf to
//! [`Encoder::encode_default`], which tries each [`Category`] in
//! [`Category::ORDER`] and fails with [`EncodeError::Unserializable`] when
//! none applies.
//!
//! ```
//! use chrono::NaiveDate;
//! use recordcodec::{Encoder, EncoderFormats, Value};
//! use rust_decimal::Decimal;
//! use std::str::FromStr;
//!
//! # fn main() -> Result<(), recordcodec::EncodeError> {
//! let encoder = Encoder::new(EncoderFormats::from_pairs([("decimal", "string")])?)?;
//! let row = Value::object([
//!     ("price", Value::other(Decimal::from_str("1.50").unwrap())),
//!     ("day", Value::other(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())),
//! ]);
//! assert_eq!(encoder.to_string(&row)?, r#"{"price":"1.50","day":"2024-05-01"}"#);
//! # Ok(())
//! # }
//! ```

mod formats;
#[cfg(feature = "arrow")]
mod frame;
mod rules;
mod strftime;
mod value;

pub use formats::{DEFAULT_DATE_FORMAT, DEFAULT_DATETIME_FORMAT, DecimalFormat, EncoderFormats};
pub use rules::{Category, Opaque, classify};
pub use value::Value;

use crate::error::EncodeError;
use chrono::NaiveTime;
use rules::{Matched, Scalar, first_match, peel};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::{Map, Number, Value as Json};
use std::any::Any;
use std::io;
use strftime::Pattern;

/// Encodes values to JSON with a fixed set of format choices.
#[derive(Debug, Clone)]
pub struct Encoder {
    formats: EncoderFormats,
    date: Pattern,
    datetime: Pattern,
    timestamp: Pattern,
}

impl Default for Encoder {
    fn default() -> Self {
        let formats = EncoderFormats::default();
        Self {
            date: Pattern::translate("date", &formats.date),
            datetime: Pattern::translate("datetime", &formats.datetime),
            timestamp: Pattern::translate("timestamp", &formats.timestamp),
            formats,
        }
    }
}

impl Encoder {
    /// # Errors
    /// [`EncodeError::InvalidPattern`] if a date or time pattern has an
    /// unknown or incomplete directive.
    pub fn new(formats: EncoderFormats) -> Result<Self, EncodeError> {
        Ok(Self {
            date: Pattern::compile("date", &formats.date)?,
            datetime: Pattern::compile("datetime", &formats.datetime)?,
            timestamp: Pattern::compile("timestamp", &formats.timestamp)?,
            formats,
        })
    }

    pub fn formats(&self) -> &EncoderFormats {
        &self.formats
    }

    /// Encode one value JSON has no native form for.
    ///
    /// # Errors
    /// - [`EncodeError::Unserializable`] if no category recognizes the value.
    /// - [`EncodeError::IntegerOutOfRange`] for a 128-bit integer beyond
    ///   `i64`/`u64`.
    /// - [`EncodeError::Frame`] if a record batch column cannot be converted.
    pub fn encode_default(&self, value: &dyn Opaque) -> Result<Json, EncodeError> {
        let value = peel(value);
        match first_match(value.as_any()) {
            Some((_, matched)) => self.render(matched),
            None => Err(EncodeError::Unserializable {
                type_name: value.type_name(),
            }),
        }
    }

    /// Resolve a whole tree into a JSON value.
    ///
    /// # Errors
    /// The first error from [`encode_default`](Self::encode_default) on any leaf.
    pub fn to_json(&self, value: &Value) -> Result<Json, EncodeError> {
        Ok(match value {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Number(n) => Json::Number(n.clone()),
            Value::String(s) => Json::String(s.clone()),
            Value::Array(items) => Json::Array(
                items
                    .iter()
                    .map(|item| self.to_json(item))
                    .collect::<Result<_, _>>()?,
            ),
            Value::Object(fields) => {
                let mut map = Map::with_capacity(fields.len());
                for (key, field) in fields {
                    map.insert(key.clone(), self.to_json(field)?);
                }
                Json::Object(map)
            }
            Value::Other(other) => self.encode_leaf(&**other)?,
        })
    }

    /// # Errors
    /// As [`to_json`](Self::to_json).
    pub fn to_string(&self, value: &Value) -> Result<String, EncodeError> {
        Ok(serde_json::to_string(&self.to_json(value)?)?)
    }

    /// # Errors
    /// As [`to_json`](Self::to_json).
    pub fn to_string_pretty(&self, value: &Value) -> Result<String, EncodeError> {
        Ok(serde_json::to_string_pretty(&self.to_json(value)?)?)
    }

    /// # Errors
    /// As [`to_json`](Self::to_json), plus [`EncodeError::Json`] when `writer`
    /// fails. Nothing is written if the tree does not encode.
    pub fn to_writer<W: io::Write>(&self, writer: W, value: &Value) -> Result<(), EncodeError> {
        let json = self.to_json(value)?;
        serde_json::to_writer(writer, &json)?;
        Ok(())
    }

    /// Leaves that JSON already handles pass through; the rest go to the rule chain.
    fn encode_leaf(&self, value: &dyn Opaque) -> Result<Json, EncodeError> {
        let value = peel(value);
        match native(value.as_any()) {
            Some(json) => Ok(json),
            None => self.encode_default(value),
        }
    }

    fn render(&self, matched: Matched<'_>) -> Result<Json, EncodeError> {
        match matched {
            Matched::Error(err) => Ok(Json::String(err.to_string())),
            Matched::Decimal(d) => Ok(self.decimal(d)),
            Matched::Timestamp(t) => self.timestamp.render_aware(&t).map(Json::String),
            Matched::Datetime(dt) => self.datetime.render_naive(dt).map(Json::String),
            Matched::Date(d) => self
                .date
                .render_naive(&d.and_time(NaiveTime::MIN))
                .map(Json::String),
            #[cfg(feature = "arrow")]
            Matched::Frame(batch) => self.frame(batch),
            Matched::Scalar(s) => scalar_json(s),
            Matched::Array(items) => items
                .into_iter()
                .map(scalar_json)
                .collect::<Result<_, _>>()
                .map(Json::Array),
            Matched::IpNetwork(net) => Ok(Json::String(net.to_string())),
        }
    }

    /// One object per row. Date, timestamp and decimal cells use this
    /// encoder's formats; the rest keep their Arrow JSON form.
    #[cfg(feature = "arrow")]
    fn frame(&self, batch: &arrow::record_batch::RecordBatch) -> Result<Json, EncodeError> {
        let mut rows = crate::io::batch::batch_to_records(batch).map_err(EncodeError::Frame)?;
        let schema = batch.schema();
        for (field, column) in schema.fields().iter().zip(batch.columns()) {
            if !frame::is_extended(field.data_type()) {
                continue;
            }
            for (row, record) in rows.iter_mut().enumerate() {
                let json = match frame::cell(column.as_ref(), row).map_err(EncodeError::Frame)? {
                    Some(frame::Cell::Date(d)) => self.render(Matched::Date(&d))?,
                    Some(frame::Cell::NaiveTimestamp(t)) => {
                        Json::String(self.timestamp.render_naive(&t)?)
                    }
                    Some(frame::Cell::Timestamp(t)) => self.render(Matched::Timestamp(t))?,
                    Some(frame::Cell::Decimal(d)) => self.decimal(&d),
                    None => Json::Null,
                };
                record.insert(field.name().clone(), json);
            }
        }
        Ok(Json::Array(rows.into_iter().map(Json::Object).collect()))
    }

    fn decimal(&self, d: &Decimal) -> Json {
        match self.formats.decimal {
            DecimalFormat::String => Json::String(d.to_string()),
            DecimalFormat::Float => d
                .to_f64()
                .and_then(Number::from_f64)
                .map_or(Json::Null, Json::Number),
        }
    }
}

/// Non-finite floats become null.
fn scalar_json(s: Scalar) -> Result<Json, EncodeError> {
    match s {
        Scalar::Signed(v) => i64::try_from(v)
            .map(Json::from)
            .or_else(|_| u64::try_from(v).map(Json::from))
            .map_err(|_| EncodeError::IntegerOutOfRange(v.to_string())),
        Scalar::Unsigned(v) => u64::try_from(v)
            .map(Json::from)
            .map_err(|_| EncodeError::IntegerOutOfRange(v.to_string())),
        Scalar::Float(v) => Ok(Number::from_f64(v).map_or(Json::Null, Json::Number)),
    }
}

fn native(any: &dyn Any) -> Option<Json> {
    if let Some(v) = any.downcast_ref::<Json>() {
        return Some(v.clone());
    }
    if let Some(m) = any.downcast_ref::<Map<String, Json>>() {
        return Some(Json::Object(m.clone()));
    }
    if let Some(s) = any.downcast_ref::<String>() {
        return Some(Json::String(s.clone()));
    }
    if let Some(s) = any.downcast_ref::<&'static str>() {
        return Some(Json::String((*s).to_string()));
    }
    any.downcast_ref::<bool>().map(|b| Json::Bool(*b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoder_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Encoder>();
    }

    #[test]
    fn default_matches_default_formats() {
        let enc = Encoder::default();
        assert_eq!(enc.formats(), &EncoderFormats::default());
        assert!(Encoder::new(EncoderFormats::default()).is_ok());
    }

    #[test]
    fn native_leaves_pass_through() {
        let enc = Encoder::default();
        let json = enc.to_json(&Value::other("plain".to_string())).unwrap();
        assert_eq!(json, Json::String("plain".into()));
        assert!(matches!(
            enc.encode_default(&"plain".to_string()),
            Err(EncodeError::Unserializable { .. })
        ));
    }

    #[test]
    fn wide_integers_fit_or_fail() {
        assert_eq!(scalar_json(Scalar::Signed(-5)).unwrap(), Json::from(-5));
        assert_eq!(
            scalar_json(Scalar::Signed(i128::from(u64::MAX))).unwrap(),
            Json::from(u64::MAX)
        );
        assert!(matches!(
            scalar_json(Scalar::Unsigned(u128::MAX)),
            Err(EncodeError::IntegerOutOfRange(_))
        ));
    }
}
