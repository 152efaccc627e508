//! The encoder's rule chain.
//!
//! Each [`Category`] recognizes a closed set of Rust types by downcasting.
//! Categories are tried in [`Category::ORDER`] and the first match wins; a
//! value no category recognizes is not serializable.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, Utc};
use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use rust_decimal::Decimal;
use std::any::Any;
use std::error::Error as StdError;
use std::fmt;

/// A value handed to the encoder as-is, for the rule chain to classify.
///
/// Implemented for every `'static` type that is `Send + Sync + Debug`.
pub trait Opaque: Any + Send + Sync + fmt::Debug {
    fn as_any(&self) -> &dyn Any;

    fn type_name(&self) -> &'static str;
}

impl<T: Any + Send + Sync + fmt::Debug> Opaque for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// Strip any layers of `Box<dyn Opaque>` around a value.
pub(crate) fn peel(value: &dyn Opaque) -> &dyn Opaque {
    let mut current = value;
    while let Some(inner) = current.as_any().downcast_ref::<Box<dyn Opaque>>() {
        current = &**inner;
    }
    current
}

/// A value category with its own encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// `anyhow::Error`, `std::io::Error`, `Box<dyn Error + Send + Sync>`, and
    /// this crate's errors: the message text.
    Error,
    /// `rust_decimal::Decimal`: a number, or its exact text.
    Decimal,
    /// `DateTime<Utc>`, `DateTime<FixedOffset>`, `DateTime<Local>`: the
    /// `timestamp` pattern.
    Timestamp,
    /// `NaiveDateTime`: the `datetime` pattern.
    Datetime,
    /// `NaiveDate`: the `date` pattern, at midnight.
    Date,
    /// Arrow `RecordBatch`: an array of row objects whose date, timestamp and
    /// decimal cells go through their own categories.
    Frame,
    /// Fixed-width integers up to 128 bits.
    Integer,
    /// `f32` and `f64`.
    Float,
    /// `Vec<T>` or `Box<[T]>` of an integer or float type.
    NumericArray,
    /// `IpNet`, `Ipv4Net`, `Ipv6Net`: CIDR text.
    IpNetwork,
}

impl Category {
    /// Evaluation order. Timestamps precede datetimes, which precede dates.
    pub const ORDER: [Category; 10] = [
        Category::Error,
        Category::Decimal,
        Category::Timestamp,
        Category::Datetime,
        Category::Date,
        Category::Frame,
        Category::Integer,
        Category::Float,
        Category::NumericArray,
        Category::IpNetwork,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::Error => "error",
            Category::Decimal => "decimal",
            Category::Timestamp => "timestamp",
            Category::Datetime => "datetime",
            Category::Date => "date",
            Category::Frame => "frame",
            Category::Integer => "integer",
            Category::Float => "float",
            Category::NumericArray => "numeric array",
            Category::IpNetwork => "ip network",
        }
    }

    pub fn matches(self, value: &dyn Opaque) -> bool {
        self.extract(peel(value).as_any()).is_some()
    }

    pub(crate) fn extract(self, any: &dyn Any) -> Option<Matched<'_>> {
        match self {
            Category::Error => error(any).map(Matched::Error),
            Category::Decimal => any.downcast_ref::<Decimal>().map(Matched::Decimal),
            Category::Timestamp => timestamp(any).map(Matched::Timestamp),
            Category::Datetime => any.downcast_ref::<NaiveDateTime>().map(Matched::Datetime),
            Category::Date => any.downcast_ref::<NaiveDate>().map(Matched::Date),
            Category::Frame => frame(any),
            Category::Integer => integer(any).map(Matched::Scalar),
            Category::Float => float(any).map(Matched::Scalar),
            Category::NumericArray => numeric_array(any).map(Matched::Array),
            Category::IpNetwork => ip_network(any).map(Matched::IpNetwork),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The first category in [`Category::ORDER`] that recognizes `value`.
///
/// ```
/// use recordcodec::{Category, classify};
///
/// assert_eq!(classify(&7u16), Some(Category::Integer));
/// assert_eq!(classify(&std::time::Duration::ZERO), None);
/// ```
pub fn classify(value: &dyn Opaque) -> Option<Category> {
    first_match(peel(value).as_any()).map(|(category, _)| category)
}

pub(crate) fn first_match(any: &dyn Any) -> Option<(Category, Matched<'_>)> {
    Category::ORDER
        .into_iter()
        .find_map(|category| category.extract(any).map(|m| (category, m)))
}

/// A recognized value, borrowed or normalized for encoding.
pub(crate) enum Matched<'a> {
    Error(&'a (dyn StdError + 'static)),
    Decimal(&'a Decimal),
    Timestamp(DateTime<FixedOffset>),
    Datetime(&'a NaiveDateTime),
    Date(&'a NaiveDate),
    #[cfg(feature = "arrow")]
    Frame(&'a arrow::record_batch::RecordBatch),
    Scalar(Scalar),
    Array(Vec<Scalar>),
    IpNetwork(IpNet),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Scalar {
    Signed(i128),
    Unsigned(u128),
    Float(f64),
}

macro_rules! scalar_of {
    ($any:expr, $($t:ty => $variant:ident($wide:ty)),+ $(,)?) => {
        $(
            if let Some(v) = $any.downcast_ref::<$t>() {
                return Some(Scalar::$variant(*v as $wide));
            }
        )+
    };
}

fn integer(any: &dyn Any) -> Option<Scalar> {
    scalar_of!(any,
        i8 => Signed(i128),
        i16 => Signed(i128),
        i32 => Signed(i128),
        i64 => Signed(i128),
        i128 => Signed(i128),
        isize => Signed(i128),
        u8 => Unsigned(u128),
        u16 => Unsigned(u128),
        u32 => Unsigned(u128),
        u64 => Unsigned(u128),
        u128 => Unsigned(u128),
        usize => Unsigned(u128),
    );
    None
}

fn float(any: &dyn Any) -> Option<Scalar> {
    scalar_of!(any, f32 => Float(f64), f64 => Float(f64));
    None
}

fn scalar(any: &dyn Any) -> Option<Scalar> {
    integer(any).or_else(|| float(any))
}

macro_rules! array_of {
    ($any:expr, $($t:ty),+ $(,)?) => {
        $(
            if let Some(v) = $any.downcast_ref::<Vec<$t>>() {
                return v.iter().map(|x| scalar(x)).collect();
            }
            if let Some(v) = $any.downcast_ref::<Box<[$t]>>() {
                return v.iter().map(|x| scalar(x)).collect();
            }
        )+
    };
}

fn numeric_array(any: &dyn Any) -> Option<Vec<Scalar>> {
    array_of!(any, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);
    None
}

fn error(any: &dyn Any) -> Option<&(dyn StdError + 'static)> {
    if let Some(e) = any.downcast_ref::<anyhow::Error>() {
        return Some(&**e);
    }
    if let Some(e) = any.downcast_ref::<Box<dyn StdError + Send + Sync>>() {
        return Some(&**e);
    }
    if let Some(e) = any.downcast_ref::<std::io::Error>() {
        return Some(e);
    }
    if let Some(e) = any.downcast_ref::<crate::error::DecodeError>() {
        return Some(e);
    }
    if let Some(e) = any.downcast_ref::<crate::error::EncodeError>() {
        return Some(e);
    }
    None
}

fn timestamp(any: &dyn Any) -> Option<DateTime<FixedOffset>> {
    if let Some(t) = any.downcast_ref::<DateTime<Utc>>() {
        return Some(t.fixed_offset());
    }
    if let Some(t) = any.downcast_ref::<DateTime<FixedOffset>>() {
        return Some(*t);
    }
    any.downcast_ref::<DateTime<Local>>()
        .map(DateTime::fixed_offset)
}

#[cfg(feature = "arrow")]
fn frame(any: &dyn Any) -> Option<Matched<'_>> {
    any.downcast_ref::<arrow::record_batch::RecordBatch>()
        .map(Matched::Frame)
}

#[cfg(not(feature = "arrow"))]
fn frame(_any: &dyn Any) -> Option<Matched<'_>> {
    None
}

fn ip_network(any: &dyn Any) -> Option<IpNet> {
    if let Some(n) = any.downcast_ref::<IpNet>() {
        return Some(*n);
    }
    if let Some(n) = any.downcast_ref::<Ipv4Net>() {
        return Some(IpNet::V4(*n));
    }
    any.downcast_ref::<Ipv6Net>().map(|n| IpNet::V6(*n))
}
