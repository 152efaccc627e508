//! Record batch cells that go back through the rule chain.
//!
//! Date, timestamp and `Decimal128` columns are read into chrono and
//! `rust_decimal` values so the encoder's configured formats apply to them.
//! Every other column keeps its Arrow JSON rendering.

use arrow::array::timezone::Tz;
use arrow::array::{Array, AsArray};
use arrow::datatypes::{
    DataType, Date32Type, Date64Type, Decimal128Type, TimeUnit, TimestampMicrosecondType,
    TimestampMillisecondType, TimestampNanosecondType, TimestampSecondType,
};
use arrow::error::ArrowError;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

/// A non-null cell of a column the rule chain has a category for.
pub(crate) enum Cell {
    Date(NaiveDate),
    /// A timestamp column without a time zone.
    NaiveTimestamp(NaiveDateTime),
    Timestamp(DateTime<FixedOffset>),
    Decimal(Decimal),
}

/// Whether cells of `data_type` are read by [`cell`].
pub(crate) fn is_extended(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Date32 | DataType::Date64 | DataType::Timestamp(_, _) | DataType::Decimal128(_, _)
    )
}

/// Read row `row` of `column`; `None` for nulls and for columns [`is_extended`]
/// rejects.
pub(crate) fn cell(column: &dyn Array, row: usize) -> Result<Option<Cell>, ArrowError> {
    if column.is_null(row) {
        return Ok(None);
    }
    let out_of_range = || ArrowError::ComputeError(format!("{} value out of range", column.data_type()));
    let cell = match column.data_type() {
        DataType::Date32 => column
            .as_primitive::<Date32Type>()
            .value_as_date(row)
            .map(Cell::Date),
        DataType::Date64 => column
            .as_primitive::<Date64Type>()
            .value_as_date(row)
            .map(Cell::Date),
        DataType::Timestamp(unit, tz) => {
            let utc = match unit {
                TimeUnit::Second => column.as_primitive::<TimestampSecondType>().value_as_datetime(row),
                TimeUnit::Millisecond => column
                    .as_primitive::<TimestampMillisecondType>()
                    .value_as_datetime(row),
                TimeUnit::Microsecond => column
                    .as_primitive::<TimestampMicrosecondType>()
                    .value_as_datetime(row),
                TimeUnit::Nanosecond => column
                    .as_primitive::<TimestampNanosecondType>()
                    .value_as_datetime(row),
            };
            match (utc, tz) {
                (Some(utc), None) => Some(Cell::NaiveTimestamp(utc)),
                (Some(utc), Some(tz)) => Some(Cell::Timestamp(in_zone(utc, tz)?)),
                (None, _) => None,
            }
        }
        DataType::Decimal128(_, scale) => {
            let raw = column.as_primitive::<Decimal128Type>().value(row);
            let scale = u32::try_from(*scale).map_err(|_| out_of_range())?;
            Some(Cell::Decimal(
                Decimal::try_from_i128_with_scale(raw, scale).map_err(|_| out_of_range())?,
            ))
        }
        _ => return Ok(None),
    };
    cell.map(Some).ok_or_else(out_of_range)
}

/// `utc` shifted into the column's zone, an IANA name or a fixed offset.
fn in_zone(utc: NaiveDateTime, tz: &str) -> Result<DateTime<FixedOffset>, ArrowError> {
    if tz.eq_ignore_ascii_case("utc") || tz == "Z" {
        return Ok(utc.and_utc().fixed_offset());
    }
    let zone: Tz = tz.parse()?;
    Ok(utc.and_utc().with_timezone(&zone).fixed_offset())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Date32Array, Decimal128Array, Int64Array, TimestampSecondArray};

    #[test]
    fn dates_and_decimals_are_read() {
        let dates = Date32Array::from(vec![Some(19_724), None]);
        assert!(matches!(
            cell(&dates, 0).unwrap(),
            Some(Cell::Date(d)) if d == NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        ));
        assert!(cell(&dates, 1).unwrap().is_none());

        let prices = Decimal128Array::from(vec![150])
            .with_precision_and_scale(5, 2)
            .unwrap();
        assert!(matches!(
            cell(&prices, 0).unwrap(),
            Some(Cell::Decimal(d)) if d.to_string() == "1.50"
        ));
    }

    #[test]
    fn zoned_timestamps_keep_their_offset() {
        let ts = TimestampSecondArray::from(vec![0]).with_timezone("+02:00");
        match cell(&ts, 0).unwrap() {
            Some(Cell::Timestamp(t)) => assert_eq!(t.to_rfc3339(), "1970-01-01T02:00:00+02:00"),
            _ => panic!("expected a zoned timestamp"),
        }
        let utc = TimestampSecondArray::from(vec![0]).with_timezone("UTC");
        assert!(matches!(cell(&utc, 0).unwrap(), Some(Cell::Timestamp(t)) if t.offset().local_minus_utc() == 0));
    }

    #[test]
    fn plain_columns_are_left_alone() {
        let ids = Int64Array::from(vec![1]);
        assert!(!is_extended(ids.data_type()));
        assert!(cell(&ids, 0).unwrap().is_none());
    }
}
