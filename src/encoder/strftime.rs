//! strftime patterns with six-digit `%f` and offset-free rendering of naive values.

use crate::error::EncodeError;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, NaiveDateTime};
use std::fmt::{self, Write};

/// A validated pattern, kept in two chrono-native variants: one for values
/// with an offset and one, without offset directives, for naive values.
#[derive(Debug, Clone)]
pub(crate) struct Pattern {
    category: &'static str,
    source: String,
    aware: String,
    naive: String,
}

impl Pattern {
    pub(crate) fn compile(category: &'static str, source: &str) -> Result<Self, EncodeError> {
        let pattern = Self::translate(category, source);
        if has_error(&pattern.aware) || has_error(&pattern.naive) {
            return Err(EncodeError::InvalidPattern {
                category,
                pattern: source.to_string(),
            });
        }
        Ok(pattern)
    }

    /// `%f` becomes `%6f`; `%z`, `%:z` and `%Z` are dropped from the naive variant.
    pub(crate) fn translate(category: &'static str, source: &str) -> Self {
        let mut aware = String::with_capacity(source.len() + 1);
        let mut naive = String::with_capacity(source.len() + 1);
        let mut chars = source.chars().peekable();
        while let Some(c) = chars.next() {
            if c != '%' {
                aware.push(c);
                naive.push(c);
                continue;
            }
            match chars.peek().copied() {
                Some('f') => {
                    chars.next();
                    aware.push_str("%6f");
                    naive.push_str("%6f");
                }
                Some(d @ ('z' | 'Z')) => {
                    chars.next();
                    aware.push('%');
                    aware.push(d);
                }
                Some(':') => {
                    chars.next();
                    if chars.peek() == Some(&'z') {
                        chars.next();
                        aware.push_str("%:z");
                    } else {
                        aware.push_str("%:");
                        naive.push_str("%:");
                    }
                }
                Some('%') => {
                    chars.next();
                    aware.push_str("%%");
                    naive.push_str("%%");
                }
                _ => {
                    aware.push('%');
                    naive.push('%');
                }
            }
        }
        Self {
            category,
            source: source.to_string(),
            aware,
            naive,
        }
    }

    pub(crate) fn render_aware(&self, value: &DateTime<FixedOffset>) -> Result<String, EncodeError> {
        self.render(value.format(&self.aware))
    }

    pub(crate) fn render_naive(&self, value: &NaiveDateTime) -> Result<String, EncodeError> {
        self.render(value.format(&self.naive))
    }

    fn render(&self, formatted: impl fmt::Display) -> Result<String, EncodeError> {
        let mut out = String::new();
        write!(out, "{formatted}").map_err(|_| EncodeError::Format {
            category: self.category,
            pattern: self.source.clone(),
        })?;
        Ok(out)
    }
}

fn has_error(pattern: &str) -> bool {
    StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn naive() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_micro_opt(7, 5, 1, 42)
            .unwrap()
    }

    #[test]
    fn fraction_is_six_digits() {
        let p = Pattern::compile("datetime", "%S.%f").unwrap();
        assert_eq!(p.render_naive(&naive()).unwrap(), "01.000042");
    }

    #[test]
    fn offsets_vanish_for_naive_values() {
        let p = Pattern::compile("datetime", "%H:%M%z|%:z|%Z").unwrap();
        assert_eq!(p.render_naive(&naive()).unwrap(), "07:05||");

        let aware = Pattern::compile("timestamp", "%H:%M%z|%:z").unwrap();
        let utc = Utc.from_utc_datetime(&naive()).fixed_offset();
        assert_eq!(aware.render_aware(&utc).unwrap(), "07:05+0000|+00:00");
    }

    #[test]
    fn literal_percent_survives() {
        let p = Pattern::compile("date", "100%% %f").unwrap();
        assert_eq!(p.render_naive(&naive()).unwrap(), "100% 000042");
    }

    #[test]
    fn unknown_directive_is_invalid() {
        let err = Pattern::compile("date", "%Y-%!").unwrap_err();
        assert!(matches!(err, EncodeError::InvalidPattern { category: "date", .. }));
        assert!(Pattern::compile("date", "trailing %").is_err());
    }
}
