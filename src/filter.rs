//! Row predicates for the Parquet reader.
//!
//! Filters use disjunctive normal form: a list of conjunctions, at least one
//! of which must hold for a row to be kept. They deserialize from either
//! shape callers commonly write:
//!
//! ```
//! use recordcodec::filter::Filters;
//!
//! // one conjunction
//! let a: Filters = serde_json::from_str(r#"[["year", ">=", 2020], ["kind", "in", ["a", "b"]]]"#).unwrap();
//! // OR of conjunctions
//! let b: Filters = serde_json::from_str(r#"[[["year", "==", 2020]], [["kind", "!=", "c"]]]"#).unwrap();
//! assert_eq!(a.conjunctions().len(), 1);
//! assert_eq!(b.conjunctions().len(), 2);
//! ```
//!
//! A null field, or a field whose JSON type differs from the filter value,
//! satisfies no operator.

use crate::error::ParseError;
use crate::record::Record;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOp {
    #[serde(rename = "==", alias = "=")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "not in")]
    NotIn,
}

/// `column op value`, written as a three-element array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "(String, FilterOp, Value)", into = "(String, FilterOp, Value)")]
pub struct Predicate {
    pub column: String,
    pub op: FilterOp,
    pub value: Value,
}

impl Predicate {
    pub fn new(column: impl Into<String>, op: FilterOp, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            op,
            value: value.into(),
        }
    }

    fn holds(&self, field: &Value) -> bool {
        if field.is_null() {
            return false;
        }
        match self.op {
            FilterOp::In => candidates(&self.value)
                .iter()
                .any(|v| compare(field, v) == Some(Ordering::Equal)),
            FilterOp::NotIn => candidates(&self.value)
                .iter()
                .all(|v| matches!(compare(field, v), Some(o) if o != Ordering::Equal)),
            op => compare(field, &self.value).is_some_and(|o| match op {
                FilterOp::Eq => o == Ordering::Equal,
                FilterOp::Ne => o != Ordering::Equal,
                FilterOp::Lt => o == Ordering::Less,
                FilterOp::Le => o != Ordering::Greater,
                FilterOp::Gt => o == Ordering::Greater,
                FilterOp::Ge => o != Ordering::Less,
                FilterOp::In | FilterOp::NotIn => false,
            }),
        }
    }
}

impl From<(String, FilterOp, Value)> for Predicate {
    fn from((column, op, value): (String, FilterOp, Value)) -> Self {
        Self { column, op, value }
    }
}

impl From<Predicate> for (String, FilterOp, Value) {
    fn from(p: Predicate) -> Self {
        (p.column, p.op, p.value)
    }
}

fn candidates(value: &Value) -> &[Value] {
    match value {
        Value::Array(items) => items,
        single => std::slice::from_ref(single),
    }
}

fn compare(field: &Value, target: &Value) -> Option<Ordering> {
    match (field, target) {
        (Value::Number(a), Value::Number(b)) => {
            if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
                Some(x.cmp(&y))
            } else if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
                Some(x.cmp(&y))
            } else {
                a.as_f64()?.partial_cmp(&b.as_f64()?)
            }
        }
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Predicates in disjunctive normal form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "FiltersRepr", into = "Vec<Vec<Predicate>>")]
pub struct Filters {
    conjunctions: Vec<Vec<Predicate>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FiltersRepr {
    Conjunction(Vec<Predicate>),
    Disjunction(Vec<Vec<Predicate>>),
}

impl From<FiltersRepr> for Filters {
    fn from(repr: FiltersRepr) -> Self {
        match repr {
            FiltersRepr::Conjunction(all) => Filters::all(all),
            FiltersRepr::Disjunction(any) => Filters::any(any),
        }
    }
}

impl From<Filters> for Vec<Vec<Predicate>> {
    fn from(f: Filters) -> Self {
        f.conjunctions
    }
}

impl Filters {
    /// Keep rows matching every predicate.
    pub fn all(predicates: Vec<Predicate>) -> Self {
        Self {
            conjunctions: vec![predicates],
        }
    }

    /// Keep rows matching every predicate of at least one group.
    pub fn any(conjunctions: Vec<Vec<Predicate>>) -> Self {
        Self { conjunctions }
    }

    pub fn conjunctions(&self) -> &[Vec<Predicate>] {
        &self.conjunctions
    }

    /// Whether `record` passes. No conjunctions at all keeps every row.
    ///
    /// # Errors
    /// [`ParseError::Shape`] if a predicate names a column the record lacks.
    pub fn matches(&self, record: &Record) -> Result<bool, ParseError> {
        if self.conjunctions.is_empty() {
            return Ok(true);
        }
        for group in &self.conjunctions {
            let mut ok = true;
            for p in group {
                let field = record.get(&p.column).ok_or_else(|| {
                    ParseError::Shape(format!("filter column {:?} not found", p.column))
                })?;
                ok &= p.holds(field);
            }
            if ok {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
