//! Per-field predicate builders.
//!
//! A [`FieldFilter`] names a field and a [`Condition`]. Filters are checked
//! against the field's declared kind before use; a raw `Null` value never
//! satisfies any condition.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StorefrontError;
use crate::record::{FieldAccessorMap, FieldKind, FieldRef, FieldValue};

/// Inventory bucket for stock-quantity fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StockLevel {
    /// Quantity above zero
    InStock,
    /// Quantity above zero and at most the threshold
    LowStock,
    /// Quantity zero or below
    OutOfStock,
}

impl StockLevel {
    pub fn contains(&self, quantity: f64, low_stock_threshold: f64) -> bool {
        match self {
            StockLevel::InStock => quantity > 0.0,
            StockLevel::LowStock => quantity > 0.0 && quantity <= low_stock_threshold,
            StockLevel::OutOfStock => quantity <= 0.0,
        }
    }
}

impl FromStr for StockLevel {
    type Err = StorefrontError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "in" | "in-stock" => Ok(StockLevel::InStock),
            "low" | "low-stock" => Ok(StockLevel::LowStock),
            "out" | "out-of-stock" => Ok(StockLevel::OutOfStock),
            other => Err(StorefrontError::InvalidInput(format!(
                "Invalid stock level: {} (use in, low or out)",
                other
            ))),
        }
    }
}

/// The test applied to one field.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Equality; enum fields compare case-insensitively
    Equals(FieldValue),
    /// Inclusive numeric range, either bound optional
    Range { min: Option<f64>, max: Option<f64> },
    /// Inclusive timestamp window, either bound optional
    DateRange {
        since: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    },
    /// Membership in an enumerated set
    OneOf(Vec<FieldValue>),
    /// Stock bucket with an externally supplied low-stock threshold
    Stock {
        level: StockLevel,
        low_stock_threshold: f64,
    },
}

impl Condition {
    pub fn name(&self) -> &'static str {
        match self {
            Condition::Equals(_) => "equals",
            Condition::Range { .. } => "range",
            Condition::DateRange { .. } => "date-range",
            Condition::OneOf(_) => "one-of",
            Condition::Stock { .. } => "stock",
        }
    }

    /// Whether this condition can be evaluated against a field of `kind`.
    pub fn applies_to(&self, kind: FieldKind) -> bool {
        match self {
            Condition::Equals(value) => !value.is_null() && value.fits(kind),
            Condition::Range { .. } | Condition::Stock { .. } => kind == FieldKind::Number,
            Condition::DateRange { .. } => kind == FieldKind::Date,
            Condition::OneOf(values) => values.iter().all(|value| value.fits(kind)),
        }
    }

    /// Evaluate against a raw (unresolved) field value.
    pub fn matches(&self, value: &FieldValue, kind: FieldKind) -> bool {
        match self {
            Condition::Equals(expected) => value.matches(expected, kind),
            Condition::Range { min, max } => value.as_number().is_some_and(|n| {
                min.map_or(true, |lower| n >= lower) && max.map_or(true, |upper| n <= upper)
            }),
            Condition::DateRange { since, until } => value.as_date().is_some_and(|d| {
                since.map_or(true, |lower| d >= lower) && until.map_or(true, |upper| d <= upper)
            }),
            Condition::OneOf(values) => values.iter().any(|expected| value.matches(expected, kind)),
            Condition::Stock {
                level,
                low_stock_threshold,
            } => value
                .as_number()
                .is_some_and(|n| level.contains(n, *low_stock_threshold)),
        }
    }
}

/// One filter dimension: a field name and the condition it must satisfy.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub condition: Condition,
}

impl FieldFilter {
    pub fn new(field: impl Into<String>, condition: Condition) -> Self {
        Self {
            field: field.into(),
            condition,
        }
    }

    pub fn equals(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::new(field, Condition::Equals(value.into()))
    }

    pub fn range(field: impl Into<String>, min: Option<f64>, max: Option<f64>) -> Self {
        Self::new(field, Condition::Range { min, max })
    }

    pub fn date_range(
        field: impl Into<String>,
        since: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    ) -> Self {
        Self::new(field, Condition::DateRange { since, until })
    }

    pub fn one_of<V: Into<FieldValue>>(
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::new(
            field,
            Condition::OneOf(values.into_iter().map(Into::into).collect()),
        )
    }

    pub fn stock(field: impl Into<String>, level: StockLevel, low_stock_threshold: f64) -> Self {
        Self::new(
            field,
            Condition::Stock {
                level,
                low_stock_threshold,
            },
        )
    }
}

/// Why a filter could not be bound to an accessor map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BindError {
    UnknownField,
    KindMismatch(FieldKind),
}

/// Resolve a filter's field and check the condition against its kind.
pub(crate) fn bind<'a, R>(
    filter: &FieldFilter,
    accessors: &'a FieldAccessorMap<R>,
) -> Result<&'a FieldRef<R>, BindError> {
    let field = accessors
        .get(&filter.field)
        .ok_or(BindError::UnknownField)?;
    if filter.condition.applies_to(field.kind()) {
        Ok(field)
    } else {
        Err(BindError::KindMismatch(field.kind()))
    }
}

/// Case-insensitive substring search across text fields (OR among fields).
pub(crate) fn search_matches<R>(record: &R, needle: &str, fields: &[&FieldRef<R>]) -> bool {
    fields.iter().any(|field| match field.resolved(record) {
        FieldValue::Text(text) => text.to_lowercase().contains(needle),
        _ => false,
    })
}

/// Normalize search text: trimmed and lowercased, `None` when blank.
pub(crate) fn search_needle(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|needle| !needle.is_empty())
        .map(str::to_lowercase)
}

/// A shareable boolean test over one record.
pub struct RecordPredicate<R>(Arc<dyn Fn(&R) -> bool + Send + Sync>);

impl<R> RecordPredicate<R> {
    pub fn new(test: impl Fn(&R) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(test))
    }

    pub fn test(&self, record: &R) -> bool {
        (self.0)(record)
    }
}

impl<R: 'static> RecordPredicate<R> {
    /// Bind a field filter to an accessor map.
    ///
    /// Returns `None` when the field is unknown or the condition does not
    /// fit the field's kind.
    pub fn from_filter(filter: &FieldFilter, accessors: &FieldAccessorMap<R>) -> Option<Self> {
        let field = bind(filter, accessors).ok()?.clone();
        let condition = filter.condition.clone();
        Some(Self::new(move |record: &R| {
            condition.matches(&field.read(record), field.kind())
        }))
    }

    /// Conjunction of two predicates.
    pub fn and(self, other: RecordPredicate<R>) -> Self {
        Self::new(move |record: &R| self.test(record) && other.test(record))
    }

    /// Negation of a predicate.
    pub fn not(self) -> Self {
        Self::new(move |record: &R| !self.test(record))
    }
}

impl<R> Clone for RecordPredicate<R> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<R> fmt::Debug for RecordPredicate<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RecordPredicate")
    }
}
