//! Typed field values and the default-resolution step.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Serialize, Serializer};

use crate::error::{Result, StorefrontError};

/// The kind of a record field, as declared by its accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Number,
    Boolean,
    Date,
    Text,
    /// Text drawn from a closed set (statuses, categories)
    Enum,
}

impl FieldKind {
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::Date => "date",
            FieldKind::Text => "text",
            FieldKind::Enum => "enum",
        }
    }

    /// Text and enum fields share the string representation.
    pub fn is_textual(&self) -> bool {
        matches!(self, FieldKind::Text | FieldKind::Enum)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single field value read from a record.
///
/// `Null` marks an absent optional field. Filters treat it as "no match";
/// sorting, search and statistics first pass it through [`FieldValue::resolve`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    #[default]
    Null,
    Number(f64),
    Bool(bool),
    Date(DateTime<Utc>),
    Text(String),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Whether this value can be stored in a field of `kind`. `Null` fits every kind.
    pub fn fits(&self, kind: FieldKind) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Number(_) => kind == FieldKind::Number,
            FieldValue::Bool(_) => kind == FieldKind::Boolean,
            FieldValue::Date(_) => kind == FieldKind::Date,
            FieldValue::Text(_) => kind.is_textual(),
        }
    }

    /// Replace an absent value with the kind's empty default.
    ///
    /// Dates have no meaningful empty timestamp and stay `Null`; the sort
    /// comparator orders them before every present date.
    pub fn resolve(self, kind: FieldKind) -> FieldValue {
        match (self, kind) {
            (FieldValue::Null, FieldKind::Number) => FieldValue::Number(0.0),
            (FieldValue::Null, FieldKind::Boolean) => FieldValue::Bool(false),
            (FieldValue::Null, FieldKind::Text | FieldKind::Enum) => {
                FieldValue::Text(String::new())
            }
            (value, _) => value,
        }
    }

    /// Equality as used by filters. Enum comparison ignores case; `Null` never matches.
    pub fn matches(&self, expected: &FieldValue, kind: FieldKind) -> bool {
        match (self, expected) {
            (FieldValue::Null, _) | (_, FieldValue::Null) => false,
            (FieldValue::Number(a), FieldValue::Number(b)) => a == b,
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a == b,
            (FieldValue::Date(a), FieldValue::Date(b)) => a == b,
            (FieldValue::Text(a), FieldValue::Text(b)) => {
                if kind == FieldKind::Enum {
                    a.to_lowercase() == b.to_lowercase()
                } else {
                    a == b
                }
            }
            _ => false,
        }
    }

    /// Parse a raw string into a value of `kind`.
    ///
    /// Dates accept RFC 3339 timestamps or plain `YYYY-MM-DD` (midnight UTC).
    /// An empty string parses to `Null`.
    pub fn parse(kind: FieldKind, raw: &str) -> Result<FieldValue> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(FieldValue::Null);
        }
        match kind {
            FieldKind::Number => raw
                .parse::<f64>()
                .map(FieldValue::Number)
                .map_err(|_| StorefrontError::InvalidInput(format!("Invalid number: {}", raw))),
            FieldKind::Boolean => match raw.to_lowercase().as_str() {
                "true" | "yes" | "1" => Ok(FieldValue::Bool(true)),
                "false" | "no" | "0" => Ok(FieldValue::Bool(false)),
                _ => Err(StorefrontError::InvalidInput(format!(
                    "Invalid boolean: {}",
                    raw
                ))),
            },
            FieldKind::Date => parse_timestamp(raw).map(FieldValue::Date),
            FieldKind::Text | FieldKind::Enum => Ok(FieldValue::Text(raw.to_string())),
        }
    }
}

/// Parse an RFC 3339 timestamp or a `YYYY-MM-DD` date.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let naive = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| StorefrontError::InvalidInput(format!("Invalid date: {}", value)))?;
        return Ok(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc));
    }

    Err(StorefrontError::InvalidInput(format!(
        "Invalid date/time (expected ISO-8601 or YYYY-MM-DD): {}",
        value
    )))
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Date(d) => write!(f, "{}", d.to_rfc3339()),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            FieldValue::Null => serializer.serialize_none(),
            FieldValue::Number(n) => serializer.serialize_f64(*n),
            FieldValue::Bool(b) => serializer.serialize_bool(*b),
            FieldValue::Date(d) => serializer.serialize_str(&d.to_rfc3339()),
            FieldValue::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Number(f64::from(value))
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::Date(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}
