//! Typed conversions from `FieldValue` writes into record fields.

use chrono::{DateTime, Utc};

use crate::error::FieldError;
use crate::record::{FieldKind, FieldValue};

pub(crate) fn text(name: &str, value: FieldValue) -> Result<String, FieldError> {
    match value {
        FieldValue::Text(text) => Ok(text),
        _ => Err(FieldError::kind_mismatch(name, FieldKind::Text)),
    }
}

pub(crate) fn optional_text(name: &str, value: FieldValue) -> Result<Option<String>, FieldError> {
    match value {
        FieldValue::Null => Ok(None),
        other => text(name, other).map(Some),
    }
}

pub(crate) fn number(name: &str, value: FieldValue) -> Result<f64, FieldError> {
    match value {
        FieldValue::Number(n) if n.is_finite() => Ok(n),
        _ => Err(FieldError::kind_mismatch(name, FieldKind::Number)),
    }
}

pub(crate) fn optional_number(name: &str, value: FieldValue) -> Result<Option<f64>, FieldError> {
    match value {
        FieldValue::Null => Ok(None),
        other => number(name, other).map(Some),
    }
}

/// Non-negative whole number (stock, counters).
pub(crate) fn count(name: &str, value: FieldValue) -> Result<u32, FieldError> {
    let n = number(name, value)?;
    if n < 0.0 || n.fract() != 0.0 || n > f64::from(u32::MAX) {
        return Err(FieldError::kind_mismatch(name, FieldKind::Number));
    }
    Ok(n as u32)
}

pub(crate) fn optional_count(name: &str, value: FieldValue) -> Result<Option<u32>, FieldError> {
    match value {
        FieldValue::Null => Ok(None),
        other => count(name, other).map(Some),
    }
}

pub(crate) fn boolean(name: &str, value: FieldValue) -> Result<bool, FieldError> {
    match value {
        FieldValue::Bool(b) => Ok(b),
        _ => Err(FieldError::kind_mismatch(name, FieldKind::Boolean)),
    }
}

pub(crate) fn date(name: &str, value: FieldValue) -> Result<DateTime<Utc>, FieldError> {
    match value {
        FieldValue::Date(at) => Ok(at),
        _ => Err(FieldError::kind_mismatch(name, FieldKind::Date)),
    }
}

pub(crate) fn optional_date(
    name: &str,
    value: FieldValue,
) -> Result<Option<DateTime<Utc>>, FieldError> {
    match value {
        FieldValue::Null => Ok(None),
        other => date(name, other).map(Some),
    }
}

/// Parse a closed-set text value, case-insensitively.
pub(crate) fn choice<T: std::str::FromStr>(name: &str, value: FieldValue) -> Result<T, FieldError> {
    text(name, value)?
        .parse()
        .map_err(|_| FieldError::kind_mismatch(name, FieldKind::Enum))
}

/// Declare a lowercase string enum with serde, `FromStr`, `Display` and `ALL`.
///
/// Every enum gets an `Unknown` variant that unrecognised stored text decodes
/// to. It is absent from `ALL` and `FromStr` never produces it.
macro_rules! field_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $($variant:ident => $wire:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant,)+
            #[serde(other)]
            Unknown,
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                    $name::Unknown => "unknown",
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::Unknown
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($wire => Ok($name::$variant),)+
                    other => Err(format!("unknown {}: {}", stringify!($name), other)),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<$name> for $crate::record::FieldValue {
            fn from(value: $name) -> Self {
                $crate::record::FieldValue::Text(value.as_str().to_string())
            }
        }
    };
}

pub(crate) use field_enum;
