//! Non-fatal conditions reported by the list pipeline.
//!
//! Nothing in the pipeline raises: unknown keys and missing records degrade
//! to a no-op for that dimension. Each condition is logged with `tracing` and,
//! when the caller passes a sink to one of the `*_with` entry points,
//! delivered to it as well.

use std::fmt;

use serde::Serialize;

use crate::record::FieldKind;

/// A recoverable condition observed while evaluating or applying.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Sort field is not in the accessor map; insertion order was kept
    UnknownSortField { field: String },

    /// Filter field is not in the accessor map; the filter was ignored
    UnknownFilterField { field: String },

    /// Filter condition does not apply to the field's kind; the filter was ignored
    FilterKindMismatch {
        field: String,
        kind: FieldKind,
        condition: &'static str,
    },

    /// Search text was given but the record type has no searchable fields
    NoSearchableFields,

    /// Mutation target id is not in the collection
    RecordNotFound { id: String },

    /// Record refused a field write (unknown field, wrong kind, read-only)
    FieldRejected { id: String, reason: String },

    /// Appended or duplicated record would reuse an id already present
    DuplicateId { id: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnknownSortField { field } => {
                write!(f, "unknown sort field \"{}\", keeping input order", field)
            }
            Diagnostic::UnknownFilterField { field } => {
                write!(f, "unknown filter field \"{}\", filter ignored", field)
            }
            Diagnostic::FilterKindMismatch {
                field,
                kind,
                condition,
            } => write!(
                f,
                "{} filter does not apply to {} field \"{}\", filter ignored",
                condition, kind, field
            ),
            Diagnostic::NoSearchableFields => {
                write!(f, "no searchable fields, search text ignored")
            }
            Diagnostic::RecordNotFound { id } => write!(f, "record \"{}\" not found", id),
            Diagnostic::FieldRejected { id, reason } => {
                write!(f, "record \"{}\" rejected write: {}", id, reason)
            }
            Diagnostic::DuplicateId { id } => write!(f, "id \"{}\" is already taken", id),
        }
    }
}

/// Log a diagnostic and forward it to the caller's sink.
pub(crate) fn report(sink: &mut dyn FnMut(&Diagnostic), diagnostic: Diagnostic) {
    tracing::warn!(%diagnostic, "list pipeline diagnostic");
    sink(&diagnostic);
}

/// Sink for callers that only want the log line.
pub(crate) fn ignore(_: &Diagnostic) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_field() {
        let d = Diagnostic::UnknownSortField {
            field: "weight".to_string(),
        };
        assert!(d.to_string().contains("weight"));
    }

    #[test]
    fn test_report_reaches_sink() {
        let mut seen = Vec::new();
        report(&mut |d: &Diagnostic| seen.push(d.clone()), Diagnostic::NoSearchableFields);
        assert_eq!(seen, vec![Diagnostic::NoSearchableFields]);
    }

    #[test]
    fn test_serializes_with_type_tag() {
        let d = Diagnostic::RecordNotFound {
            id: "p-9".to_string(),
        };
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["type"], "record_not_found");
        assert_eq!(json["id"], "p-9");
    }

    #[test]
    fn test_kind_mismatch_keeps_field_kind_separate_from_tag() {
        let d = Diagnostic::FilterKindMismatch {
            field: "name".to_string(),
            kind: FieldKind::Text,
            condition: "range",
        };
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["type"], "filter_kind_mismatch");
        assert_eq!(json["kind"], serde_json::to_value(FieldKind::Text).unwrap());
        assert_eq!(json["condition"], "range");
    }
}
