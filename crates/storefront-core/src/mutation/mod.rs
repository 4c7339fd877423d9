//! Optimistic, pure mutations over a record collection.
//!
//! `apply` never touches its input. It returns a new [`Collection`] that
//! shares every untouched record with the input, or the input handle itself
//! when the mutation changed nothing.

mod ids;

use std::fmt;
use std::sync::Arc;

pub use ids::{IdGenerator, SequentialIds, UuidIds};

use crate::diagnostics::{self, report, Diagnostic};
use crate::error::FieldError;
use crate::record::{Collection, FieldKind, FieldValue, Record};

/// Draws a duplicate may take before giving up on a clashing generator.
const MAX_ID_ATTEMPTS: usize = 8;

/// A single change to a collection.
pub enum Mutation<R> {
    /// Flip a boolean field; an absent boolean becomes `true`
    ToggleBooleanField { id: String, field: String },
    /// Write a field value
    UpdateField {
        id: String,
        field: String,
        value: FieldValue,
    },
    /// Drop the record with this id
    Remove { id: String },
    /// Empty the collection
    RemoveAll,
    /// Append a copy of a record under an id not already in the collection
    Duplicate {
        id: String,
        ids: Arc<dyn IdGenerator>,
    },
    /// Append a new record; an id already in the collection is a no-op
    Append(R),
}

impl<R> Mutation<R> {
    pub fn toggle(id: impl Into<String>, field: impl Into<String>) -> Self {
        Mutation::ToggleBooleanField {
            id: id.into(),
            field: field.into(),
        }
    }

    pub fn update(
        id: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Self {
        Mutation::UpdateField {
            id: id.into(),
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn remove(id: impl Into<String>) -> Self {
        Mutation::Remove { id: id.into() }
    }

    pub fn duplicate(id: impl Into<String>, ids: Arc<dyn IdGenerator>) -> Self {
        Mutation::Duplicate {
            id: id.into(),
            ids,
        }
    }

    pub fn append(record: R) -> Self {
        Mutation::Append(record)
    }

    /// Short name used in logs and CLI output.
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::ToggleBooleanField { .. } => "toggle",
            Mutation::UpdateField { .. } => "update",
            Mutation::Remove { .. } => "remove",
            Mutation::RemoveAll => "remove_all",
            Mutation::Duplicate { .. } => "duplicate",
            Mutation::Append(_) => "append",
        }
    }
}

impl<R: fmt::Debug> fmt::Debug for Mutation<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mutation::ToggleBooleanField { id, field } => f
                .debug_struct("ToggleBooleanField")
                .field("id", id)
                .field("field", field)
                .finish(),
            Mutation::UpdateField { id, field, value } => f
                .debug_struct("UpdateField")
                .field("id", id)
                .field("field", field)
                .field("value", value)
                .finish(),
            Mutation::Remove { id } => f.debug_struct("Remove").field("id", id).finish(),
            Mutation::RemoveAll => f.write_str("RemoveAll"),
            Mutation::Duplicate { id, .. } => {
                f.debug_struct("Duplicate").field("id", id).finish_non_exhaustive()
            }
            Mutation::Append(record) => f.debug_tuple("Append").field(record).finish(),
        }
    }
}

/// Apply `mutation` to `records`, logging diagnostics only.
pub fn apply<R: Record>(records: &Collection<R>, mutation: Mutation<R>) -> Collection<R> {
    apply_with(records, mutation, &mut diagnostics::ignore)
}

/// Apply `mutation` to `records`, forwarding diagnostics to `sink`.
pub fn apply_with<R: Record>(
    records: &Collection<R>,
    mutation: Mutation<R>,
    sink: &mut dyn FnMut(&Diagnostic),
) -> Collection<R> {
    tracing::debug!(mutation = mutation.name(), records = records.len(), "applying mutation");

    match mutation {
        Mutation::ToggleBooleanField { id, field } => {
            replace_record(records, &id, sink, |record| {
                let next = match record.field(&field) {
                    None => return Err(FieldError::UnknownField(field.clone())),
                    Some(FieldValue::Null) => true,
                    Some(FieldValue::Bool(current)) => !current,
                    Some(_) => return Err(FieldError::kind_mismatch(&field, FieldKind::Boolean)),
                };
                record.set_field(&field, FieldValue::Bool(next))?;
                Ok(true)
            })
        }
        Mutation::UpdateField { id, field, value } => {
            replace_record(records, &id, sink, |record| {
                match record.field(&field) {
                    None => return Err(FieldError::UnknownField(field.clone())),
                    Some(current) if current == value => return Ok(false),
                    Some(_) => {}
                }
                record.set_field(&field, value)?;
                Ok(true)
            })
        }
        Mutation::Remove { id } => match records.position(&id) {
            Some(index) => Collection::from_shared(
                records
                    .records()
                    .iter()
                    .enumerate()
                    .filter(|(position, _)| *position != index)
                    .map(|(_, record)| Arc::clone(record))
                    .collect(),
            ),
            None => not_found(records, id, sink),
        },
        Mutation::RemoveAll => {
            if records.is_empty() {
                records.clone()
            } else {
                Collection::empty()
            }
        }
        Mutation::Duplicate { id, ids } => {
            let Some(source) = records.find(&id) else {
                return not_found(records, id, sink);
            };
            let Some(fresh) = fresh_id(records, &*ids, sink) else {
                return records.clone();
            };
            let mut copy = R::clone(source);
            copy.set_id(fresh);
            copy.reset_for_duplicate();
            appended(records, copy)
        }
        Mutation::Append(record) => {
            if records.position(record.id()).is_some() {
                report(
                    sink,
                    Diagnostic::DuplicateId {
                        id: record.id().to_string(),
                    },
                );
                return records.clone();
            }
            appended(records, record)
        }
    }
}

/// Clone-edit-replace one record. `edit` returns `Ok(false)` when nothing changed.
fn replace_record<R: Record>(
    records: &Collection<R>,
    id: &str,
    sink: &mut dyn FnMut(&Diagnostic),
    edit: impl FnOnce(&mut R) -> Result<bool, FieldError>,
) -> Collection<R> {
    let Some(index) = records.position(id) else {
        return not_found(records, id.to_string(), sink);
    };

    let mut updated = R::clone(&records.records()[index]);
    match edit(&mut updated) {
        Ok(true) => {}
        Ok(false) => return records.clone(),
        Err(err) => {
            report(
                sink,
                Diagnostic::FieldRejected {
                    id: id.to_string(),
                    reason: err.to_string(),
                },
            );
            return records.clone();
        }
    }

    let mut items = records.records().to_vec();
    items[index] = Arc::new(updated);
    Collection::from_shared(items)
}

/// Draw ids until one is unused, reporting the last clash if none is.
fn fresh_id<R: Record>(
    records: &Collection<R>,
    ids: &dyn IdGenerator,
    sink: &mut dyn FnMut(&Diagnostic),
) -> Option<String> {
    let mut last = String::new();
    for _ in 0..MAX_ID_ATTEMPTS {
        let candidate = ids.next_id();
        if records.position(&candidate).is_none() {
            return Some(candidate);
        }
        tracing::debug!(id = %candidate, "generated id already taken, drawing again");
        last = candidate;
    }
    report(sink, Diagnostic::DuplicateId { id: last });
    None
}

fn appended<R>(records: &Collection<R>, record: R) -> Collection<R> {
    let mut items = Vec::with_capacity(records.len() + 1);
    items.extend(records.records().iter().cloned());
    items.push(Arc::new(record));
    Collection::from_shared(items)
}

fn not_found<R>(
    records: &Collection<R>,
    id: String,
    sink: &mut dyn FnMut(&Diagnostic),
) -> Collection<R> {
    report(sink, Diagnostic::RecordNotFound { id });
    records.clone()
}
