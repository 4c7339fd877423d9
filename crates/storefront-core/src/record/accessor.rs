//! Field accessor maps: how the engine reads a record type.

use std::fmt;
use std::sync::Arc;

use super::value::{FieldKind, FieldValue};
use super::Record;

type Getter<R> = Arc<dyn Fn(&R) -> FieldValue + Send + Sync>;

/// A named, typed handle for reading one field from a record.
pub struct FieldRef<R> {
    name: String,
    kind: FieldKind,
    getter: Getter<R>,
}

impl<R> FieldRef<R> {
    pub fn new(
        name: impl Into<String>,
        kind: FieldKind,
        getter: impl Fn(&R) -> FieldValue + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            getter: Arc::new(getter),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Read the raw value; absent fields come back as `Null`.
    pub fn read(&self, record: &R) -> FieldValue {
        (self.getter)(record)
    }

    /// Read the value with the kind's empty default substituted for `Null`.
    pub fn resolved(&self, record: &R) -> FieldValue {
        self.read(record).resolve(self.kind)
    }

    /// Read as a number, treating absent or non-numeric values as 0.
    pub fn number(&self, record: &R) -> f64 {
        self.resolved(record).as_number().unwrap_or(0.0)
    }
}

impl<R> Clone for FieldRef<R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            kind: self.kind,
            getter: Arc::clone(&self.getter),
        }
    }
}

impl<R> fmt::Debug for FieldRef<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRef")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Per-record-type catalog of readable fields and the searchable subset.
///
/// The engine only ever reads records through this map, which keeps it
/// independent of the concrete record type.
pub struct FieldAccessorMap<R> {
    fields: Vec<FieldRef<R>>,
    searchable: Vec<usize>,
}

impl<R> FieldAccessorMap<R> {
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            searchable: Vec::new(),
        }
    }

    /// Register a field read through a closure. Re-registering a name replaces it.
    pub fn field(
        mut self,
        name: impl Into<String>,
        kind: FieldKind,
        getter: impl Fn(&R) -> FieldValue + Send + Sync + 'static,
    ) -> Self {
        let field = FieldRef::new(name, kind, getter);
        match self.position(field.name()) {
            Some(index) => self.fields[index] = field,
            None => self.fields.push(field),
        }
        self
    }

    /// Mark already-registered text fields as searchable, in the given order.
    ///
    /// Names that are not registered text fields are ignored.
    pub fn search_in(mut self, names: &[&str]) -> Self {
        for name in names {
            if let Some(index) = self.position(name) {
                if self.fields[index].kind().is_textual() && !self.searchable.contains(&index) {
                    self.searchable.push(index);
                }
            }
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldRef<R>> {
        self.position(name).map(|index| &self.fields[index])
    }

    pub fn kind(&self, name: &str) -> Option<FieldKind> {
        self.get(name).map(FieldRef::kind)
    }

    /// Owned handle for use in metric specs.
    pub fn field_ref(&self, name: &str) -> Option<FieldRef<R>> {
        self.get(name).cloned()
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldRef<R>> {
        self.fields.iter()
    }

    pub fn searchable_fields(&self) -> impl Iterator<Item = &FieldRef<R>> {
        self.searchable.iter().map(|&index| &self.fields[index])
    }

    pub fn has_searchable_fields(&self) -> bool {
        !self.searchable.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name() == name)
    }
}

impl<R: Record + 'static> FieldAccessorMap<R> {
    /// Register a field read through [`Record::field`].
    pub fn record_field(self, name: &str, kind: FieldKind) -> Self {
        let key = name.to_string();
        self.field(name, kind, move |record: &R| {
            record.field(&key).unwrap_or_default()
        })
    }
}

impl<R> Default for FieldAccessorMap<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Clone for FieldAccessorMap<R> {
    fn clone(&self) -> Self {
        Self {
            fields: self.fields.clone(),
            searchable: self.searchable.clone(),
        }
    }
}

impl<R> fmt::Debug for FieldAccessorMap<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.fields.iter().map(FieldRef::name).collect();
        f.debug_struct("FieldAccessorMap")
            .field("fields", &names)
            .field("searchable", &self.searchable)
            .finish()
    }
}
