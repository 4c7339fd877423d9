//! Record conventions shared by the query engine, the stats reducer and the
//! mutation applier.
//!
//! - **value**: typed field values, field kinds and default resolution
//! - **accessor**: per-type field catalogs the engine reads through
//! - **collection**: shared snapshots with cheap "same reference" checks

mod accessor;
mod collection;
mod value;

pub use accessor::{FieldAccessorMap, FieldRef};
pub use collection::Collection;
pub use value::{parse_timestamp, FieldKind, FieldValue};

use crate::error::FieldError;

/// A domain record with a stable string id and named, typed fields.
///
/// Reads for filtering and sorting go through a [`FieldAccessorMap`]; this
/// trait is the write side used by the mutation applier.
pub trait Record: Clone {
    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    /// Read a field by name.
    ///
    /// Returns `None` for a name the type does not have and `Some(Null)` for
    /// a known field that is absent on this record.
    fn field(&self, name: &str) -> Option<FieldValue>;

    /// Replace a field's value. `Null` clears optional fields.
    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), FieldError>;

    /// Reset type-specific fields on a freshly duplicated copy (usage counters etc).
    fn reset_for_duplicate(&mut self) {}
}
