//! List query engine: filter, sort and paginate a record collection.
//!
//! ```ignore
//! let query = QueryDescriptor::new()
//!     .filter(FieldFilter::equals("status", "active"))
//!     .sort("-createdAt".parse()?)
//!     .page(2);
//! let result = evaluate(&products, &query, &Product::accessors());
//! ```

mod descriptor;
mod page;
mod sort;

use std::sync::Arc;

use serde::{Serialize, Serializer};

pub use descriptor::{
    DateWindow, QueryDescriptor, SortDirection, SortKey, ADMIN_PAGE_SIZE, CUSTOMER_PAGE_SIZE,
};

use crate::diagnostics::{self, Diagnostic};
use crate::predicate::{bind, search_matches, search_needle, BindError, Condition};
use crate::record::{Collection, FieldAccessorMap, FieldKind, FieldRef};

use page::compute_page_window;
use sort::sort_records;

/// The visible page of a list view plus match counts.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult<R> {
    /// Records on the requested (clamped) page, in sorted order
    pub visible_items: Vec<Arc<R>>,

    /// Records that passed search and filters, before pagination
    pub total_matched: usize,

    /// `ceil(total_matched / page_size)`, at least 1
    pub total_pages: usize,

    /// Effective page after clamping
    pub page: usize,

    /// Effective page size
    pub page_size: usize,
}

impl<R> QueryResult<R> {
    pub fn is_empty(&self) -> bool {
        self.visible_items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.visible_items.iter().map(|record| record.as_ref())
    }
}

impl<R: Serialize> Serialize for QueryResult<R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let items: Vec<&R> = self.iter().collect();
        let mut state = serializer.serialize_struct("QueryResult", 5)?;
        state.serialize_field("visibleItems", &items)?;
        state.serialize_field("totalMatched", &self.total_matched)?;
        state.serialize_field("totalPages", &self.total_pages)?;
        state.serialize_field("page", &self.page)?;
        state.serialize_field("pageSize", &self.page_size)?;
        state.end()
    }
}

/// Evaluate `query` against `records`.
///
/// Pure and deterministic. Unknown filter or sort fields are ignored (see
/// [`Diagnostic`]); an unknown or missing sort key keeps input order.
pub fn evaluate<R>(
    records: &Collection<R>,
    query: &QueryDescriptor,
    accessors: &FieldAccessorMap<R>,
) -> QueryResult<R> {
    evaluate_with(records, query, accessors, &mut diagnostics::ignore)
}

/// [`evaluate`], delivering diagnostics to `sink` as well as the log.
pub fn evaluate_with<R>(
    records: &Collection<R>,
    query: &QueryDescriptor,
    accessors: &FieldAccessorMap<R>,
    sink: &mut dyn FnMut(&Diagnostic),
) -> QueryResult<R> {
    let predicates = compile_filters(query, accessors, sink);
    let search = compile_search(query, accessors, sink);

    let passes = |record: &R| -> bool {
        predicates
            .iter()
            .all(|(field, condition)| condition.matches(&field.read(record), field.kind()))
            && match &search {
                Some((needle, fields)) => search_matches(record, needle, fields),
                None => true,
            }
    };

    let mut matched: Vec<Arc<R>> = records
        .records()
        .iter()
        .filter(|record| passes(record))
        .cloned()
        .collect();

    if let Some(key) = &query.sort {
        match accessors.get(&key.field) {
            Some(field) => sort_records(&mut matched, field, key.direction),
            None => diagnostics::report(
                sink,
                Diagnostic::UnknownSortField {
                    field: key.field.clone(),
                },
            ),
        }
    }

    let total_matched = matched.len();
    let window = compute_page_window(total_matched, query.page, query.page_size);
    let visible_items = matched.drain(window.range).collect();

    QueryResult {
        visible_items,
        total_matched,
        total_pages: window.total_pages,
        page: window.page,
        page_size: window.page_size,
    }
}

type BoundFilter<'a, R> = (&'a FieldRef<R>, &'a Condition);

fn compile_filters<'a, R>(
    query: &'a QueryDescriptor,
    accessors: &'a FieldAccessorMap<R>,
    sink: &mut dyn FnMut(&Diagnostic),
) -> Vec<BoundFilter<'a, R>> {
    let mut bound = Vec::with_capacity(query.filters.len());
    for filter in &query.filters {
        match bind(filter, accessors) {
            Ok(field) => bound.push((field, &filter.condition)),
            Err(BindError::UnknownField) => diagnostics::report(
                sink,
                Diagnostic::UnknownFilterField {
                    field: filter.field.clone(),
                },
            ),
            Err(BindError::KindMismatch(kind)) => {
                diagnostics::report(sink, kind_mismatch(&filter.field, kind, &filter.condition))
            }
        }
    }
    bound
}

fn compile_search<'a, R>(
    query: &QueryDescriptor,
    accessors: &'a FieldAccessorMap<R>,
    sink: &mut dyn FnMut(&Diagnostic),
) -> Option<(String, Vec<&'a FieldRef<R>>)> {
    let needle = search_needle(query.search_text.as_deref())?;
    if !accessors.has_searchable_fields() {
        diagnostics::report(sink, Diagnostic::NoSearchableFields);
        return None;
    }
    Some((needle, accessors.searchable_fields().collect()))
}

fn kind_mismatch(field: &str, kind: FieldKind, condition: &Condition) -> Diagnostic {
    Diagnostic::FilterKindMismatch {
        field: field.to_string(),
        kind,
        condition: condition.name(),
    }
}
