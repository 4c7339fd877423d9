//! # Storefront Core
//!
//! Client-side list pipeline for the storefront admin and shop views.
//!
//! Every list screen (products, orders, coupons, reviews) runs the same three
//! pure operations over an in-memory snapshot of records:
//!
//! - **query**: filter, search, stable sort and paginate ([`query::evaluate`])
//! - **stats**: dashboard metrics over the full collection ([`stats::reduce`])
//! - **mutation**: optimistic edits that return a new snapshot ([`mutation::apply`])
//!
//! Supporting modules:
//!
//! - **record**: field values, accessor maps and shared collections
//! - **predicate**: filter conditions and record predicates
//! - **domain**: the storefront record types and their presets
//! - **snapshot**: JSON snapshot files
//! - **diagnostics**: non-fatal conditions reported by the pipeline

pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod mutation;
pub mod predicate;
pub mod query;
pub mod record;
pub mod snapshot;
pub mod stats;

pub use diagnostics::Diagnostic;
pub use error::{FieldError, Result, StorefrontError};
pub use mutation::{apply, apply_with, IdGenerator, Mutation, SequentialIds, UuidIds};
pub use predicate::{Condition, FieldFilter, RecordPredicate, StockLevel};
pub use query::{evaluate, evaluate_with, QueryDescriptor, QueryResult, SortDirection, SortKey};
pub use record::{Collection, FieldAccessorMap, FieldKind, FieldRef, FieldValue, Record};
pub use stats::{reduce, AggregateStats, Bucket, MetricSpec, MetricValue};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
