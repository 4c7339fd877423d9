//! Metric specifications for dashboard stat cards.

use crate::predicate::RecordPredicate;
use crate::record::{FieldRef, FieldValue};

/// One bucket of a distribution metric.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub label: String,
    pub matcher: BucketMatch,
}

/// How a value is assigned to a bucket.
#[derive(Debug, Clone, PartialEq)]
pub enum BucketMatch {
    /// Value equals this one (enum fields ignore case)
    Exact(FieldValue),
    /// Numeric value in `[min, max)`
    Range { min: f64, max: f64 },
}

impl Bucket {
    pub fn exact(label: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            label: label.into(),
            matcher: BucketMatch::Exact(value.into()),
        }
    }

    pub fn range(label: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            label: label.into(),
            matcher: BucketMatch::Range { min, max },
        }
    }

    pub(crate) fn accepts<R>(&self, field: &FieldRef<R>, value: &FieldValue) -> bool {
        match &self.matcher {
            BucketMatch::Exact(expected) => value.matches(expected, field.kind()),
            BucketMatch::Range { min, max } => value
                .as_number()
                .is_some_and(|n| n >= *min && n < *max),
        }
    }
}

/// A named metric computed over a full collection.
#[derive(Debug, Clone)]
pub enum MetricSpec<R> {
    /// Number of records satisfying the predicate
    Count {
        name: String,
        predicate: RecordPredicate<R>,
    },
    /// Sum of a numeric field; absent values count as 0
    Sum { name: String, field: FieldRef<R> },
    /// Mean of a numeric field over all records; 0 for an empty collection
    Average { name: String, field: FieldRef<R> },
    /// Number of distinct present values of a field
    DistinctCount { name: String, field: FieldRef<R> },
    /// Count and share per declared bucket, zero buckets included
    Distribution {
        name: String,
        field: FieldRef<R>,
        buckets: Vec<Bucket>,
    },
}

impl<R> MetricSpec<R> {
    pub fn count(name: impl Into<String>, predicate: RecordPredicate<R>) -> Self {
        MetricSpec::Count {
            name: name.into(),
            predicate,
        }
    }

    pub fn sum(name: impl Into<String>, field: FieldRef<R>) -> Self {
        MetricSpec::Sum {
            name: name.into(),
            field,
        }
    }

    pub fn average(name: impl Into<String>, field: FieldRef<R>) -> Self {
        MetricSpec::Average {
            name: name.into(),
            field,
        }
    }

    pub fn distinct_count(name: impl Into<String>, field: FieldRef<R>) -> Self {
        MetricSpec::DistinctCount {
            name: name.into(),
            field,
        }
    }

    pub fn distribution(name: impl Into<String>, field: FieldRef<R>, buckets: Vec<Bucket>) -> Self {
        MetricSpec::Distribution {
            name: name.into(),
            field,
            buckets,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            MetricSpec::Count { name, .. }
            | MetricSpec::Sum { name, .. }
            | MetricSpec::Average { name, .. }
            | MetricSpec::DistinctCount { name, .. }
            | MetricSpec::Distribution { name, .. } => name,
        }
    }
}

impl<R: 'static> MetricSpec<R> {
    /// Count of every record in the collection.
    pub fn total(name: impl Into<String>) -> Self {
        Self::count(name, RecordPredicate::new(|_: &R| true))
    }
}
