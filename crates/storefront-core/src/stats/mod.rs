//! Aggregate statistics over a full record collection.
//!
//! Stats never look at a filtered or paginated view: the caller passes the
//! same collection the list engine received, and every metric is computed
//! independently in a single pass.

mod metric;

use std::collections::BTreeSet;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

pub use metric::{Bucket, BucketMatch, MetricSpec};

use crate::record::{Collection, FieldKind, FieldValue};

/// Count and share of one distribution bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketCount {
    pub label: String,
    pub count: usize,
    /// Share of the whole collection, 0–100
    pub percentage: f64,
}

/// Value of one computed metric.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Scalar(f64),
    Distribution(Vec<BucketCount>),
}

impl Serialize for MetricValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MetricValue::Scalar(value) => serializer.serialize_f64(*value),
            MetricValue::Distribution(buckets) => buckets.serialize(serializer),
        }
    }
}

/// Computed metrics in declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AggregateStats {
    metrics: Vec<(String, MetricValue)>,
}

impl AggregateStats {
    pub fn get(&self, name: &str) -> Option<&MetricValue> {
        self.metrics
            .iter()
            .find(|(metric, _)| metric == name)
            .map(|(_, value)| value)
    }

    pub fn scalar(&self, name: &str) -> Option<f64> {
        match self.get(name)? {
            MetricValue::Scalar(value) => Some(*value),
            MetricValue::Distribution(_) => None,
        }
    }

    pub fn distribution(&self, name: &str) -> Option<&[BucketCount]> {
        match self.get(name)? {
            MetricValue::Distribution(buckets) => Some(buckets),
            MetricValue::Scalar(_) => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetricValue)> {
        self.metrics
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

impl Serialize for AggregateStats {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.metrics.len()))?;
        for (name, value) in &self.metrics {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

enum Accumulator {
    Count(usize),
    Sum(f64),
    Distinct(BTreeSet<String>),
    Buckets(Vec<usize>),
}

impl Accumulator {
    fn for_spec<R>(spec: &MetricSpec<R>) -> Self {
        match spec {
            MetricSpec::Count { .. } => Accumulator::Count(0),
            MetricSpec::Sum { .. } | MetricSpec::Average { .. } => Accumulator::Sum(0.0),
            MetricSpec::DistinctCount { .. } => Accumulator::Distinct(BTreeSet::new()),
            MetricSpec::Distribution { buckets, .. } => {
                Accumulator::Buckets(vec![0; buckets.len()])
            }
        }
    }

    fn observe<R>(&mut self, spec: &MetricSpec<R>, record: &R) {
        match (self, spec) {
            (Accumulator::Count(count), MetricSpec::Count { predicate, .. }) => {
                if predicate.test(record) {
                    *count += 1;
                }
            }
            (Accumulator::Sum(sum), MetricSpec::Sum { field, .. })
            | (Accumulator::Sum(sum), MetricSpec::Average { field, .. }) => {
                *sum += field.number(record);
            }
            (Accumulator::Distinct(seen), MetricSpec::DistinctCount { field, .. }) => {
                if let Some(key) = distinct_key(&field.read(record), field.kind()) {
                    seen.insert(key);
                }
            }
            (Accumulator::Buckets(counts), MetricSpec::Distribution { field, buckets, .. }) => {
                let value = field.read(record);
                if let Some(index) = buckets.iter().position(|b| b.accepts(field, &value)) {
                    counts[index] += 1;
                }
            }
            _ => {}
        }
    }

    fn finish<R>(self, spec: &MetricSpec<R>, total: usize) -> MetricValue {
        match (self, spec) {
            (Accumulator::Count(count), _) => MetricValue::Scalar(count as f64),
            (Accumulator::Sum(sum), MetricSpec::Average { .. }) => {
                MetricValue::Scalar(if total == 0 { 0.0 } else { sum / total as f64 })
            }
            (Accumulator::Sum(sum), _) => MetricValue::Scalar(sum),
            (Accumulator::Distinct(seen), _) => MetricValue::Scalar(seen.len() as f64),
            (Accumulator::Buckets(counts), MetricSpec::Distribution { buckets, .. }) => {
                MetricValue::Distribution(
                    buckets
                        .iter()
                        .zip(counts)
                        .map(|(bucket, count)| BucketCount {
                            label: bucket.label.clone(),
                            count,
                            percentage: percentage(count, total),
                        })
                        .collect(),
                )
            }
            (Accumulator::Buckets(_), _) => MetricValue::Distribution(Vec::new()),
        }
    }
}

fn distinct_key(value: &FieldValue, kind: FieldKind) -> Option<String> {
    match value {
        FieldValue::Null => None,
        FieldValue::Text(text) if kind == FieldKind::Enum => Some(text.to_lowercase()),
        other => Some(other.to_string()),
    }
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Compute every metric in `specs` over the full `records` collection.
pub fn reduce<R>(records: &Collection<R>, specs: &[MetricSpec<R>]) -> AggregateStats {
    let mut accumulators: Vec<Accumulator> = specs.iter().map(Accumulator::for_spec).collect();

    for record in records.iter() {
        for (accumulator, spec) in accumulators.iter_mut().zip(specs) {
            accumulator.observe(spec, record);
        }
    }

    let total = records.len();
    let metrics = accumulators
        .into_iter()
        .zip(specs)
        .map(|(accumulator, spec)| (spec.name().to_string(), accumulator.finish(spec, total)))
        .collect();

    AggregateStats { metrics }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::RecordPredicate;
    use crate::record::FieldRef;

    #[derive(Debug, Clone)]
    struct Review {
        rating: Option<f64>,
        verified: bool,
        author: &'static str,
    }

    fn review(rating: f64, verified: bool, author: &'static str) -> Review {
        Review {
            rating: Some(rating),
            verified,
            author,
        }
    }

    fn rating() -> FieldRef<Review> {
        FieldRef::new("rating", FieldKind::Number, |r: &Review| r.rating.into())
    }

    fn author() -> FieldRef<Review> {
        FieldRef::new("author", FieldKind::Enum, |r: &Review| r.author.into())
    }

    fn star_buckets() -> Vec<Bucket> {
        (1..=5)
            .rev()
            .map(|stars| Bucket::exact(format!("{}", stars), f64::from(stars)))
            .collect()
    }

    fn specs() -> Vec<MetricSpec<Review>> {
        vec![
            MetricSpec::total("total"),
            MetricSpec::count("verified", RecordPredicate::new(|r: &Review| r.verified)),
            MetricSpec::sum("ratingSum", rating()),
            MetricSpec::average("averageRating", rating()),
            MetricSpec::distinct_count("authors", author()),
            MetricSpec::distribution("ratings", rating(), star_buckets()),
        ]
    }

    #[test]
    fn test_empty_collection_yields_zeros() {
        let stats = reduce(&Collection::empty(), &specs());
        assert_eq!(stats.scalar("total"), Some(0.0));
        assert_eq!(stats.scalar("ratingSum"), Some(0.0));
        assert_eq!(stats.scalar("averageRating"), Some(0.0));
        let buckets = stats.distribution("ratings").unwrap();
        assert_eq!(buckets.len(), 5);
        assert!(buckets.iter().all(|b| b.count == 0 && b.percentage == 0.0));
    }

    #[test]
    fn test_metrics_over_reviews() {
        let records = Collection::new(vec![
            review(5.0, true, "Ana"),
            review(4.0, false, "ana"),
            review(5.0, true, "Bo"),
            Review {
                rating: None,
                verified: false,
                author: "Cy",
            },
        ]);
        let stats = reduce(&records, &specs());

        assert_eq!(stats.scalar("total"), Some(4.0));
        assert_eq!(stats.scalar("verified"), Some(2.0));
        assert_eq!(stats.scalar("ratingSum"), Some(14.0));
        assert_eq!(stats.scalar("averageRating"), Some(3.5));
        assert_eq!(stats.scalar("authors"), Some(3.0));

        let buckets = stats.distribution("ratings").unwrap();
        let labels: Vec<&str> = buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["5", "4", "3", "2", "1"]);
        assert_eq!(buckets[0].count, 2);
        assert_eq!(buckets[0].percentage, 50.0);
        assert_eq!(buckets[1].count, 1);
        assert_eq!(buckets[4].count, 0);
    }

    #[test]
    fn test_range_buckets_are_half_open() {
        let records = Collection::new(vec![review(1.0, false, "a"), review(2.0, false, "b")]);
        let specs = vec![MetricSpec::distribution(
            "band",
            rating(),
            vec![Bucket::range("low", 0.0, 2.0), Bucket::range("high", 2.0, 6.0)],
        )];
        let stats = reduce(&records, &specs);
        let buckets = stats.distribution("band").unwrap();
        assert_eq!(buckets[0].count, 1);
        assert_eq!(buckets[1].count, 1);
    }

    #[test]
    fn test_wrong_accessor_for_metric_shape() {
        let stats = reduce(&Collection::new(vec![review(3.0, true, "a")]), &specs());
        assert!(stats.distribution("total").is_none());
        assert!(stats.scalar("ratings").is_none());
        assert!(stats.get("missing").is_none());
    }

    #[test]
    fn test_serializes_in_declaration_order() {
        let stats = reduce(&Collection::new(vec![review(3.0, true, "a")]), &specs());
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.starts_with("{\"total\":1.0,\"verified\":1.0"));
        assert!(json.contains("\"ratings\":[{\"label\":\"5\",\"count\":0"));
    }
}
