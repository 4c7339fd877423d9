//! Storefront record types and their list/dashboard presets.
//!
//! Each type is a serde model of one admin list (camelCase on the wire) that
//! implements [`Record`] and ships the accessor map, default sort and stat
//! cards its list view uses.

mod coupon;
mod fields;
mod order;
mod product;
mod review;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub use coupon::{Coupon, DiscountType};
pub use order::{Customer, Order, OrderItem, OrderStatus, PaymentStatus};
pub use product::Product;
pub use review::{Review, ReviewStatus, ReviewedProduct, Reviewer};

use crate::query::SortKey;
use crate::record::{FieldAccessorMap, Record};
use crate::stats::MetricSpec;

/// Default low-stock threshold for product dashboards.
pub const DEFAULT_LOW_STOCK_THRESHOLD: f64 = 10.0;

/// Inputs that dashboard metrics depend on but records do not carry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricContext {
    /// Reference time for expiry-style metrics
    pub now: DateTime<Utc>,
    pub low_stock_threshold: f64,
}

impl MetricContext {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now,
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
        }
    }

    pub fn with_low_stock_threshold(mut self, threshold: f64) -> Self {
        self.low_stock_threshold = threshold;
        self
    }
}

/// A record type backing one admin list.
pub trait Resource: Record + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Plural name, also the snapshot file stem (`products.json`).
    const KIND: &'static str;

    fn accessors() -> FieldAccessorMap<Self>;

    /// Sort applied when the caller does not pick one.
    fn default_sort() -> SortKey {
        SortKey::desc("createdAt")
    }

    /// Stat cards shown above the list.
    fn dashboard_metrics(context: &MetricContext) -> Vec<MetricSpec<Self>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_metric_context_defaults() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let context = MetricContext::new(now);
        assert_eq!(context.low_stock_threshold, DEFAULT_LOW_STOCK_THRESHOLD);
        assert_eq!(context.with_low_stock_threshold(3.0).low_stock_threshold, 3.0);
    }

    #[test]
    fn test_kinds_are_distinct() {
        let kinds = [Product::KIND, Order::KIND, Coupon::KIND, Review::KIND];
        assert_eq!(kinds, ["products", "orders", "coupons", "reviews"]);
    }
}
