//! Table and plain-text rendering for records and metrics.

use chrono::{DateTime, Utc};
use storefront_core::domain::{Coupon, Order, Product, Review};
use storefront_core::stats::BucketCount;
use storefront_core::{AggregateStats, MetricValue};

use crate::ui::format::single_line;
use crate::ui::{
    format_datetime, format_money, format_number, short_id, truncate, Column, UiContext,
};

/// How one record type is laid out as a table row.
pub trait Listing {
    fn columns() -> &'static [Column];

    fn row(&self, ctx: &UiContext) -> Vec<String>;
}

/// Rows for a page of records.
pub fn render_listing<'a, R: Listing + 'a>(
    ctx: &UiContext,
    records: impl Iterator<Item = &'a R>,
) -> Vec<Vec<String>> {
    records.map(|record| record.row(ctx)).collect()
}

fn display_id(ctx: &UiContext, id: &str) -> String {
    if ctx.mode.is_pretty() {
        short_id(id)
    } else {
        id.to_string()
    }
}

fn text_cell(ctx: &UiContext, value: &str, max_len: usize) -> String {
    let value = single_line(value);
    if ctx.mode.is_pretty() {
        truncate(&value, max_len)
    } else {
        value
    }
}

fn flag(ctx: &UiContext, value: bool) -> String {
    match (ctx.mode.is_pretty(), value) {
        (true, true) => "yes".to_string(),
        (true, false) => "-".to_string(),
        (false, value) => value.to_string(),
    }
}

impl Listing for Product {
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::new("ID"),
            Column::new("NAME"),
            Column::new("SKU"),
            Column::new("CATEGORY"),
            Column::numeric("PRICE"),
            Column::numeric("STOCK"),
            Column::new("ACTIVE"),
            Column::new("CREATED"),
        ];
        COLUMNS
    }

    fn row(&self, ctx: &UiContext) -> Vec<String> {
        vec![
            display_id(ctx, &self.id),
            text_cell(ctx, &self.name, 32),
            self.sku.clone(),
            self.category.clone().unwrap_or_default(),
            format_money(self.price),
            self.stock.to_string(),
            flag(ctx, self.is_active),
            date_cell(ctx, self.created_at),
        ]
    }
}

impl Listing for Order {
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::new("ID"),
            Column::new("ORDER"),
            Column::new("CUSTOMER"),
            Column::new("STATUS"),
            Column::new("PAYMENT"),
            Column::numeric("ITEMS"),
            Column::numeric("TOTAL"),
            Column::new("CREATED"),
        ];
        COLUMNS
    }

    fn row(&self, ctx: &UiContext) -> Vec<String> {
        vec![
            display_id(ctx, &self.id),
            self.order_number.clone(),
            text_cell(ctx, &self.customer.name, 24),
            self.status.to_string(),
            self.payment_status.to_string(),
            self.item_count().to_string(),
            format_money(self.total),
            date_cell(ctx, self.created_at),
        ]
    }
}

impl Listing for Coupon {
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::new("ID"),
            Column::new("CODE"),
            Column::new("TYPE"),
            Column::numeric("VALUE"),
            Column::numeric("USED"),
            Column::new("ACTIVE"),
            Column::new("EXPIRES"),
        ];
        COLUMNS
    }

    fn row(&self, ctx: &UiContext) -> Vec<String> {
        let used = match self.usage_limit {
            Some(limit) => format!("{}/{}", self.used_count, limit),
            None => self.used_count.to_string(),
        };
        vec![
            display_id(ctx, &self.id),
            self.code.clone(),
            self.discount_type.to_string(),
            format_number(self.discount_value),
            used,
            flag(ctx, self.is_active),
            date_cell(ctx, self.expires_at),
        ]
    }
}

impl Listing for Review {
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::new("ID"),
            Column::numeric("RATING"),
            Column::new("TITLE"),
            Column::new("PRODUCT"),
            Column::new("AUTHOR"),
            Column::new("STATUS"),
            Column::new("VERIFIED"),
            Column::new("CREATED"),
        ];
        COLUMNS
    }

    fn row(&self, ctx: &UiContext) -> Vec<String> {
        vec![
            display_id(ctx, &self.id),
            self.rating.to_string(),
            text_cell(ctx, &self.title, 32),
            text_cell(ctx, &self.product.name, 24),
            text_cell(ctx, &self.user.name, 20),
            self.status.to_string(),
            flag(ctx, self.is_verified),
            date_cell(ctx, self.created_at),
        ]
    }
}

/// Key/value rows for a stats block. Distributions expand to one row per
/// bucket, labelled `metric.bucket`.
pub fn metric_rows(stats: &AggregateStats) -> Vec<(String, String)> {
    let mut rows = Vec::new();
    for (name, value) in stats.iter() {
        match value {
            MetricValue::Scalar(number) => rows.push((name.to_string(), format_number(*number))),
            MetricValue::Distribution(buckets) => {
                for bucket in buckets {
                    rows.push((format!("{}.{}", name, bucket.label), bucket_cell(bucket)));
                }
            }
        }
    }
    rows
}

fn date_cell(ctx: &UiContext, at: Option<DateTime<Utc>>) -> String {
    at.map(|at| format_datetime(&at, ctx.timezone, ctx.mode.is_pretty()))
        .unwrap_or_default()
}

fn bucket_cell(bucket: &BucketCount) -> String {
    format!("{} ({:.1}%)", bucket.count, bucket.percentage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::OutputMode;
    use storefront_core::{reduce, Bucket, Collection, FieldKind, FieldRef, MetricSpec};

    fn plain() -> UiContext {
        UiContext {
            color: false,
            unicode: false,
            width: 80,
            mode: OutputMode::Plain,
            timezone: None,
        }
    }

    fn product() -> Product {
        serde_json::from_value(serde_json::json!({
            "id": "p1",
            "name": "Ghost Pepper Sauce",
            "sku": "GP-01",
            "category": "sauces",
            "price": 12.5,
            "stock": 3,
            "reviewCount": 0,
            "isActive": true,
            "isFeatured": false,
            "createdAt": "2024-03-01T10:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn test_plain_product_row() {
        let row = product().row(&plain());
        assert_eq!(row.len(), Product::columns().len());
        assert_eq!(row[0], "p1");
        assert_eq!(row[4], "12.50");
        assert_eq!(row[6], "true");
        assert_eq!(row[7], "2024-03-01T10:00:00+00:00");
    }

    #[test]
    fn test_missing_created_at_leaves_date_blank() {
        let mut product = product();
        product.created_at = None;
        let row = product.row(&plain());
        assert_eq!(row[7], "");
    }

    #[test]
    fn test_metric_rows_expand_distributions() {
        let products: Collection<Product> = vec![product()].into_iter().collect();
        let price = FieldRef::new("price", FieldKind::Number, |p: &Product| p.price.into());
        let specs = vec![
            MetricSpec::total("total"),
            MetricSpec::distribution(
                "priceBands",
                price,
                vec![Bucket::range("under10", 0.0, 10.0), Bucket::range("10plus", 10.0, f64::MAX)],
            ),
        ];
        let rows = metric_rows(&reduce(&products, &specs));
        assert_eq!(rows[0], ("total".to_string(), "1".to_string()));
        assert_eq!(
            rows[1],
            ("priceBands.under10".to_string(), "0 (0.0%)".to_string())
        );
        assert_eq!(
            rows[2],
            ("priceBands.10plus".to_string(), "1 (100.0%)".to_string())
        );
    }
}
