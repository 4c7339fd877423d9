use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::fields;
use super::{MetricContext, Resource};
use crate::error::FieldError;
use crate::predicate::{RecordPredicate, StockLevel};
use crate::record::{FieldAccessorMap, FieldKind, FieldRef, FieldValue, Record};
use crate::stats::MetricSpec;

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sku: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub price: f64,
    /// Original price shown struck through
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_at_price: Option<f64>,
    #[serde(default)]
    pub stock: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// `price × stock`, the value of what is on the shelf.
    pub fn inventory_value(&self) -> f64 {
        self.price * f64::from(self.stock)
    }

    pub fn is_on_sale(&self) -> bool {
        self.compare_at_price.is_some_and(|was| was > self.price)
    }
}

impl Record for Product {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        let value = match name {
            "id" => self.id.as_str().into(),
            "name" => self.name.as_str().into(),
            "sku" => self.sku.as_str().into(),
            "description" => self.description.as_deref().into(),
            "category" => self.category.as_deref().into(),
            "price" => self.price.into(),
            "compareAtPrice" => self.compare_at_price.into(),
            "stock" => self.stock.into(),
            "rating" => self.rating.into(),
            "reviewCount" => self.review_count.into(),
            "isActive" => self.is_active.into(),
            "isFeatured" => self.is_featured.into(),
            "createdAt" => self.created_at.into(),
            "updatedAt" => self.updated_at.into(),
            _ => return None,
        };
        Some(value)
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), FieldError> {
        match name {
            "name" => self.name = fields::text(name, value)?,
            "sku" => self.sku = fields::text(name, value)?,
            "description" => self.description = fields::optional_text(name, value)?,
            "category" => self.category = fields::optional_text(name, value)?,
            "price" => self.price = fields::number(name, value)?,
            "compareAtPrice" => self.compare_at_price = fields::optional_number(name, value)?,
            "stock" => self.stock = fields::count(name, value)?,
            "rating" => self.rating = fields::optional_number(name, value)?,
            "reviewCount" => self.review_count = fields::count(name, value)?,
            "isActive" => self.is_active = fields::boolean(name, value)?,
            "isFeatured" => self.is_featured = fields::boolean(name, value)?,
            "createdAt" => self.created_at = fields::optional_date(name, value)?,
            "updatedAt" => self.updated_at = fields::optional_date(name, value)?,
            "id" => return Err(FieldError::ReadOnly(name.to_string())),
            _ => return Err(FieldError::UnknownField(name.to_string())),
        }
        Ok(())
    }

    /// Copies start hidden, with a marked name and no review history.
    fn reset_for_duplicate(&mut self) {
        self.name.push_str(" (Copy)");
        self.is_active = false;
        self.rating = None;
        self.review_count = 0;
    }
}

impl Resource for Product {
    const KIND: &'static str = "products";

    fn accessors() -> FieldAccessorMap<Self> {
        FieldAccessorMap::new()
            .field("id", FieldKind::Text, |p: &Product| p.id.as_str().into())
            .field("name", FieldKind::Text, |p: &Product| p.name.as_str().into())
            .field("sku", FieldKind::Text, |p: &Product| p.sku.as_str().into())
            .field("description", FieldKind::Text, |p: &Product| {
                p.description.as_deref().into()
            })
            .field("category", FieldKind::Enum, |p: &Product| {
                p.category.as_deref().into()
            })
            .field("price", FieldKind::Number, |p: &Product| p.price.into())
            .field("compareAtPrice", FieldKind::Number, |p: &Product| {
                p.compare_at_price.into()
            })
            .field("stock", FieldKind::Number, |p: &Product| p.stock.into())
            .field("rating", FieldKind::Number, |p: &Product| p.rating.into())
            .field("reviewCount", FieldKind::Number, |p: &Product| {
                p.review_count.into()
            })
            .field("isActive", FieldKind::Boolean, |p: &Product| p.is_active.into())
            .field("isFeatured", FieldKind::Boolean, |p: &Product| {
                p.is_featured.into()
            })
            .field("createdAt", FieldKind::Date, |p: &Product| p.created_at.into())
            .field("updatedAt", FieldKind::Date, |p: &Product| p.updated_at.into())
            .field("inventoryValue", FieldKind::Number, |p: &Product| {
                p.inventory_value().into()
            })
            .search_in(&["name", "sku", "description", "category"])
    }

    fn dashboard_metrics(context: &MetricContext) -> Vec<MetricSpec<Self>> {
        let threshold = context.low_stock_threshold;
        vec![
            MetricSpec::total("total"),
            MetricSpec::count("active", RecordPredicate::new(|p: &Product| p.is_active)),
            MetricSpec::count("featured", RecordPredicate::new(|p: &Product| p.is_featured)),
            MetricSpec::count(
                "outOfStock",
                RecordPredicate::new(move |p: &Product| {
                    StockLevel::OutOfStock.contains(f64::from(p.stock), threshold)
                }),
            ),
            MetricSpec::count(
                "lowStock",
                RecordPredicate::new(move |p: &Product| {
                    StockLevel::LowStock.contains(f64::from(p.stock), threshold)
                }),
            ),
            MetricSpec::sum(
                "inventoryValue",
                FieldRef::new("inventoryValue", FieldKind::Number, |p: &Product| {
                    p.inventory_value().into()
                }),
            ),
            MetricSpec::average(
                "averagePrice",
                FieldRef::new("price", FieldKind::Number, |p: &Product| p.price.into()),
            ),
            MetricSpec::distinct_count(
                "categories",
                FieldRef::new("category", FieldKind::Enum, |p: &Product| {
                    p.category.as_deref().into()
                }),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn product() -> Product {
        Product {
            id: "p1".into(),
            name: "Desk Lamp".into(),
            sku: "LMP-001".into(),
            description: None,
            category: Some("Lighting".into()),
            price: 40.0,
            compare_at_price: Some(55.0),
            stock: 3,
            rating: Some(4.5),
            review_count: 12,
            is_active: true,
            is_featured: false,
            created_at: Some(Utc.with_ymd_and_hms(2024, 1, 5, 9, 0, 0).unwrap()),
            updated_at: None,
        }
    }

    #[test]
    fn test_deserializes_camel_case_with_defaults() {
        let json = r#"{"id":"p9","name":"Mug","price":12.5,"createdAt":"2024-02-01T00:00:00Z"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.stock, 0);
        assert!(!product.is_active);
        assert!(product.category.is_none());
    }

    #[test]
    fn test_field_reads_mark_absent_optionals() {
        let product = product();
        assert_eq!(product.field("description"), Some(FieldValue::Null));
        assert_eq!(product.field("stock"), Some(FieldValue::Number(3.0)));
        assert_eq!(product.field("weight"), None);
    }

    #[test]
    fn test_set_field_validates_kind() {
        let mut product = product();
        assert!(product.set_field("stock", FieldValue::Number(2.5)).is_err());
        assert!(product.set_field("id", "x".into()).is_err());
        product.set_field("price", FieldValue::Number(35.0)).unwrap();
        assert_eq!(product.price, 35.0);
        product.set_field("compareAtPrice", FieldValue::Null).unwrap();
        assert!(!product.is_on_sale());
    }

    #[test]
    fn test_duplicate_reset() {
        let mut copy = product();
        copy.reset_for_duplicate();
        assert_eq!(copy.name, "Desk Lamp (Copy)");
        assert!(!copy.is_active);
        assert_eq!(copy.review_count, 0);
        assert!(copy.rating.is_none());
    }

    #[test]
    fn test_accessors_cover_record_fields() {
        let accessors = Product::accessors();
        let product = product();
        for field in accessors.fields().filter(|f| f.name() != "inventoryValue") {
            assert_eq!(Some(field.read(&product)), product.field(field.name()), "{}", field.name());
        }
        assert_eq!(accessors.searchable_fields().count(), 4);
    }
}
