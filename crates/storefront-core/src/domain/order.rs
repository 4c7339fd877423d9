use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::fields::{self, field_enum};
use super::{MetricContext, Resource};
use crate::error::FieldError;
use crate::predicate::RecordPredicate;
use crate::record::{FieldAccessorMap, FieldKind, FieldRef, FieldValue, Record};
use crate::stats::{Bucket, MetricSpec};

field_enum! {
    /// Fulfilment state of an order.
    pub enum OrderStatus {
        Pending => "pending",
        Confirmed => "confirmed",
        Processing => "processing",
        Shipped => "shipped",
        Delivered => "delivered",
        Cancelled => "cancelled",
    }
}

field_enum! {
    pub enum PaymentStatus {
        Pending => "pending",
        Paid => "paid",
        Failed => "failed",
        Refunded => "refunded",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// One order line; `price` is the unit price at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(default)]
    pub product_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    #[serde(default)]
    pub order_number: String,
    #[serde(default)]
    pub customer: Customer,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Units across all lines.
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Revenue this order contributes; cancelled orders contribute nothing.
    pub fn revenue(&self) -> f64 {
        if self.status == OrderStatus::Cancelled {
            0.0
        } else {
            self.total
        }
    }
}

impl Record for Order {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        let value = match name {
            "id" => self.id.as_str().into(),
            "orderNumber" => self.order_number.as_str().into(),
            "customer.name" => self.customer.name.as_str().into(),
            "customer.email" => self.customer.email.as_str().into(),
            "status" => self.status.into(),
            "paymentStatus" => self.payment_status.into(),
            "itemCount" => self.item_count().into(),
            "total" => self.total.into(),
            "createdAt" => self.created_at.into(),
            _ => return None,
        };
        Some(value)
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), FieldError> {
        match name {
            "orderNumber" => self.order_number = fields::text(name, value)?,
            "customer.name" => self.customer.name = fields::text(name, value)?,
            "customer.email" => self.customer.email = fields::text(name, value)?,
            "status" => self.status = fields::choice(name, value)?,
            "paymentStatus" => self.payment_status = fields::choice(name, value)?,
            "total" => self.total = fields::number(name, value)?,
            "createdAt" => self.created_at = fields::optional_date(name, value)?,
            "id" | "itemCount" => return Err(FieldError::ReadOnly(name.to_string())),
            _ => return Err(FieldError::UnknownField(name.to_string())),
        }
        Ok(())
    }
}

impl Resource for Order {
    const KIND: &'static str = "orders";

    fn accessors() -> FieldAccessorMap<Self> {
        FieldAccessorMap::new()
            .field("id", FieldKind::Text, |o: &Order| o.id.as_str().into())
            .field("orderNumber", FieldKind::Text, |o: &Order| {
                o.order_number.as_str().into()
            })
            .field("customer.name", FieldKind::Text, |o: &Order| {
                o.customer.name.as_str().into()
            })
            .field("customer.email", FieldKind::Text, |o: &Order| {
                o.customer.email.as_str().into()
            })
            .field("status", FieldKind::Enum, |o: &Order| o.status.into())
            .field("paymentStatus", FieldKind::Enum, |o: &Order| {
                o.payment_status.into()
            })
            .field("itemCount", FieldKind::Number, |o: &Order| o.item_count().into())
            .field("total", FieldKind::Number, |o: &Order| o.total.into())
            .field("createdAt", FieldKind::Date, |o: &Order| o.created_at.into())
            .search_in(&["orderNumber", "customer.name", "customer.email"])
    }

    fn dashboard_metrics(_context: &MetricContext) -> Vec<MetricSpec<Self>> {
        let status = FieldRef::new("status", FieldKind::Enum, |o: &Order| o.status.into());

        let mut metrics = vec![MetricSpec::total("total")];
        metrics.extend(OrderStatus::ALL.iter().map(|&wanted| {
            MetricSpec::count(
                wanted.as_str(),
                RecordPredicate::new(move |o: &Order| o.status == wanted),
            )
        }));
        metrics.push(MetricSpec::sum(
            "totalRevenue",
            FieldRef::new("revenue", FieldKind::Number, |o: &Order| o.revenue().into()),
        ));
        metrics.push(MetricSpec::average(
            "averageOrderValue",
            FieldRef::new("total", FieldKind::Number, |o: &Order| o.total.into()),
        ));
        metrics.push(MetricSpec::distribution(
            "statusDistribution",
            status,
            OrderStatus::ALL
                .iter()
                .map(|&s| Bucket::exact(s.as_str(), s))
                .collect(),
        ));
        metrics
    }
}
