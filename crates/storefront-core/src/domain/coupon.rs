use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::fields::{self, field_enum};
use super::{MetricContext, Resource};
use crate::error::FieldError;
use crate::predicate::RecordPredicate;
use crate::record::{FieldAccessorMap, FieldKind, FieldRef, FieldValue, Record};
use crate::stats::MetricSpec;

field_enum! {
    pub enum DiscountType {
        Percentage => "percentage",
        Fixed => "fixed",
    }
}

/// A discount code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub id: String,
    #[serde(default)]
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub discount_type: DiscountType,
    #[serde(default)]
    pub discount_value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_purchase: Option<f64>,
    /// `None` means unlimited redemptions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_limit: Option<u32>,
    #[serde(default)]
    pub used_count: u32,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Coupon {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at < now)
    }

    pub fn is_exhausted(&self) -> bool {
        self.usage_limit.is_some_and(|limit| self.used_count >= limit)
    }

    /// Discount on a cart subtotal, zero below the minimum purchase.
    pub fn discount_for(&self, subtotal: f64) -> f64 {
        if self.min_purchase.is_some_and(|min| subtotal < min) {
            return 0.0;
        }
        match self.discount_type {
            DiscountType::Percentage => subtotal * self.discount_value / 100.0,
            DiscountType::Fixed => self.discount_value.min(subtotal),
            DiscountType::Unknown => 0.0,
        }
    }
}

impl Record for Coupon {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        let value = match name {
            "id" => self.id.as_str().into(),
            "code" => self.code.as_str().into(),
            "description" => self.description.as_deref().into(),
            "discountType" => self.discount_type.into(),
            "discountValue" => self.discount_value.into(),
            "minPurchase" => self.min_purchase.into(),
            "usageLimit" => self.usage_limit.into(),
            "usedCount" => self.used_count.into(),
            "isActive" => self.is_active.into(),
            "expiresAt" => self.expires_at.into(),
            "createdAt" => self.created_at.into(),
            _ => return None,
        };
        Some(value)
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), FieldError> {
        match name {
            "code" => self.code = fields::text(name, value)?,
            "description" => self.description = fields::optional_text(name, value)?,
            "discountType" => self.discount_type = fields::choice(name, value)?,
            "discountValue" => self.discount_value = fields::number(name, value)?,
            "minPurchase" => self.min_purchase = fields::optional_number(name, value)?,
            "usageLimit" => self.usage_limit = fields::optional_count(name, value)?,
            "usedCount" => self.used_count = fields::count(name, value)?,
            "isActive" => self.is_active = fields::boolean(name, value)?,
            "expiresAt" => self.expires_at = fields::optional_date(name, value)?,
            "createdAt" => self.created_at = fields::optional_date(name, value)?,
            "id" => return Err(FieldError::ReadOnly(name.to_string())),
            _ => return Err(FieldError::UnknownField(name.to_string())),
        }
        Ok(())
    }

    fn reset_for_duplicate(&mut self) {
        self.code.push_str("-COPY");
        self.used_count = 0;
    }
}

impl Resource for Coupon {
    const KIND: &'static str = "coupons";

    fn accessors() -> FieldAccessorMap<Self> {
        FieldAccessorMap::new()
            .record_field("id", FieldKind::Text)
            .record_field("code", FieldKind::Text)
            .record_field("description", FieldKind::Text)
            .record_field("discountType", FieldKind::Enum)
            .record_field("discountValue", FieldKind::Number)
            .record_field("minPurchase", FieldKind::Number)
            .record_field("usageLimit", FieldKind::Number)
            .record_field("usedCount", FieldKind::Number)
            .record_field("isActive", FieldKind::Boolean)
            .record_field("expiresAt", FieldKind::Date)
            .record_field("createdAt", FieldKind::Date)
            .search_in(&["code", "description"])
    }

    fn dashboard_metrics(context: &MetricContext) -> Vec<MetricSpec<Self>> {
        let now = context.now;
        vec![
            MetricSpec::total("total"),
            MetricSpec::count("active", RecordPredicate::new(|c: &Coupon| c.is_active)),
            MetricSpec::count(
                "expired",
                RecordPredicate::new(move |c: &Coupon| c.is_expired(now)),
            ),
            MetricSpec::sum(
                "totalUsage",
                FieldRef::new("usedCount", FieldKind::Number, |c: &Coupon| {
                    c.used_count.into()
                }),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn coupon() -> Coupon {
        Coupon {
            id: "c1".into(),
            code: "SPRING10".into(),
            description: Some("Spring sale".into()),
            discount_type: DiscountType::Percentage,
            discount_value: 10.0,
            min_purchase: Some(50.0),
            usage_limit: Some(100),
            used_count: 42,
            is_active: true,
            expires_at: Some(Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap()),
            created_at: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
        }
    }

    #[test]
    fn test_expiry_is_relative_to_now() {
        let coupon = coupon();
        assert!(!coupon.is_expired(Utc.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap()));
        assert!(coupon.is_expired(Utc.with_ymd_and_hms(2024, 4, 2, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_discount_for_subtotal() {
        let mut coupon = coupon();
        assert_eq!(coupon.discount_for(40.0), 0.0);
        assert_eq!(coupon.discount_for(80.0), 8.0);
        coupon.discount_type = DiscountType::Fixed;
        coupon.min_purchase = None;
        assert_eq!(coupon.discount_for(5.0), 5.0);
    }

    #[test]
    fn test_duplicate_resets_usage() {
        let mut copy = coupon();
        copy.reset_for_duplicate();
        assert_eq!(copy.code, "SPRING10-COPY");
        assert_eq!(copy.used_count, 0);
    }

    #[test]
    fn test_accessors_read_through_record() {
        let accessors = Coupon::accessors();
        let coupon = coupon();
        assert_eq!(
            accessors.get("discountType").unwrap().read(&coupon),
            FieldValue::Text("percentage".into())
        );
        assert_eq!(accessors.kind("usageLimit"), Some(FieldKind::Number));
        assert!(!coupon.is_exhausted());
    }
}
