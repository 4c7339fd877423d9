use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::fields::{self, field_enum};
use super::{MetricContext, Resource};
use crate::error::FieldError;
use crate::predicate::RecordPredicate;
use crate::record::{FieldAccessorMap, FieldKind, FieldRef, FieldValue, Record};
use crate::stats::{Bucket, MetricSpec};

field_enum! {
    /// Moderation state.
    pub enum ReviewStatus {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reviewer {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewedProduct {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// A customer review awaiting or past moderation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    /// 1 to 5 stars
    #[serde(default)]
    pub rating: u8,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub status: ReviewStatus,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub helpful_count: u32,
    #[serde(default)]
    pub user: Reviewer,
    #[serde(default)]
    pub product: ReviewedProduct,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Record for Review {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        let value = match name {
            "id" => self.id.as_str().into(),
            "rating" => f64::from(self.rating).into(),
            "title" => self.title.as_str().into(),
            "comment" => self.comment.as_str().into(),
            "status" => self.status.into(),
            "isVerified" => self.is_verified.into(),
            "helpfulCount" => self.helpful_count.into(),
            "user.name" => self.user.name.as_str().into(),
            "user.email" => self.user.email.as_str().into(),
            "product.id" => self.product.id.as_str().into(),
            "product.name" => self.product.name.as_str().into(),
            "createdAt" => self.created_at.into(),
            _ => return None,
        };
        Some(value)
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), FieldError> {
        match name {
            "rating" => {
                let stars = fields::count(name, value)?;
                if !(1..=5).contains(&stars) {
                    return Err(FieldError::kind_mismatch(name, FieldKind::Number));
                }
                self.rating = stars as u8;
            }
            "title" => self.title = fields::text(name, value)?,
            "comment" => self.comment = fields::text(name, value)?,
            "status" => self.status = fields::choice(name, value)?,
            "isVerified" => self.is_verified = fields::boolean(name, value)?,
            "helpfulCount" => self.helpful_count = fields::count(name, value)?,
            "createdAt" => self.created_at = fields::optional_date(name, value)?,
            "id" | "user.name" | "user.email" | "product.id" | "product.name" => {
                return Err(FieldError::ReadOnly(name.to_string()))
            }
            _ => return Err(FieldError::UnknownField(name.to_string())),
        }
        Ok(())
    }

    fn reset_for_duplicate(&mut self) {
        self.status = ReviewStatus::Pending;
        self.helpful_count = 0;
    }
}

impl Resource for Review {
    const KIND: &'static str = "reviews";

    fn accessors() -> FieldAccessorMap<Self> {
        FieldAccessorMap::new()
            .record_field("id", FieldKind::Text)
            .record_field("rating", FieldKind::Number)
            .record_field("title", FieldKind::Text)
            .record_field("comment", FieldKind::Text)
            .record_field("status", FieldKind::Enum)
            .record_field("isVerified", FieldKind::Boolean)
            .record_field("helpfulCount", FieldKind::Number)
            .record_field("user.name", FieldKind::Text)
            .record_field("user.email", FieldKind::Text)
            .record_field("product.id", FieldKind::Text)
            .record_field("product.name", FieldKind::Text)
            .record_field("createdAt", FieldKind::Date)
            .search_in(&["title", "comment", "user.name", "product.name"])
    }

    fn dashboard_metrics(_context: &MetricContext) -> Vec<MetricSpec<Self>> {
        let rating = FieldRef::new("rating", FieldKind::Number, |r: &Review| {
            f64::from(r.rating).into()
        });
        vec![
            MetricSpec::total("total"),
            MetricSpec::average("averageRating", rating.clone()),
            MetricSpec::count("verified", RecordPredicate::new(|r: &Review| r.is_verified)),
            MetricSpec::count(
                "pending",
                RecordPredicate::new(|r: &Review| r.status == ReviewStatus::Pending),
            ),
            MetricSpec::distribution(
                "ratingDistribution",
                rating,
                (1..=5u8)
                    .rev()
                    .map(|stars| Bucket::exact(stars.to_string(), f64::from(stars)))
                    .collect(),
            ),
        ]
    }
}
