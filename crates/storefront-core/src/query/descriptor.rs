//! Query descriptors: search, filters, sort and page window.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveTime, Utc};

use crate::error::StorefrontError;
use crate::predicate::{Condition, FieldFilter};

/// Default page size for admin tables.
pub const ADMIN_PAGE_SIZE: usize = 50;

/// Default page size for customer-facing grids.
pub const CUSTOMER_PAGE_SIZE: usize = 12;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// A sort field with direction, written `price` or `-createdAt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }

    pub fn is_descending(&self) -> bool {
        self.direction == SortDirection::Descending
    }
}

impl FromStr for SortKey {
    type Err = StorefrontError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        let (direction, field) = match value.strip_prefix('-') {
            Some(rest) => (SortDirection::Descending, rest),
            None => (
                SortDirection::Ascending,
                value.strip_prefix('+').unwrap_or(value),
            ),
        };
        let field = field.trim();
        if field.is_empty() {
            return Err(StorefrontError::InvalidInput(format!(
                "Invalid sort key: \"{}\"",
                value
            )));
        }
        Ok(Self {
            field: field.to_string(),
            direction,
        })
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_descending() {
            write!(f, "-{}", self.field)
        } else {
            f.write_str(&self.field)
        }
    }
}

/// A concrete timestamp window resolved by the caller from a relative
/// expression ("last 7 days", "today"). The engine never reads the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub since: DateTime<Utc>,
    pub until: DateTime<Utc>,
}

impl DateWindow {
    /// The `window` ending at `now`.
    pub fn last(window: Duration, now: DateTime<Utc>) -> Self {
        Self {
            since: now - window,
            until: now,
        }
    }

    /// The UTC calendar day containing `now`.
    pub fn day_of(now: DateTime<Utc>) -> Self {
        let start = now.date_naive().and_time(NaiveTime::MIN).and_utc();
        Self {
            since: start,
            until: start + Duration::days(1) - Duration::milliseconds(1),
        }
    }

    pub fn filter(&self, field: impl Into<String>) -> FieldFilter {
        FieldFilter::new(
            field,
            Condition::DateRange {
                since: Some(self.since),
                until: Some(self.until),
            },
        )
    }
}

/// Everything a list view asks of the engine.
///
/// Every dimension is optional: no search text, no filters and no sort key
/// means the full collection in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryDescriptor {
    /// Case-insensitive substring over the searchable fields
    pub search_text: Option<String>,

    /// Filters, combined with AND
    pub filters: Vec<FieldFilter>,

    /// Sort field and direction
    pub sort: Option<SortKey>,

    /// 1-based page number, clamped after filtering
    pub page: usize,

    /// Items per page
    pub page_size: usize,
}

impl Default for QueryDescriptor {
    fn default() -> Self {
        Self {
            search_text: None,
            filters: Vec::new(),
            sort: None,
            page: 1,
            page_size: ADMIN_PAGE_SIZE,
        }
    }
}

impl QueryDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search_text = Some(text.into());
        self
    }

    pub fn filter(mut self, filter: FieldFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn sort(mut self, key: SortKey) -> Self {
        self.sort = Some(key);
        self
    }

    pub fn page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Drop search text and filters and return to the first page.
    /// Sort and page size survive, matching a "clear filters" control.
    pub fn clear_filters(mut self) -> Self {
        self.search_text = None;
        self.filters.clear();
        self.page = 1;
        self
    }
}
