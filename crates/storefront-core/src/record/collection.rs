//! Shared, immutable record snapshots.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::Record;

/// An ordered snapshot of records.
///
/// Cloning shares the underlying storage, so a clone is the "same reference"
/// as the original and [`Collection::ptr_eq`] holds between them. Records are
/// individually reference-counted; derived collections reuse the `Arc` of
/// every record they leave untouched.
pub struct Collection<R> {
    items: Arc<Vec<Arc<R>>>,
}

impl<R> Collection<R> {
    pub fn new(records: Vec<R>) -> Self {
        Self::from_shared(records.into_iter().map(Arc::new).collect())
    }

    pub fn from_shared(items: Vec<Arc<R>>) -> Self {
        Self {
            items: Arc::new(items),
        }
    }

    pub fn empty() -> Self {
        Self::from_shared(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn records(&self) -> &[Arc<R>] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.items.iter().map(|record| record.as_ref())
    }

    /// Whether both handles point at the same snapshot.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.items, &other.items)
    }
}

impl<R: Record> Collection<R> {
    pub fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|record| record.id() == id)
    }

    pub fn find(&self, id: &str) -> Option<&Arc<R>> {
        self.items.iter().find(|record| record.id() == id)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.items.iter().map(|record| record.id()).collect()
    }
}

impl<R: Clone> Collection<R> {
    pub fn to_vec(&self) -> Vec<R> {
        self.iter().cloned().collect()
    }
}

impl<R> Clone for Collection<R> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
        }
    }
}

impl<R> Default for Collection<R> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<R> FromIterator<R> for Collection<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<R: fmt::Debug> fmt::Debug for Collection<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<R: PartialEq> PartialEq for Collection<R> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.iter().eq(other.iter())
    }
}

impl<R: Serialize> Serialize for Collection<R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de, R: Deserialize<'de>> Deserialize<'de> for Collection<R> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<R>::deserialize(deserializer).map(Collection::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_is_same_snapshot() {
        let a = Collection::new(vec![1, 2, 3]);
        let b = a.clone();
        assert!(a.ptr_eq(&b));
        assert!(Arc::ptr_eq(&a.records()[0], &b.records()[0]));
    }

    #[test]
    fn test_equal_content_is_not_same_snapshot() {
        let a = Collection::new(vec![1, 2, 3]);
        let b: Collection<i32> = vec![1, 2, 3].into_iter().collect();
        assert!(!a.ptr_eq(&b));
        assert_eq!(a, b);
    }

    #[test]
    fn test_serde_as_plain_array() {
        let a: Collection<u8> = serde_json::from_str("[1,2]").unwrap();
        assert_eq!(a.len(), 2);
        assert_eq!(serde_json::to_string(&a).unwrap(), "[1,2]");
    }
}
