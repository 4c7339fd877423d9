//! Stable, kind-aware record ordering.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::record::{FieldRef, FieldValue};

use super::descriptor::SortDirection;

/// Sort `records` in place by `field`. Ties keep their input order.
pub(crate) fn sort_records<R>(
    records: &mut [Arc<R>],
    field: &FieldRef<R>,
    direction: SortDirection,
) {
    // Decorate once so each record's field is read a single time.
    let mut keyed: Vec<(FieldValue, Arc<R>)> = records
        .iter()
        .map(|record| (field.resolved(record), Arc::clone(record)))
        .collect();

    // `sort_by` is stable; reversing the comparison keeps ties in input order.
    keyed.sort_by(|(a, _), (b, _)| match direction {
        SortDirection::Ascending => compare_values(a, b),
        SortDirection::Descending => compare_values(b, a),
    });

    for (slot, (_, record)) in records.iter_mut().zip(keyed) {
        *slot = record;
    }
}

/// Compare two resolved values of the same field.
///
/// Numbers compare numerically, dates by timestamp with empty dates first,
/// booleans false before true, text case-insensitively.
pub(crate) fn compare_values(a: &FieldValue, b: &FieldValue) -> Ordering {
    match (a, b) {
        (FieldValue::Number(x), FieldValue::Number(y)) => x.total_cmp(y),
        (FieldValue::Date(x), FieldValue::Date(y)) => x.cmp(y),
        (FieldValue::Bool(x), FieldValue::Bool(y)) => x.cmp(y),
        (FieldValue::Text(x), FieldValue::Text(y)) => compare_text(x, y),
        (FieldValue::Null, FieldValue::Null) => Ordering::Equal,
        (FieldValue::Null, _) => Ordering::Less,
        (_, FieldValue::Null) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

/// Case-folded code point order.
///
/// This stands in for locale-aware collation. It agrees with it on
/// unaccented letters; accented letters sort by code point rather than next
/// to their base letter.
fn compare_text(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldKind;
    use chrono::{TimeZone, Utc};

    #[derive(Debug)]
    struct Row {
        id: u8,
        name: &'static str,
        price: Option<f64>,
    }

    fn row(id: u8, name: &'static str, price: Option<f64>) -> Arc<Row> {
        Arc::new(Row { id, name, price })
    }

    fn rows() -> Vec<Arc<Row>> {
        vec![
            row(1, "banana", Some(3.0)),
            row(2, "Apple", Some(1.0)),
            row(3, "cherry", Some(3.0)),
            row(4, "apple", None),
        ]
    }

    fn ids(records: &[Arc<Row>]) -> Vec<u8> {
        records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_numeric_ascending_with_absent_as_zero() {
        let price = FieldRef::new("price", FieldKind::Number, |r: &Row| r.price.into());
        let mut records = rows();
        sort_records(&mut records, &price, SortDirection::Ascending);
        assert_eq!(ids(&records), vec![4, 2, 1, 3]);
    }

    #[test]
    fn test_descending_keeps_ties_in_input_order() {
        let price = FieldRef::new("price", FieldKind::Number, |r: &Row| r.price.into());
        let mut records = rows();
        sort_records(&mut records, &price, SortDirection::Descending);
        assert_eq!(ids(&records), vec![1, 3, 2, 4]);
    }

    #[test]
    fn test_text_is_case_insensitive_and_stable() {
        let name = FieldRef::new("name", FieldKind::Text, |r: &Row| r.name.into());
        let mut records = rows();
        sort_records(&mut records, &name, SortDirection::Ascending);
        // "Apple" and "apple" tie; input order wins.
        assert_eq!(ids(&records), vec![2, 4, 1, 3]);
    }

    #[test]
    fn test_empty_dates_sort_first() {
        let early = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            compare_values(&FieldValue::Null, &FieldValue::Date(early)),
            Ordering::Less
        );
        assert_eq!(
            compare_values(&FieldValue::Bool(false), &FieldValue::Bool(true)),
            Ordering::Less
        );
    }
}
