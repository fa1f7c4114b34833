//! Comparator engine: turns a `SortSpec` into an ordering over records
//!
//! A record without a value for the sort column orders before every record
//! that has one; descending order inverts the whole comparison, so such
//! records end up last there.

use std::cmp::Ordering;

use crate::models::TransactionRecord;
use crate::types::{SortDirection, SortSpec};

/// Build the comparator for `spec`
pub fn comparator(spec: SortSpec) -> impl Fn(&TransactionRecord, &TransactionRecord) -> Ordering {
    move |a, b| {
        // Option orders None before Some
        let ordering = a.field(spec.key).cmp(&b.field(spec.key));
        match spec.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Stable sort: each record is decorated with its original position and
/// equal keys fall back to that position.
pub fn stable_sort<'a>(records: &'a [TransactionRecord], spec: SortSpec) -> Vec<&'a TransactionRecord> {
    let compare = comparator(spec);
    let mut decorated: Vec<(usize, &TransactionRecord)> = records.iter().enumerate().collect();
    decorated.sort_by(|(ia, a), (ib, b)| compare(*a, *b).then_with(|| ia.cmp(ib)));
    decorated.into_iter().map(|(_, record)| record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SortKey;
    use rust_decimal::Decimal;

    fn record(id: &str, name: Option<&str>, price: Option<i64>) -> TransactionRecord {
        let mut r = TransactionRecord::new(id);
        r.name = name.map(str::to_string);
        r.price = price.map(Decimal::from);
        r
    }

    fn ids(rows: &[&TransactionRecord]) -> Vec<String> {
        rows.iter().map(|r| r.transaction_id.clone()).collect()
    }

    #[test]
    fn test_ascending_and_descending_text() {
        let records = vec![
            record("B", None, None),
            record("A", None, None),
            record("C", None, None),
        ];

        let asc = stable_sort(&records, SortSpec::ascending(SortKey::TransactionId));
        assert_eq!(ids(&asc), vec!["A", "B", "C"]);

        let desc = stable_sort(&records, SortSpec::descending(SortKey::TransactionId));
        assert_eq!(ids(&desc), vec!["C", "B", "A"]);
    }

    #[test]
    fn test_numeric_not_lexicographic() {
        let records = vec![
            record("1", None, Some(100)),
            record("2", None, Some(25)),
            record("3", None, Some(5)),
        ];
        let asc = stable_sort(&records, SortSpec::ascending(SortKey::Price));
        assert_eq!(ids(&asc), vec!["3", "2", "1"]);
    }

    #[test]
    fn test_ties_keep_original_order() {
        let records = vec![
            record("x1", Some("Mary"), None),
            record("x2", Some("Ann"), None),
            record("x3", Some("Mary"), None),
            record("x4", Some("Ann"), None),
            record("x5", Some("Mary"), None),
        ];

        let asc = stable_sort(&records, SortSpec::ascending(SortKey::Name));
        assert_eq!(ids(&asc), vec!["x2", "x4", "x1", "x3", "x5"]);

        // Descending inverts the key order only; ties stay in input order
        let desc = stable_sort(&records, SortSpec::descending(SortKey::Name));
        assert_eq!(ids(&desc), vec!["x1", "x3", "x5", "x2", "x4"]);
    }

    #[test]
    fn test_missing_values_sort_first_ascending() {
        let records = vec![
            record("a", Some("Zed"), None),
            record("b", None, None),
            record("c", Some("Abe"), None),
            record("d", None, None),
        ];

        let asc = stable_sort(&records, SortSpec::ascending(SortKey::Name));
        assert_eq!(ids(&asc), vec!["b", "d", "c", "a"]);

        let desc = stable_sort(&records, SortSpec::descending(SortKey::Name));
        assert_eq!(ids(&desc), vec!["a", "c", "b", "d"]);
    }

    #[test]
    fn test_paid_false_before_true() {
        let mut paid = TransactionRecord::new("paid");
        paid.paid = true;
        let unpaid = TransactionRecord::new("unpaid");
        let records = vec![paid, unpaid];

        let asc = stable_sort(&records, SortSpec::ascending(SortKey::Paid));
        assert_eq!(ids(&asc), vec!["unpaid", "paid"]);
    }

    #[test]
    fn test_comparator_is_antisymmetric() {
        let a = record("A", None, Some(1));
        let b = record("B", None, Some(2));
        let cmp = comparator(SortSpec::ascending(SortKey::Price));
        assert_eq!(cmp(&a, &b), Ordering::Less);
        assert_eq!(cmp(&b, &a), Ordering::Greater);
        assert_eq!(cmp(&a, &a), Ordering::Equal);
    }
}
