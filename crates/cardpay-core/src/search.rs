//! Local search over transaction ids

use crate::models::TransactionRecord;

/// Records whose transaction id contains `query`, ignoring case.
///
/// Results keep the order of `records`. An empty query matches everything.
pub fn search_transactions<'a>(records: &'a [TransactionRecord], query: &str) -> Vec<&'a TransactionRecord> {
    if query.is_empty() {
        return records.iter().collect();
    }

    let query_lower = query.to_lowercase();
    records
        .iter()
        .filter(|r| r.transaction_id.to_lowercase().contains(&query_lower))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(ids: &[&str]) -> Vec<TransactionRecord> {
        ids.iter().map(|id| TransactionRecord::new(*id)).collect()
    }

    fn ids(rows: Vec<&TransactionRecord>) -> Vec<&str> {
        rows.into_iter().map(|r| r.transaction_id.as_str()).collect()
    }

    #[test]
    fn test_case_insensitive_substring() {
        let records = records(&["tx-ABC-1", "tx-xyz-2", "TX-abc-3"]);
        assert_eq!(ids(search_transactions(&records, "abc")), vec!["tx-ABC-1", "TX-abc-3"]);
        assert_eq!(ids(search_transactions(&records, "Z-2")), vec!["tx-xyz-2"]);
    }

    #[test]
    fn test_substring_not_prefix() {
        let records = records(&["RMT-0042", "RMT-4200"]);
        assert_eq!(ids(search_transactions(&records, "42")), vec!["RMT-0042", "RMT-4200"]);
        assert_eq!(ids(search_transactions(&records, "0042")), vec!["RMT-0042"]);
    }

    #[test]
    fn test_empty_query_returns_all_in_order() {
        let records = records(&["C", "A", "B"]);
        assert_eq!(ids(search_transactions(&records, "")), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_no_match() {
        let records = records(&["A", "B"]);
        assert!(search_transactions(&records, "zzz").is_empty());
    }
}
