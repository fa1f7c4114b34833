//! View projector: sort, search and paginate a record collection into the
//! rows the table shows.

use serde::Serialize;

use crate::comparator::stable_sort;
use crate::models::TransactionRecord;
use crate::search::search_transactions;
use crate::types::{PageSpec, SortSpec};

/// Result of projecting a record collection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection<'a> {
    /// Rows inside the pagination window
    pub rows: Vec<&'a TransactionRecord>,
    /// No record survived sorting and searching, independent of the page
    pub is_empty_result: bool,
    /// Blank rows that keep a partially filled page at full height
    pub padding_rows: usize,
    /// Row count before pagination
    pub total_count: usize,
}

/// Project `records` into the visible window.
///
/// With a non-empty `query` the sorted order is dropped and matches come
/// back in fetch order. A page past the end yields no rows without
/// reporting an empty result.
pub fn project<'a>(
    records: &'a [TransactionRecord],
    sort: SortSpec,
    query: &str,
    page: PageSpec,
) -> Projection<'a> {
    let sorted = stable_sort(records, sort);

    let filtered = if query.is_empty() {
        sorted
    } else {
        search_transactions(records, query)
    };

    let total_count = filtered.len();
    let start = page.offset().min(total_count);
    let end = start.saturating_add(page.page_size).min(total_count);
    let rows = filtered[start..end].to_vec();

    Projection {
        rows,
        is_empty_result: total_count == 0,
        padding_rows: padding_rows(page, total_count),
        total_count,
    }
}

/// `max(0, (page_index + 1) * page_size - total)` past the first page, else 0
pub fn padding_rows(page: PageSpec, total_count: usize) -> usize {
    if page.page_index == 0 {
        return 0;
    }
    page.page_index
        .saturating_add(1)
        .saturating_mul(page.page_size)
        .saturating_sub(total_count)
}
