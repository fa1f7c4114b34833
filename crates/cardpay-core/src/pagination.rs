//! Pagination state for the card purchases table

use cardpay_config::PaginationConfig;
use serde::{Deserialize, Serialize};

use crate::projector::padding_rows;
use crate::types::PageSpec;

/// Current page and page size. Out-of-range requests are clamped, never
/// rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationState {
    page: PageSpec,
    page_sizes: Vec<usize>,
    default_page_size: usize,
}

impl PaginationState {
    pub fn new(config: &PaginationConfig) -> Self {
        Self {
            page: PageSpec::new(0, config.default_page_size),
            page_sizes: config.page_sizes.clone(),
            default_page_size: config.default_page_size,
        }
    }

    pub fn spec(&self) -> PageSpec {
        self.page
    }

    pub fn page_index(&self) -> usize {
        self.page.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page.page_size
    }

    /// Sizes offered by the rows-per-page selector
    pub fn page_sizes(&self) -> &[usize] {
        &self.page_sizes
    }

    /// Change the page size and go back to the first page. Sizes outside
    /// the allowed set fall back to the default size.
    pub fn set_page_size(&mut self, page_size: usize) {
        let page_size = if self.page_sizes.contains(&page_size) {
            page_size
        } else {
            log::warn!(
                target: "cardpay::pagination",
                "page size {} not in {:?}, using {}",
                page_size,
                self.page_sizes,
                self.default_page_size
            );
            self.default_page_size
        };
        self.page = PageSpec::new(0, page_size);
    }

    /// Move to `page_index`, clamped to the last page for `total_rows`.
    /// Returns the page actually selected.
    pub fn set_page(&mut self, page_index: usize, total_rows: usize) -> usize {
        let last = self.last_page_index(total_rows);
        if page_index > last {
            log::debug!(
                target: "cardpay::pagination",
                "page {} out of range for {} rows, clamped to {}",
                page_index,
                total_rows,
                last
            );
        }
        self.page.page_index = page_index.min(last);
        self.page.page_index
    }

    /// Pull the page index back inside the range after the row count changed
    pub fn clamp_to(&mut self, total_rows: usize) {
        let last = self.last_page_index(total_rows);
        if self.page.page_index > last {
            self.page.page_index = last;
        }
    }

    /// `ceil(total_rows / page_size) - 1`, or 0 when there are no rows
    pub fn last_page_index(&self, total_rows: usize) -> usize {
        if total_rows == 0 || self.page.page_size == 0 {
            0
        } else {
            (total_rows - 1) / self.page.page_size
        }
    }

    pub fn page_count(&self, total_rows: usize) -> usize {
        if total_rows == 0 {
            0
        } else {
            self.last_page_index(total_rows) + 1
        }
    }

    pub fn padding_rows(&self, total_rows: usize) -> usize {
        padding_rows(self.page, total_rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> PaginationState {
        PaginationState::new(&PaginationConfig::default())
    }

    #[test]
    fn test_defaults() {
        let state = state();
        assert_eq!(state.spec(), PageSpec::new(0, 5));
        assert_eq!(state.page_sizes(), &[5, 10, 25]);
    }

    #[test]
    fn test_set_page_size_resets_index() {
        let mut state = state();
        state.set_page(3, 100);
        assert_eq!(state.page_index(), 3);

        state.set_page_size(10);
        assert_eq!(state.spec(), PageSpec::new(0, 10));
    }

    #[test]
    fn test_unknown_page_size_falls_back_to_default() {
        let mut state = state();
        state.set_page_size(25);
        state.set_page(1, 60);
        state.set_page_size(7);
        assert_eq!(state.spec(), PageSpec::new(0, 5));
    }

    #[test]
    fn test_set_page_clamps() {
        let mut state = state();
        assert_eq!(state.set_page(1, 7), 1);
        assert_eq!(state.set_page(2, 7), 1);
        assert_eq!(state.set_page(5, 0), 0);
        assert_eq!(state.set_page(2, 10), 1);
        assert_eq!(state.set_page(2, 11), 2);
    }

    #[test]
    fn test_clamp_after_collection_shrinks() {
        let mut state = state();
        state.set_page(4, 25);
        state.clamp_to(12);
        assert_eq!(state.page_index(), 2);
        state.clamp_to(0);
        assert_eq!(state.page_index(), 0);
    }

    #[test]
    fn test_page_count() {
        let state = state();
        assert_eq!(state.page_count(0), 0);
        assert_eq!(state.page_count(5), 1);
        assert_eq!(state.page_count(6), 2);
    }

    #[test]
    fn test_padding_rows() {
        let mut state = state();
        state.set_page(1, 7);
        assert_eq!(state.padding_rows(7), 3);

        state.set_page(0, 7);
        assert_eq!(state.padding_rows(7), 0);
    }
}
