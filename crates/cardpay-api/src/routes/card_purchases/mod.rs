//! Card purchase routes - table, search, backend filters, pagination, mark paid
//!
//! Structure:
//! - api.rs: JSON API and HTMX endpoints
//! - page.rs: Full page and fragment rendering

pub mod api;
pub mod page;

pub use api::{
    api_card_purchases,
    api_card_purchases_filters,
    htmx_apply_filters,
    htmx_card_purchases_list,
    htmx_clear_filters,
    htmx_mark_paid,
};

pub use page::page_card_purchases;
