//! Card purchases API endpoints - JSON API and HTMX partial responses
//!
//! Endpoints:
//! - api_card_purchases: Current table projection (JSON)
//! - api_card_purchases_filters: Filter panel choices (JSON)
//! - htmx_card_purchases_list: Table fragment after sort/search/page changes
//! - htmx_apply_filters: Apply backend filters and refetch
//! - htmx_clear_filters: Clear backend filters and refetch
//! - htmx_mark_paid: Mark a commission as paid and refetch

use crate::{ApiError, ApiResult, AppState};
use axum::extract::{Form, Path, Query};
use axum::response::Html;
use axum::Json;
use cardpay_core::{
    mark_paid, run_fetch, CardPurchasesPage, FilterDimension, FilterOption, FilterSelection,
    PageView, SortDirection, SortKey, SortSpec,
};
use std::collections::HashMap;

use super::page::render_content;

/// Apply the table query parameters to the page.
///
/// - `orderBy` alone toggles like a header click; with `order` it sets the
///   direction explicitly
/// - `q` replaces the transaction id search, verbatim
/// - `limit` changes the page size (and goes back to the first page)
/// - `page` selects a zero-based page, clamped to the available range
pub fn apply_list_params(
    page: &mut CardPurchasesPage,
    params: &HashMap<String, String>,
) -> ApiResult<()> {
    if let Some(order_by) = params.get("orderBy").filter(|s| !s.is_empty()) {
        let key: SortKey = order_by
            .parse()
            .map_err(|message| ApiError::BadRequest { message })?;
        match params.get("order").filter(|s| !s.is_empty()) {
            Some(order) => {
                let direction: SortDirection = order
                    .parse()
                    .map_err(|message| ApiError::BadRequest { message })?;
                page.set_sort(SortSpec::new(key, direction));
            }
            None => page.request_sort(key),
        }
    }

    if let Some(query) = params.get("q") {
        page.set_query(query);
    }

    if let Some(limit) = params.get("limit") {
        let limit: usize = limit.parse().map_err(|_| ApiError::BadRequest {
            message: format!("Invalid page size: {}", limit),
        })?;
        if limit != page.pagination().page_size() {
            page.set_page_size(limit);
        }
    }

    if let Some(index) = params.get("page") {
        let index: usize = index.parse().map_err(|_| ApiError::BadRequest {
            message: format!("Invalid page: {}", index),
        })?;
        page.set_page(index);
    }

    Ok(())
}

/// Build the filter selection from the submitted filter form
pub fn selection_from_form(form: &HashMap<String, String>) -> FilterSelection {
    FilterDimension::ALL
        .iter()
        .fold(FilterSelection::default(), |selection, dimension| {
            selection.with_value(
                *dimension,
                form.get(dimension.form_field()).map(|v| v.as_str()),
            )
        })
}

/// Get the card purchases projection (JSON API)
pub async fn api_card_purchases(
    state: axum::extract::State<AppState>,
    params: Query<HashMap<String, String>>,
) -> ApiResult<Json<PageView>> {
    state.require_login("/card-purchases").await?;

    let mut page = state.page.write().await;
    apply_list_params(&mut page, &params)?;
    Ok(Json(page.view()))
}

/// Get filter choices for the current collection (JSON API)
pub async fn api_card_purchases_filters(
    state: axum::extract::State<AppState>,
) -> ApiResult<Json<Vec<FilterOption>>> {
    state.require_login("/card-purchases").await?;

    let page = state.page.read().await;
    Ok(Json(page.filter_options()))
}

/// HTMX: Table fragment - sort, search and pagination never refetch
pub async fn htmx_card_purchases_list(
    state: axum::extract::State<AppState>,
    params: Query<HashMap<String, String>>,
) -> ApiResult<Html<String>> {
    state.require_login("/card-purchases").await?;

    let mut page = state.page.write().await;
    apply_list_params(&mut page, &params)?;
    Ok(Html(render_content(&page.view())))
}

/// HTMX: Apply the submitted filters and refetch once
pub async fn htmx_apply_filters(
    state: axum::extract::State<AppState>,
    form: Form<HashMap<String, String>>,
) -> ApiResult<Html<String>> {
    state.require_login("/card-purchases").await?;

    let selection = selection_from_form(&form);
    let request = state.page.write().await.apply_filters(selection);
    run_fetch(&state.page, state.source.as_ref(), request).await;

    Ok(Html(render_content(&state.page.read().await.view())))
}

/// HTMX: Reset all filters to the baseline request and refetch once
pub async fn htmx_clear_filters(
    state: axum::extract::State<AppState>,
) -> ApiResult<Html<String>> {
    state.require_login("/card-purchases").await?;

    let request = state.page.write().await.clear_filters();
    run_fetch(&state.page, state.source.as_ref(), request).await;

    Ok(Html(render_content(&state.page.read().await.view())))
}

/// HTMX: Mark the commission of one transaction as paid
pub async fn htmx_mark_paid(
    state: axum::extract::State<AppState>,
    path: Path<String>,
) -> ApiResult<Html<String>> {
    state.require_login("/card-purchases").await?;

    let transaction_id = path.0;
    mark_paid(
        &state.page,
        state.marker.as_ref(),
        state.source.as_ref(),
        &transaction_id,
    )
    .await?;

    Ok(Html(render_content(&state.page.read().await.view())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardpay_config::Config;
    use cardpay_core::{SessionContext, TransactionRecord};

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn loaded_page(count: usize) -> CardPurchasesPage {
        let mut page = CardPurchasesPage::new(SessionContext::default(), &Config::default());
        let request = page.begin_fetch();
        let records = (1..=count)
            .map(|i| TransactionRecord::new(format!("TX-{:02}", i)))
            .collect();
        page.complete_fetch(request.ticket, Ok(records));
        page
    }

    #[test]
    fn test_order_by_toggles() {
        let mut page = loaded_page(3);
        apply_list_params(&mut page, &params(&[("orderBy", "transactionID")])).unwrap();
        assert_eq!(page.sort(), SortSpec::descending(SortKey::TransactionId));

        apply_list_params(&mut page, &params(&[("orderBy", "name")])).unwrap();
        assert_eq!(page.sort(), SortSpec::ascending(SortKey::Name));
    }

    #[test]
    fn test_explicit_order() {
        let mut page = loaded_page(3);
        apply_list_params(&mut page, &params(&[("orderBy", "sells"), ("order", "desc")])).unwrap();
        assert_eq!(page.sort(), SortSpec::descending(SortKey::Price));
    }

    #[test]
    fn test_invalid_order_by_is_bad_request() {
        let mut page = loaded_page(3);
        let err = apply_list_params(&mut page, &params(&[("orderBy", "nope")])).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest { .. }));
    }

    #[test]
    fn test_limit_then_page() {
        let mut page = loaded_page(30);
        apply_list_params(&mut page, &params(&[("limit", "10"), ("page", "2")])).unwrap();
        assert_eq!(page.pagination().page_size(), 10);
        assert_eq!(page.pagination().page_index(), 2);

        // same limit again keeps the page
        apply_list_params(&mut page, &params(&[("limit", "10")])).unwrap();
        assert_eq!(page.pagination().page_index(), 2);
    }

    #[test]
    fn test_page_is_clamped() {
        let mut page = loaded_page(7);
        apply_list_params(&mut page, &params(&[("page", "40")])).unwrap();
        assert_eq!(page.pagination().page_index(), 1);
    }

    #[test]
    fn test_query() {
        let mut page = loaded_page(12);
        apply_list_params(&mut page, &params(&[("q", "tx-1")])).unwrap();
        assert_eq!(page.query(), "tx-1");
        assert_eq!(page.filtered_count(), 3);
    }

    #[test]
    fn test_query_is_passed_through_verbatim() {
        let mut page = loaded_page(12);
        apply_list_params(&mut page, &params(&[("q", " tx-1 ")])).unwrap();
        assert_eq!(page.query(), " tx-1 ");
        assert_eq!(page.filtered_count(), 0);
    }

    #[test]
    fn test_whitespace_query_searches() {
        let mut page = loaded_page(3);
        apply_list_params(&mut page, &params(&[("q", " ")])).unwrap();
        assert_eq!(page.query(), " ");

        match page.view() {
            PageView::Ready(table) => {
                assert!(table.is_empty_result);
                assert!(table.rows.is_empty());
            }
            other => panic!("page not ready: {:?}", other),
        }
    }

    #[test]
    fn test_selection_from_form() {
        let selection = selection_from_form(&params(&[
            ("status", "COMMITTED"),
            ("airtime", ""),
            ("agent", "Tom & Jerry"),
            ("paid", "false"),
        ]));
        assert_eq!(selection.status.as_deref(), Some("COMMITTED"));
        assert_eq!(selection.airtime, None);
        assert_eq!(selection.agent.as_deref(), Some("Tom & Jerry"));
        assert_eq!(selection.paid, Some(false));
    }
}
