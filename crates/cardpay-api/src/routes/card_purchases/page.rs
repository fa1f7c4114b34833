//! Card purchases page rendering
//!
//! Endpoints:
//! - page_card_purchases: Full page with toolbar, filter panel, table and pagination
//!
//! Helper functions:
//! - render_content: Swappable content area (filter panel, table, pagination)
//! - render_table: Sortable table for one page of rows
//! - render_filter_panel: Backend filter form
//! - render_pagination: Rows-per-page selector and page navigation

use crate::{ApiResult, AppState};
use cardpay_core::{
    FilterDimension, FilterOption, PageView, RowView, SortDirection, SortKey, TableView,
};
use cardpay_utils::escape_html;

const CONTENT_TARGET: &str = "#card-purchases-content";

/// Height of one table row in pixels, used for the padding row
const ROW_HEIGHT: usize = 53;

/// Card purchases page - Main page with search box and table
pub async fn page_card_purchases(
    state: axum::extract::State<AppState>,
    headers: axum::http::HeaderMap,
) -> ApiResult<axum::response::Html<String>> {
    state.require_login("/card-purchases").await?;

    let page = state.page.read().await;
    let view = page.view();
    let updated = match &view {
        PageView::Ready(table) => table
            .fetched_at
            .map(|t| format!("Updated {}", t.format("%Y-%m-%d %H:%M:%S UTC")))
            .unwrap_or_default(),
        _ => String::new(),
    };

    let inner_content = format!(
        r#"<div class='toolbar'>
            <h2>Card Purchases</h2>
            <span class='muted'>{}</span>
            <input type='search' name='q' value='{}' placeholder='Search transaction ID...'
                hx-get='/card-purchases/list' hx-target='{}' hx-trigger='keyup changed delay:300ms, search'>
            <button onclick='reloadCardPurchases()'>Reload</button>
        </div>
        <div id='card-purchases-content'>{}</div>
        <script>
        function reloadCardPurchases() {{
            fetch('/api/reload', {{method: 'POST'}})
                .then(r => r.json())
                .then(data => {{
                    if (data.success) {{
                        htmx.ajax('GET', '/card-purchases/list', '{}');
                    }} else {{
                        alert('Reload failed: ' + data.message);
                    }}
                }})
                .catch(e => alert('Reload failed: ' + e));
        }}
        </script>"#,
        updated,
        escape_html(page.query()),
        CONTENT_TARGET,
        render_content(&view),
        CONTENT_TARGET
    );

    Ok(axum::response::Html(crate::page_response(
        &headers,
        "Card Purchases",
        &inner_content,
    )))
}

/// Content area swapped by every HTMX interaction
pub fn render_content(view: &PageView) -> String {
    match view {
        PageView::Loading => format!(
            r#"<div class='loading' hx-get='/card-purchases/list' hx-trigger='load delay:500ms' hx-target='{}'>
                <p>Loading...</p>
            </div>"#,
            CONTENT_TARGET
        ),
        PageView::Failed { message } => format!(
            r#"<div class='error' role='alert'>
                <p>Could not load card purchases: {}</p>
                <button onclick='reloadCardPurchases()'>Retry</button>
            </div>"#,
            escape_html(message)
        ),
        PageView::Ready(table) => format!(
            "{}{}{}",
            render_filter_panel(&table.filters),
            render_table(table),
            render_pagination(table)
        ),
    }
}

fn option_label(dimension: FilterDimension, value: &str) -> String {
    match (dimension, value) {
        (FilterDimension::CommissionPaid, "true") => "Yes".to_string(),
        (FilterDimension::CommissionPaid, "false") => "No".to_string(),
        _ => escape_html(value),
    }
}

/// Filter form; applying or clearing it refetches from the backend
pub fn render_filter_panel(filters: &[FilterOption]) -> String {
    let mut selects = String::new();
    for filter in filters {
        let mut options = String::from("<option value=''>All</option>");
        for value in &filter.values {
            let selected = if filter.selected.as_deref() == Some(value.as_str()) {
                " selected"
            } else {
                ""
            };
            options.push_str(&format!(
                "<option value='{}'{}>{}</option>",
                escape_html(value),
                selected,
                option_label(filter.dimension, value)
            ));
        }
        selects.push_str(&format!(
            "<label>{}<select name='{}'>{}</select></label>",
            filter.title, filter.form_field, options
        ));
    }

    format!(
        r#"<form class='filters' hx-post='/card-purchases/filters' hx-target='{}'>
            {}
            <button type='submit'>Filter</button>
            <button type='button' hx-post='/card-purchases/filters/clear' hx-target='{}'>Clear Filters</button>
        </form>"#,
        CONTENT_TARGET, selects, CONTENT_TARGET
    )
}

fn render_header(table: &TableView) -> String {
    let mut cells = String::new();
    for key in SortKey::ALL {
        let (aria, arrow) = if table.sort.key == key {
            match table.sort.direction {
                SortDirection::Ascending => ("ascending", " &#9650;"),
                SortDirection::Descending => ("descending", " &#9660;"),
            }
        } else {
            ("none", "")
        };
        cells.push_str(&format!(
            r#"<th aria-sort='{}'><a href='#' hx-get='/card-purchases/list?orderBy={}' hx-target='{}'>{}{}</a></th>"#,
            aria, key, CONTENT_TARGET, key.label(), arrow
        ));
    }
    if table.can_mark_paid {
        cells.push_str("<th></th>");
    }
    format!("<thead><tr>{}</tr></thead>", cells)
}

fn render_row(row: &RowView, with_action: bool) -> String {
    let action = if !with_action {
        String::new()
    } else if row.can_mark_paid {
        format!(
            r#"<td><button hx-post='/card-purchases/{}/pay' hx-target='{}' hx-confirm='Mark the commission for {} as paid?'>Mark Paid</button></td>"#,
            urlencoding::encode(&row.transaction_id),
            CONTENT_TARGET,
            escape_html(&row.transaction_id)
        )
    } else {
        "<td></td>".to_string()
    };

    format!(
        r#"<tr>
            <td>{}</td>
            <td><span class='label label-{}'>{}</span></td>
            <td>{}</td>
            <td>{}</td>
            <td>{}</td>
            <td>{}</td>
            <td>{}%</td>
            <td>{}</td>
            <td><span class='label label-{}'>{}</span></td>
            {}
        </tr>"#,
        escape_html(&row.transaction_id),
        row.status_tone,
        escape_html(&row.status),
        escape_html(&row.date),
        escape_html(&row.airtime),
        row.selling_price,
        escape_html(&row.agent_name),
        row.commission_display,
        row.agent_payment_display,
        row.paid_tone,
        row.paid_label,
        action
    )
}

/// Table for the current page, with the padding row on short last pages
/// and the not-found row for an empty search
pub fn render_table(table: &TableView) -> String {
    let columns = SortKey::ALL.len() + usize::from(table.can_mark_paid);

    let mut body = String::new();
    for row in &table.rows {
        body.push_str(&render_row(row, table.can_mark_paid));
    }
    if table.padding_rows > 0 {
        body.push_str(&format!(
            "<tr class='padding' style='height: {}px'><td colspan='{}'></td></tr>",
            ROW_HEIGHT * table.padding_rows,
            columns
        ));
    }
    if table.is_empty_result {
        let message = if table.query.is_empty() {
            "No card purchases match the current filters.".to_string()
        } else {
            format!(
                "No results found for &quot;{}&quot;. Try checking for typos or using complete words.",
                escape_html(&table.query)
            )
        };
        body.push_str(&format!(
            "<tr class='not-found'><td colspan='{}'><h6>Not found</h6><p>{}</p></td></tr>",
            columns, message
        ));
    }

    format!("<table>{}<tbody>{}</tbody></table>", render_header(table), body)
}

/// Rows-per-page selector, "from-to of total" and previous/next buttons
pub fn render_pagination(table: &TableView) -> String {
    let offset = table.page_index * table.page_size;
    let (from, to) = if table.total_count == 0 {
        (0, 0)
    } else {
        (
            (offset + 1).min(table.total_count),
            (offset + table.page_size).min(table.total_count),
        )
    };

    let mut sizes = String::new();
    for size in &table.page_sizes {
        let selected = if *size == table.page_size { " selected" } else { "" };
        sizes.push_str(&format!("<option value='{}'{}>{}</option>", size, selected, size));
    }

    let has_prev = table.page_index > 0;
    let has_next = table.page_index + 1 < table.page_count;

    format!(
        r#"<div class='pagination'>
            <label>Rows per page:
                <select name='limit' hx-get='/card-purchases/list' hx-target='{}' hx-trigger='change'>{}</select>
            </label>
            <span>{}&ndash;{} of {}</span>
            <button {} hx-get='/card-purchases/list?page={}' hx-target='{}'>Previous</button>
            <button {} hx-get='/card-purchases/list?page={}' hx-target='{}'>Next</button>
        </div>"#,
        CONTENT_TARGET,
        sizes,
        from,
        to,
        table.total_count,
        if has_prev { "" } else { "disabled" },
        table.page_index.saturating_sub(1),
        CONTENT_TARGET,
        if has_next { "" } else { "disabled" },
        table.page_index + 1,
        CONTENT_TARGET
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardpay_core::{SortSpec, Tone};

    fn row(id: &str, paid: bool, can_mark_paid: bool) -> RowView {
        RowView {
            transaction_id: id.to_string(),
            status: "COMMITTED".to_string(),
            status_tone: Tone::Warning,
            date: "2023-01-05".to_string(),
            airtime: "MTN 100".to_string(),
            selling_price: "100.00".to_string(),
            agent_name: "Ann <script>".to_string(),
            commission_percent: None,
            commission_display: "3.75".to_string(),
            agent_payment: None,
            agent_payment_display: "12.50".to_string(),
            paid,
            paid_label: if paid { "Yes" } else { "No" }.to_string(),
            paid_tone: if paid { Tone::Success } else { Tone::Error },
            can_mark_paid,
        }
    }

    fn table(rows: Vec<RowView>) -> TableView {
        let total_count = rows.len();
        TableView {
            rows,
            padding_rows: 0,
            is_empty_result: total_count == 0,
            total_count,
            page_index: 0,
            page_size: 5,
            page_count: if total_count == 0 { 0 } else { 1 },
            page_sizes: vec![5, 10, 25],
            sort: SortSpec::default(),
            query: String::new(),
            filters: Vec::new(),
            applied_filters: "?Status=&Airtime=&Agent=&Paid=".to_string(),
            can_mark_paid: true,
            fetched_at: None,
        }
    }

    #[test]
    fn test_row_values_are_escaped() {
        let html = render_table(&table(vec![row("TX-1", false, true)]));
        assert!(html.contains("Ann &lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("3.75%"));
        assert!(html.contains("label-warning"));
    }

    #[test]
    fn test_mark_paid_button_only_for_unpaid_rows() {
        let html = render_table(&table(vec![row("TX-1", false, true), row("TX-2", true, false)]));
        assert!(html.contains("/card-purchases/TX-1/pay"));
        assert!(!html.contains("/card-purchases/TX-2/pay"));
    }

    #[test]
    fn test_header_marks_sorted_column() {
        let mut view = table(vec![row("TX-1", false, true)]);
        view.sort = SortSpec::descending(SortKey::Price);
        let html = render_table(&view);
        assert!(html.contains("aria-sort='descending'><a href='#' hx-get='/card-purchases/list?orderBy=sells'"));
    }

    #[test]
    fn test_padding_row() {
        let mut view = table(vec![row("TX-6", false, true), row("TX-7", false, true)]);
        view.padding_rows = 3;
        let html = render_table(&view);
        assert!(html.contains("height: 159px"));
    }

    #[test]
    fn test_not_found_row_quotes_query() {
        let mut view = table(Vec::new());
        view.query = "zz".to_string();
        let html = render_table(&view);
        assert!(html.contains("Not found"));
        assert!(html.contains("&quot;zz&quot;"));
    }

    #[test]
    fn test_pagination_range() {
        let mut view = table(Vec::new());
        view.total_count = 7;
        view.page_index = 1;
        view.page_count = 2;
        let html = render_pagination(&view);
        assert!(html.contains("6&ndash;7 of 7"));
        assert!(html.contains("<option value='5' selected>5</option>"));
        assert!(html.contains("<button disabled hx-get='/card-purchases/list?page=2'"));
    }

    #[test]
    fn test_filter_panel_marks_selection() {
        let filters = vec![FilterOption {
            dimension: FilterDimension::CommissionPaid,
            title: "Commission Paid".to_string(),
            form_field: "paid".to_string(),
            values: vec!["false".to_string(), "true".to_string()],
            selected: Some("true".to_string()),
        }];
        let html = render_filter_panel(&filters);
        assert!(html.contains("<select name='paid'>"));
        assert!(html.contains("<option value='true' selected>Yes</option>"));
        assert!(html.contains("<option value='false'>No</option>"));
    }

    #[test]
    fn test_failed_view() {
        let html = render_content(&PageView::Failed {
            message: "backend error 502".to_string(),
        });
        assert!(html.contains("backend error 502"));
    }
}
