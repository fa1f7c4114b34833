//! Card purchases page controller.
//!
//! Owns the record collection together with the sort, search, pagination
//! and backend filter state, and turns them into a [`PageView`]. Only
//! applying or clearing backend filters, reloading and marking a row paid
//! produce a [`FetchRequest`]; sort, search and page changes are resolved in
//! memory.

use cardpay_config::Config;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::error::{CoreError, CoreResult, DefaultErrorLogger, ErrorContext, ErrorLogger};
use crate::filters::{BackendFilterCoordinator, FilterOption, FilterSelection, RequestParameterization};
use crate::models::RowView;
use crate::pagination::PaginationState;
use crate::projector::project;
use crate::search::search_transactions;
use crate::session::SessionContext;
use crate::source::{PaymentMarker, TransactionSource};
use crate::store::{CommitOutcome, FetchState, FetchTicket, RecordStore};
use crate::types::{SortKey, SortSpec};

/// A refetch the caller must run against the fetch collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub ticket: FetchTicket,
    pub params: RequestParameterization,
}

/// Everything the table renders
#[derive(Debug, Clone, Serialize)]
pub struct TableView {
    pub rows: Vec<RowView>,
    pub padding_rows: usize,
    pub is_empty_result: bool,
    pub total_count: usize,
    pub page_index: usize,
    pub page_size: usize,
    pub page_count: usize,
    pub page_sizes: Vec<usize>,
    pub sort: SortSpec,
    pub query: String,
    pub filters: Vec<FilterOption>,
    /// Query string of the request that produced the rows
    pub applied_filters: String,
    pub can_mark_paid: bool,
    pub fetched_at: Option<DateTime<Utc>>,
}

/// Page state as seen by the renderer
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum PageView {
    Loading,
    Failed { message: String },
    Ready(TableView),
}

pub struct CardPurchasesPage {
    session: SessionContext,
    store: RecordStore,
    coordinator: BackendFilterCoordinator,
    sort: SortSpec,
    query: String,
    pagination: PaginationState,
    decimal_places: u32,
    logger: DefaultErrorLogger,
}

impl CardPurchasesPage {
    pub fn new(session: SessionContext, config: &Config) -> Self {
        Self {
            session,
            store: RecordStore::new(),
            coordinator: BackendFilterCoordinator::new(),
            sort: SortSpec::default(),
            query: String::new(),
            pagination: PaginationState::new(&config.pagination),
            decimal_places: config.currency.decimal_places,
            logger: DefaultErrorLogger,
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn sort(&self) -> SortSpec {
        self.sort
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn pagination(&self) -> &PaginationState {
        &self.pagination
    }

    pub fn filter_draft(&self) -> &FilterSelection {
        self.coordinator.draft()
    }

    /// Filter panel choices for the current collection
    pub fn filter_options(&self) -> Vec<FilterOption> {
        self.coordinator.options(self.store.records())
    }

    fn context(&self, operation: &str) -> ErrorContext {
        ErrorContext::new(operation).with_username(&self.session.profile.username)
    }

    // ==================== Backend filters and fetching ====================

    /// Refetch with the currently applied filters
    pub fn begin_fetch(&mut self) -> FetchRequest {
        let params = self.coordinator.applied().clone();
        self.issue(params)
    }

    pub fn apply_filters(&mut self, selection: FilterSelection) -> FetchRequest {
        let params = self.coordinator.apply_filters(selection);
        self.issue(params)
    }

    pub fn clear_filters(&mut self) -> FetchRequest {
        let params = self.coordinator.clear_filters();
        self.issue(params)
    }

    /// Edit the filter panel without fetching
    pub fn set_filter_draft(&mut self, selection: FilterSelection) {
        self.coordinator.set_draft(selection);
    }

    fn issue(&mut self, params: RequestParameterization) -> FetchRequest {
        let ticket = self.store.issue();
        log::info!(
            target: "cardpay::fetch",
            "fetch #{} {}",
            ticket.sequence(),
            params
        );
        FetchRequest { ticket, params }
    }

    /// Deliver the collaborator's answer for `ticket`
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: CoreResult<Vec<crate::models::TransactionRecord>>,
    ) -> CommitOutcome {
        let error = result.as_ref().err().cloned();
        let outcome = self.store.commit(ticket, result);

        match outcome {
            CommitOutcome::Applied => {
                for record in self.store.records() {
                    if let Err(e) = record.resolved_payment() {
                        self.logger.log_error(&e, &self.context("fetch"));
                    }
                }
                let total = self.filtered_count();
                self.pagination.clamp_to(total);
                log::debug!(
                    target: "cardpay::fetch",
                    "fetch #{} applied, {} records",
                    ticket.sequence(),
                    self.store.records().len()
                );
            }
            CommitOutcome::Failed => {
                if let Some(e) = error {
                    let context = self
                        .context("fetch")
                        .with_data("filters", serde_json::json!(self.coordinator.applied().to_query_string()));
                    self.logger.log_error(&e, &context);
                }
            }
            CommitOutcome::Discarded => {}
        }

        outcome
    }

    // ==================== Local view state ====================

    /// Header click on column `key`
    pub fn request_sort(&mut self, key: SortKey) {
        self.sort = self.sort.toggled(key);
    }

    pub fn set_sort(&mut self, sort: SortSpec) {
        self.sort = sort;
    }

    /// Change the transaction id search; the page index is pulled back
    /// inside the new result range.
    pub fn set_query(&mut self, query: &str) {
        if self.query != query {
            self.query = query.to_string();
            let total = self.filtered_count();
            self.pagination.clamp_to(total);
        }
    }

    /// Select a page, clamped to the available range
    pub fn set_page(&mut self, page_index: usize) -> usize {
        let total = self.filtered_count();
        self.pagination.set_page(page_index, total)
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.pagination.set_page_size(page_size);
    }

    /// Rows left after the local search
    pub fn filtered_count(&self) -> usize {
        if self.query.is_empty() {
            self.store.records().len()
        } else {
            search_transactions(self.store.records(), &self.query).len()
        }
    }

    // ==================== Mark paid ====================

    /// Check that the operator may mark `transaction_id` as paid
    pub fn check_mark_paid(&self, transaction_id: &str) -> CoreResult<()> {
        if !self.session.is_superuser() {
            let error = CoreError::Unauthorized {
                action: "mark paid".to_string(),
            };
            self.logger.log_error(&error, &self.context("mark_paid"));
            return Err(error);
        }
        if !self.store.is_ready() {
            return Err(CoreError::NotLoaded);
        }

        let record = self
            .store
            .find(transaction_id)
            .ok_or_else(|| CoreError::TransactionNotFound {
                id: transaction_id.to_string(),
            })?;
        if record.paid {
            return Err(CoreError::AlreadyPaid {
                id: transaction_id.to_string(),
            });
        }
        Ok(())
    }

    // ==================== Rendering ====================

    pub fn view(&self) -> PageView {
        match self.store.state() {
            FetchState::Idle | FetchState::Loading => PageView::Loading,
            FetchState::Failed { message } => PageView::Failed {
                message: message.clone(),
            },
            FetchState::Ready => PageView::Ready(self.table_view()),
        }
    }

    fn table_view(&self) -> TableView {
        let records = self.store.records();
        let page = self.pagination.spec();
        let projection = project(records, self.sort, &self.query, page);
        let is_superuser = self.session.is_superuser();

        TableView {
            rows: projection
                .rows
                .iter()
                .map(|r| RowView::from_record(r, self.decimal_places, is_superuser))
                .collect(),
            padding_rows: projection.padding_rows,
            is_empty_result: projection.is_empty_result,
            total_count: projection.total_count,
            page_index: page.page_index,
            page_size: page.page_size,
            page_count: self.pagination.page_count(projection.total_count),
            page_sizes: self.pagination.page_sizes().to_vec(),
            sort: self.sort,
            query: self.query.clone(),
            filters: self.filter_options(),
            applied_filters: self.coordinator.applied().to_query_string(),
            can_mark_paid: is_superuser,
            fetched_at: self.store.fetched_at(),
        }
    }
}

// ==================== Async orchestration ====================

/// Run `request` against `source` without holding the page lock, then
/// commit the result.
pub async fn run_fetch(
    page: &RwLock<CardPurchasesPage>,
    source: &dyn TransactionSource,
    request: FetchRequest,
) -> CommitOutcome {
    let result = source.fetch(&request.params).await;
    page.write().await.complete_fetch(request.ticket, result)
}

/// Mark `transaction_id` as paid, then refetch with the applied filters
pub async fn mark_paid(
    page: &RwLock<CardPurchasesPage>,
    marker: &dyn PaymentMarker,
    source: &dyn TransactionSource,
    transaction_id: &str,
) -> CoreResult<CommitOutcome> {
    page.read().await.check_mark_paid(transaction_id)?;

    marker.mark_paid(transaction_id, true).await?;
    log::info!(target: "cardpay::pay", "marked {} as paid", transaction_id);

    let request = page.write().await.begin_fetch();
    Ok(run_fetch(page, source, request).await)
}
