//! Card purchases view engine
//!
//! Holds the card purchase collection fetched from the backend and derives
//! the table view from it: sorting, transaction id search, backend filter
//! parameterization and pagination.

pub mod comparator;
pub mod error;
pub mod filters;
pub mod models;
pub mod page;
pub mod pagination;
pub mod projector;
pub mod search;
pub mod session;
pub mod source;
pub mod store;
pub mod types;

pub use error::{CoreError, CoreResult, ErrorCode, ErrorContext, ErrorSeverity};
pub use filters::{
    BackendFilterCoordinator, FilterDimension, FilterOption, FilterSelection, RequestParameterization,
};
pub use models::{RowView, TransactionRecord};
pub use page::{mark_paid, run_fetch, CardPurchasesPage, FetchRequest, PageView, TableView};
pub use pagination::PaginationState;
pub use projector::{project, Projection};
pub use session::{Profile, SessionContext};
pub use source::{MemoryTransactionSource, PaymentMarker, TransactionSource};
pub use store::{CommitOutcome, FetchState, FetchTicket, RecordStore};
pub use types::{PageSpec, SortDirection, SortKey, SortSpec, Tone};
