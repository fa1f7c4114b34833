//! Record store: the single in-memory collection of card purchases.
//!
//! Every refetch is issued a ticket. Only the response carrying the most
//! recently issued ticket is committed; responses overtaken by a newer
//! request are dropped, so the collection always reflects the last request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::models::TransactionRecord;

/// Identifies one refetch request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FetchTicket(u64);

impl FetchTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// Loading gate for the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum FetchState {
    /// Nothing requested yet
    Idle,
    Loading,
    Ready,
    Failed { message: String },
}

/// What happened to a fetch response handed to [`RecordStore::commit`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Records replaced
    Applied,
    /// Latest request failed; the page shows the error state
    Failed,
    /// A newer request was issued after this one; response ignored
    Discarded,
}

#[derive(Debug)]
pub struct RecordStore {
    records: Vec<TransactionRecord>,
    state: FetchState,
    latest_issued: u64,
    fetched_at: Option<DateTime<Utc>>,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            state: FetchState::Idle,
            latest_issued: 0,
            fetched_at: None,
        }
    }

    /// Start a refetch; any response to an earlier ticket becomes stale
    pub fn issue(&mut self) -> FetchTicket {
        self.latest_issued += 1;
        self.state = FetchState::Loading;
        FetchTicket(self.latest_issued)
    }

    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.0 == self.latest_issued
    }

    /// Hand over the response for `ticket`. A successful current response
    /// replaces the whole collection.
    pub fn commit(
        &mut self,
        ticket: FetchTicket,
        result: CoreResult<Vec<TransactionRecord>>,
    ) -> CommitOutcome {
        if !self.is_current(ticket) {
            log::debug!(
                target: "cardpay::fetch",
                "discarding response #{} superseded by #{}",
                ticket.0,
                self.latest_issued
            );
            return CommitOutcome::Discarded;
        }

        match result {
            Ok(records) => {
                self.records = records;
                self.state = FetchState::Ready;
                self.fetched_at = Some(Utc::now());
                CommitOutcome::Applied
            }
            Err(e) => {
                self.state = FetchState::Failed {
                    message: e.to_string(),
                };
                CommitOutcome::Failed
            }
        }
    }

    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == FetchState::Ready
    }

    /// Time of the last applied response
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    pub fn find(&self, transaction_id: &str) -> Option<&TransactionRecord> {
        self.records.iter().find(|r| r.transaction_id == transaction_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    fn batch(ids: &[&str]) -> Vec<TransactionRecord> {
        ids.iter().map(|id| TransactionRecord::new(*id)).collect()
    }

    fn ids(store: &RecordStore) -> Vec<&str> {
        store.records().iter().map(|r| r.transaction_id.as_str()).collect()
    }

    #[test]
    fn test_starts_idle() {
        let store = RecordStore::new();
        assert_eq!(store.state(), &FetchState::Idle);
        assert!(store.records().is_empty());
        assert!(store.fetched_at().is_none());
    }

    #[test]
    fn test_issue_sets_loading() {
        let mut store = RecordStore::new();
        let ticket = store.issue();
        assert_eq!(ticket.sequence(), 1);
        assert_eq!(store.state(), &FetchState::Loading);
    }

    #[test]
    fn test_commit_replaces_wholesale() {
        let mut store = RecordStore::new();
        let t1 = store.issue();
        assert_eq!(store.commit(t1, Ok(batch(&["A", "B"]))), CommitOutcome::Applied);
        assert_eq!(ids(&store), vec!["A", "B"]);

        let t2 = store.issue();
        assert_eq!(store.commit(t2, Ok(batch(&["C"]))), CommitOutcome::Applied);
        assert_eq!(ids(&store), vec!["C"]);
        assert!(store.is_ready());
        assert!(store.fetched_at().is_some());
    }

    #[test]
    fn test_late_older_response_is_discarded() {
        let mut store = RecordStore::new();
        let older = store.issue();
        let newer = store.issue();

        assert_eq!(store.commit(newer, Ok(batch(&["new"]))), CommitOutcome::Applied);
        assert_eq!(store.commit(older, Ok(batch(&["old"]))), CommitOutcome::Discarded);
        assert_eq!(ids(&store), vec!["new"]);
        assert!(store.is_ready());
    }

    #[test]
    fn test_superseded_response_never_shows() {
        let mut store = RecordStore::new();
        let older = store.issue();
        let newer = store.issue();

        assert_eq!(store.commit(older, Ok(batch(&["old"]))), CommitOutcome::Discarded);
        assert!(store.records().is_empty());
        assert_eq!(store.state(), &FetchState::Loading);

        store.commit(newer, Ok(batch(&["new"])));
        assert_eq!(ids(&store), vec!["new"]);
    }

    #[test]
    fn test_failure_of_current_request() {
        let mut store = RecordStore::new();
        let t1 = store.issue();
        store.commit(t1, Ok(batch(&["A"])));

        let t2 = store.issue();
        let outcome = store.commit(
            t2,
            Err(CoreError::FetchFailed {
                message: "timeout".to_string(),
            }),
        );
        assert_eq!(outcome, CommitOutcome::Failed);
        assert_eq!(
            store.state(),
            &FetchState::Failed {
                message: "Fetch failed: timeout".to_string()
            }
        );
    }

    #[test]
    fn test_stale_failure_is_discarded() {
        let mut store = RecordStore::new();
        let older = store.issue();
        let newer = store.issue();
        store.commit(newer, Ok(batch(&["A"])));

        let outcome = store.commit(
            older,
            Err(CoreError::FetchFailed {
                message: "late".to_string(),
            }),
        );
        assert_eq!(outcome, CommitOutcome::Discarded);
        assert!(store.is_ready());
    }

    #[test]
    fn test_find() {
        let mut store = RecordStore::new();
        let t = store.issue();
        store.commit(t, Ok(batch(&["A", "B"])));
        assert!(store.find("B").is_some());
        assert!(store.find("Z").is_none());
    }
}
