//! Collaborators the page talks to: where records come from and how a
//! commission gets marked as paid.

use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::filters::RequestParameterization;
use crate::models::TransactionRecord;

/// Fetch collaborator
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// Fetch the card purchases matching `params`
    async fn fetch(&self, params: &RequestParameterization) -> CoreResult<Vec<TransactionRecord>>;
}

/// Mutation collaborator for settling agent commissions
#[async_trait]
pub trait PaymentMarker: Send + Sync {
    async fn mark_paid(&self, transaction_id: &str, paid: bool) -> CoreResult<()>;
}

/// Serves a fixed record set, applying the backend filters itself
#[derive(Debug, Default)]
pub struct MemoryTransactionSource {
    records: RwLock<Vec<TransactionRecord>>,
    fetches: AtomicUsize,
}

impl MemoryTransactionSource {
    pub fn new(records: Vec<TransactionRecord>) -> Self {
        Self {
            records: RwLock::new(records),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Load records from a JSON array file
    pub async fn from_json_file(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await?;
        let records: Vec<TransactionRecord> = serde_json::from_str(&content)?;
        log::info!(
            target: "cardpay::fetch",
            "loaded {} card purchases from {}",
            records.len(),
            path.display()
        );
        Ok(Self::new(records))
    }

    /// Number of fetches served so far
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TransactionSource for MemoryTransactionSource {
    async fn fetch(&self, params: &RequestParameterization) -> CoreResult<Vec<TransactionRecord>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let selection = params.to_selection();
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| selection.matches(r))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PaymentMarker for MemoryTransactionSource {
    async fn mark_paid(&self, transaction_id: &str, paid: bool) -> CoreResult<()> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|r| r.transaction_id == transaction_id)
            .ok_or_else(|| CoreError::TransactionNotFound {
                id: transaction_id.to_string(),
            })?;
        record.paid = paid;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::FilterSelection;

    fn records() -> Vec<TransactionRecord> {
        let mut a = TransactionRecord::new("A");
        a.name = Some("Ann".to_string());
        a.status = Some("COMMITTED".to_string());
        let mut b = TransactionRecord::new("B");
        b.name = Some("Bob".to_string());
        b.paid = true;
        vec![a, b]
    }

    #[tokio::test]
    async fn test_fetch_applies_filters() {
        let source = MemoryTransactionSource::new(records());

        let all = source.fetch(&RequestParameterization::baseline()).await.unwrap();
        assert_eq!(all.len(), 2);

        let params = RequestParameterization::from_selection(
            &FilterSelection::default().with_agent(Some("Bob".to_string())),
        );
        let bob = source.fetch(&params).await.unwrap();
        assert_eq!(bob.len(), 1);
        assert_eq!(bob[0].transaction_id, "B");

        let params = RequestParameterization::from_selection(
            &FilterSelection::default().with_paid(Some(false)),
        );
        let unpaid = source.fetch(&params).await.unwrap();
        assert_eq!(unpaid[0].transaction_id, "A");

        assert_eq!(source.fetch_count(), 3);
    }

    #[tokio::test]
    async fn test_mark_paid() {
        let source = MemoryTransactionSource::new(records());
        source.mark_paid("A", true).await.unwrap();

        let all = source.fetch(&RequestParameterization::baseline()).await.unwrap();
        assert!(all.iter().all(|r| r.paid));

        let err = source.mark_paid("missing", true).await.unwrap_err();
        assert!(matches!(err, CoreError::TransactionNotFound { .. }));
    }

    #[tokio::test]
    async fn test_from_json_file() {
        let path = std::env::temp_dir().join(format!("cardpay-fixture-{}.json", std::process::id()));
        tokio::fs::write(
            &path,
            r#"[{"transactionID": "F1", "Payment": 4.5}, {"transactionID": "F2", "payment": 1}]"#,
        )
        .await
        .unwrap();

        let source = MemoryTransactionSource::from_json_file(&path).await.unwrap();
        let records = source.fetch(&RequestParameterization::baseline()).await.unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].resolved_payment().is_ok());

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_from_json_file_rejects_bad_json() {
        let path = std::env::temp_dir().join(format!("cardpay-bad-{}.json", std::process::id()));
        tokio::fs::write(&path, "{not json").await.unwrap();

        let err = MemoryTransactionSource::from_json_file(&path).await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidFormat { .. }));

        tokio::fs::remove_file(&path).await.unwrap();
    }
}
