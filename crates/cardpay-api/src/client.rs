//! HTTP collaborators talking to the remittance admin backend

use async_trait::async_trait;
use cardpay_config::BackendConfig;
use cardpay_core::{
    CoreError, CoreResult, PaymentMarker, RequestParameterization, TransactionRecord,
    TransactionSource,
};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client as HttpClient, StatusCode};
use serde::Deserialize;

/// Transaction list as the backend returns it: a bare array, or a
/// paginated envelope with the rows under `results`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TransactionsPayload {
    List(Vec<TransactionRecord>),
    Page { results: Vec<TransactionRecord> },
}

impl TransactionsPayload {
    fn into_records(self) -> Vec<TransactionRecord> {
        match self {
            TransactionsPayload::List(records) => records,
            TransactionsPayload::Page { results } => results,
        }
    }
}

/// Shared HTTP plumbing for the fetch and mark-paid collaborators
#[derive(Debug, Clone)]
pub struct BackendClient {
    http_client: HttpClient,
    transactions_url: String,
    token: Option<String>,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            http_client: HttpClient::new(),
            transactions_url: config.transactions_url(),
            token: config.token.clone(),
        }
    }

    /// URL of the transaction list with the filter query appended
    pub fn list_url(&self, params: &RequestParameterization) -> String {
        format!("{}{}", self.transactions_url, params.to_query_string())
    }

    /// URL of a single transaction
    pub fn detail_url(&self, transaction_id: &str) -> String {
        format!(
            "{}{}/",
            self.transactions_url,
            urlencoding::encode(transaction_id)
        )
    }

    fn headers(&self) -> CoreResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = &self.token {
            let auth_value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|e| {
                CoreError::InternalError {
                    message: format!("Failed to create auth header: {}", e),
                }
            })?;
            headers.insert(AUTHORIZATION, auth_value);
        }

        Ok(headers)
    }
}

/// Describe a non-success backend answer
async fn status_message(status: StatusCode, response: reqwest::Response) -> String {
    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string))
        .unwrap_or(body);

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            format!("backend refused credentials ({}): {}", status.as_u16(), detail)
        }
        StatusCode::NOT_FOUND => format!("backend endpoint not found: {}", detail),
        s if s.is_server_error() => {
            log::warn!(target: "cardpay::backend", "server error {}: {}", s.as_u16(), detail);
            format!("backend error {}", s.as_u16())
        }
        s => format!("HTTP {}: {}", s.as_u16(), detail),
    }
}

/// Fetches card purchases from `<base_url><transactions_path>?Status=...`
#[derive(Debug, Clone)]
pub struct HttpTransactionSource {
    client: BackendClient,
}

impl HttpTransactionSource {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TransactionSource for HttpTransactionSource {
    async fn fetch(&self, params: &RequestParameterization) -> CoreResult<Vec<TransactionRecord>> {
        let url = self.client.list_url(params);
        log::debug!(target: "cardpay::backend", "GET {}", url);

        let response = self
            .client
            .http_client
            .get(&url)
            .headers(self.client.headers()?)
            .send()
            .await
            .map_err(|e| CoreError::FetchFailed {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::FetchFailed {
                message: status_message(status, response).await,
            });
        }

        let payload: TransactionsPayload =
            response.json().await.map_err(|e| CoreError::InvalidFormat {
                message: e.to_string(),
            })?;
        Ok(payload.into_records())
    }
}

/// Marks commissions as paid with `PATCH <transactions_url><id>/`
#[derive(Debug, Clone)]
pub struct HttpPaymentMarker {
    client: BackendClient,
}

impl HttpPaymentMarker {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PaymentMarker for HttpPaymentMarker {
    async fn mark_paid(&self, transaction_id: &str, paid: bool) -> CoreResult<()> {
        let url = self.client.detail_url(transaction_id);
        log::debug!(target: "cardpay::backend", "PATCH {}", url);

        let response = self
            .client
            .http_client
            .patch(&url)
            .headers(self.client.headers()?)
            .json(&serde_json::json!({ "paid": paid }))
            .send()
            .await
            .map_err(|e| CoreError::MutationFailed {
                message: e.to_string(),
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(CoreError::TransactionNotFound {
                id: transaction_id.to_string(),
            });
        }
        if !status.is_success() {
            return Err(CoreError::MutationFailed {
                message: status_message(status, response).await,
            });
        }
        Ok(())
    }
}
