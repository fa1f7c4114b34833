//! HTTP API server with HTMX support
//!
//! Routes are organized into modules:
//! - routes::card_purchases: Card purchases page, table fragment, filters, mark paid
//!
//! The fetch and mark-paid collaborators live in [`client`].
//!
//! One page state is shared by every request. Sort, search, filters and page
//! index belong to the single configured session, so two browser tabs see
//! each other's changes.

pub mod client;
pub mod error;
pub mod routes;

use axum::{
    response::Redirect,
    routing::{get, post},
    Router,
};
use cardpay_config::Config;
use cardpay_core::{
    run_fetch, CardPurchasesPage, CommitOutcome, FetchState, PaymentMarker, SessionContext,
    TransactionSource,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;

pub use error::{ApiError, ApiResult};

/// Application state
///
/// `page` is server-wide: the dashboard serves one operator session.
#[derive(Clone)]
pub struct AppState {
    pub page: Arc<RwLock<CardPurchasesPage>>,
    pub source: Arc<dyn TransactionSource>,
    pub marker: Arc<dyn PaymentMarker>,
    pub config: Config,
}

impl AppState {
    pub fn new(
        config: Config,
        source: Arc<dyn TransactionSource>,
        marker: Arc<dyn PaymentMarker>,
    ) -> Self {
        let session = SessionContext::from_config(&config.session);
        let page = CardPurchasesPage::new(session, &config);
        Self {
            page: Arc::new(RwLock::new(page)),
            source,
            marker,
            config,
        }
    }

    /// Redirect anonymous operators to the login page, returning to `path`
    pub async fn require_login(&self, path: &str) -> ApiResult<()> {
        match self.page.read().await.session().login_redirect(path) {
            Some(redirect) => Err(ApiError::LoginRequired { redirect }),
            None => Ok(()),
        }
    }

    /// Refetch with the applied filters
    pub async fn reload(&self) -> CommitOutcome {
        let request = self.page.write().await.begin_fetch();
        run_fetch(&self.page, self.source.as_ref(), request).await
    }
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::card_purchases::{
        api_card_purchases, api_card_purchases_filters, htmx_apply_filters, htmx_card_purchases_list,
        htmx_clear_filters, htmx_mark_paid, page_card_purchases,
    };

    Router::new()
        // API endpoints
        .route("/api/health", get(health_check))
        .route("/api/card-purchases", get(api_card_purchases))
        .route("/api/card-purchases/filters", get(api_card_purchases_filters))
        .route("/api/reload", post(api_reload))
        // HTMX page routes
        .route("/", get(index_page))
        .route("/card-purchases", get(page_card_purchases))
        // HTMX partial routes
        .route("/card-purchases/list", get(htmx_card_purchases_list))
        .route("/card-purchases/filters", post(htmx_apply_filters))
        .route("/card-purchases/filters/clear", post(htmx_clear_filters))
        .route("/card-purchases/:id/pay", post(htmx_mark_paid))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

async fn index_page() -> Redirect {
    Redirect::to("/card-purchases")
}

/// Refetch card purchases (JSON API)
async fn api_reload(state: axum::extract::State<AppState>) -> ApiResult<String> {
    state.require_login("/card-purchases").await?;

    let outcome = state.reload().await;
    let body = match (outcome, state.page.read().await.store().state()) {
        (CommitOutcome::Failed, FetchState::Failed { message }) => serde_json::json!({
            "success": false,
            "message": message,
        }),
        (CommitOutcome::Discarded, _) => serde_json::json!({
            "success": true,
            "message": "Superseded by a newer request",
        }),
        _ => serde_json::json!({
            "success": true,
            "message": "Card purchases reloaded",
        }),
    };
    Ok(body.to_string())
}

// ==================== Template Functions ====================

/// Base HTML template
pub fn base_html(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} | Admin</title>
    <script src="https://unpkg.com/htmx.org@1.9.10"></script>
    <style>
        .htmx-indicator {{ opacity: 0; transition: opacity 0.3s; }}
        .htmx-request .htmx-indicator {{ opacity: 1; }}
        .htmx-request.htmx-indicator {{ opacity: 1; }}
    </style>
</head>
<body>
    {}
</body>
</html>"#,
        cardpay_utils::escape_html(title),
        content
    )
}

/// Check if request is from HTMX (partial page update)
fn is_htmx_request(headers: &axum::http::HeaderMap) -> bool {
    headers.get("hx-request").is_some()
}

/// Wrap content for full page or HTMX partial
pub fn page_response(headers: &axum::http::HeaderMap, title: &str, inner_content: &str) -> String {
    if is_htmx_request(headers) {
        format!("<main class='container'>{}</main>", inner_content)
    } else {
        base_html(
            title,
            &format!("<main class='container'>{}</main>", inner_content),
        )
    }
}

/// Start the HTTP server
pub async fn start_server(state: AppState) -> std::io::Result<()> {
    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!(target: "cardpay::api", "Starting cardpay server on http://{}", addr);
    log::info!(target: "cardpay::api", "  - /card-purchases (Card purchases page)");
    log::info!(target: "cardpay::api", "  - /api/* (JSON API endpoints)");

    let result = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await;
    match &result {
        Ok(_) => log::info!(target: "cardpay::api", "Server stopped gracefully"),
        Err(e) => log::error!(target: "cardpay::api", "Server error: {}", e),
    }
    result
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!(target: "cardpay::api", "Failed to listen for shutdown signal: {}", e);
    }
}
