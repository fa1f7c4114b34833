//! cardpay main entry point

use anyhow::Context;
use cardpay_api::client::{BackendClient, HttpPaymentMarker, HttpTransactionSource};
use cardpay_api::{start_server, AppState};
use cardpay_config::Config;
use cardpay_core::{CommitOutcome, MemoryTransactionSource, PaymentMarker, TransactionSource};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "cardpay")]
#[command(version = "0.1.0")]
#[command(about = "Admin dashboard for card purchases and agent commissions", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

fn init_logger(config: &Config) {
    env_logger::Builder::new()
        .parse_filters(&config.logging.level)
        .parse_default_env()
        .init();
}

async fn collaborators(
    config: &Config,
) -> anyhow::Result<(Arc<dyn TransactionSource>, Arc<dyn PaymentMarker>)> {
    match &config.backend.fixture_path {
        Some(path) => {
            let source = MemoryTransactionSource::from_json_file(path)
                .await
                .with_context(|| format!("Failed to load fixture {}", path.display()))?;
            let source = Arc::new(source);
            let marker: Arc<dyn PaymentMarker> = source.clone();
            let source: Arc<dyn TransactionSource> = source;
            Ok((source, marker))
        }
        None => {
            let client = BackendClient::new(&config.backend);
            log::info!("Backend: {}", config.transactions_url());
            let source: Arc<dyn TransactionSource> =
                Arc::new(HttpTransactionSource::new(client.clone()));
            let marker: Arc<dyn PaymentMarker> = Arc::new(HttpPaymentMarker::new(client));
            Ok((source, marker))
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let config = Config::load(&args.config)
        .map_err(|e| {
            eprintln!("{}", e.report());
            e
        })
        .with_context(|| format!("Failed to load configuration from {}", args.config.display()))?;
    init_logger(&config);
    log::info!("Config loaded from {}", args.config.display());

    let rt = Runtime::new()?;
    rt.block_on(async {
        let (source, marker) = collaborators(&config).await?;
        let state = AppState::new(config, source, marker);

        match state.reload().await {
            CommitOutcome::Applied => log::info!(
                "Loaded {} card purchases",
                state.page.read().await.store().records().len()
            ),
            _ => log::warn!("Initial fetch failed, the page will show the error until reloaded"),
        }

        start_server(state).await?;
        Ok::<_, anyhow::Error>(())
    })
}
