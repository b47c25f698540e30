//! Vardhman price exporter.

use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use vardhman_core::{init_logging, load_dotenv, LogConfig, LogFormat, QuoteClient, StoreConnector};
use vardhman_exporter::{create_router, run_fetch_loop, ExporterConfig, ExporterState};

#[derive(Parser)]
#[command(name = "vardhman-exporter")]
#[command(about = "Vardhman Textiles price exporter", long_about = None)]
#[command(version)]
struct Cli {
    /// 로그 레벨 (trace, debug, info, warn, error). `RUST_LOG`가 우선합니다.
    #[arg(long)]
    log_level: Option<String>,

    /// 로그 형식 (pretty, json, compact)
    #[arg(long)]
    log_format: Option<LogFormat>,
}

/// Ctrl-C 수신 시 종료 토큰 취소.
async fn shutdown_signal(token: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("종료 신호 수신, exporter 종료 중...");
            token.cancel();
        }
        Err(e) => tracing::error!(error = %e, "Failed to listen for shutdown signal"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    load_dotenv();
    let cli = Cli::parse();

    let mut log_config = LogConfig::from_env();
    if let Some(level) = cli.log_level {
        log_config.level = level;
    }
    if let Some(format) = cli.log_format {
        log_config.format = format;
    }
    init_logging(log_config)?;

    let config = ExporterConfig::from_env()?;
    tracing::info!(
        store = %config.store.host,
        symbol = %config.quote.symbol,
        fetch_interval_secs = config.fetch_interval_secs,
        "Vardhman exporter 시작"
    );

    // 연결 실패해도 시작하고 첫 기록 시 재생성
    let connector = StoreConnector::for_exporter(config.store.clone());
    let state = match connector.connect().await? {
        Some(store) => ExporterState::new(connector).with_store(Arc::new(store)),
        None => ExporterState::new(connector),
    };
    let state = Arc::new(state);

    let quote = QuoteClient::new(config.quote.clone())?;
    let shutdown = CancellationToken::new();

    let fetch_task = tokio::spawn({
        let state = state.clone();
        let shutdown = shutdown.clone();
        let interval = config.fetch_interval();
        async move {
            run_fetch_loop(&state, &quote, interval, shutdown).await;
        }
    });

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Metrics available at http://{}/metrics", addr);

    tokio::spawn(shutdown_signal(shutdown.clone()));

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown.clone().cancelled_owned())
        .await?;

    shutdown.cancel();
    if let Err(e) = fetch_task.await {
        tracing::warn!(error = %e, "Fetch loop task ended abnormally");
    }

    tracing::info!("Vardhman exporter 종료");
    Ok(())
}
