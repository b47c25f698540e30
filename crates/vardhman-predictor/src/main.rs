//! Vardhman price predictor.

use clap::Parser;
use tokio_util::sync::CancellationToken;
use vardhman_core::{init_logging, load_dotenv, LogConfig, LogFormat, StoreConnector};
use vardhman_predictor::{run_predict_cycle, run_predict_loop, PredictorConfig};

#[derive(Parser)]
#[command(name = "vardhman-predictor")]
#[command(about = "Vardhman Textiles next-price predictor", long_about = None)]
#[command(version)]
struct Cli {
    /// 로그 레벨 (trace, debug, info, warn, error). `RUST_LOG`가 우선합니다.
    #[arg(long)]
    log_level: Option<String>,

    /// 로그 형식 (pretty, json, compact)
    #[arg(long)]
    log_format: Option<LogFormat>,

    /// 한 주기만 실행하고 종료
    #[arg(long)]
    once: bool,
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
    if let Err(e) = init_logging(log_config) {
        eprintln!("logging initialization failed: {}", e);
        std::process::exit(1);
    }

    let config = match PredictorConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid predictor configuration");
            std::process::exit(1);
        }
    };
    tracing::info!(
        store = %config.store.host,
        lookback = config.lookback,
        interval_secs = config.interval_secs,
        "Vardhman predictor 시작"
    );

    // 재시도 예산 소진 시 종료 코드 1
    let store = match StoreConnector::for_predictor(config.store.clone())
        .connect()
        .await
    {
        Ok(Some(store)) => store,
        Ok(None) => std::process::exit(1),
        Err(e) => {
            tracing::error!(error = %e, "Exiting");
            std::process::exit(1);
        }
    };

    if cli.once {
        let outcome = run_predict_cycle(&store, config.lookback).await;
        tracing::info!(outcome = ?outcome, "Single prediction cycle finished");
        return Ok(());
    }

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("종료 신호 수신, predictor 종료 중...");
                shutdown.cancel();
            }
        }
    });

    run_predict_loop(&store, config.lookback, config.interval(), shutdown).await;

    tracing::info!("Vardhman predictor 종료");
    Ok(())
}
