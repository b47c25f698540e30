//! 예측 루프.

use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use vardhman_core::{
    forecast_next, index_record, recent_prices, CycleOutcome, CycleStats, DocumentStore,
    PredictionRecord, MIN_SAMPLES, PREDICTION_INDEX,
};

/// 한 주기 실행: 최근 가격 조회 → 추세 적합 → 예측 기록.
///
/// 조회 실패는 가격 0개로 취급하고, 기록 실패는 로그만 남깁니다.
pub async fn run_predict_cycle(store: &dyn DocumentStore, lookback: usize) -> CycleOutcome {
    let prices = match recent_prices(store, lookback).await {
        Ok(prices) => prices,
        Err(e) => {
            tracing::warn!(error = %e, "Error fetching prices");
            Vec::new()
        }
    };

    if prices.is_empty() {
        tracing::info!("No price data found");
        return CycleOutcome::Skipped;
    }

    let Some(forecast) = forecast_next(&prices) else {
        tracing::info!(
            samples = prices.len(),
            required = MIN_SAMPLES,
            "Not enough data to predict yet"
        );
        return CycleOutcome::Skipped;
    };

    let record = match PredictionRecord::new(forecast, Utc::now()) {
        Ok(record) => record,
        Err(e) => {
            tracing::warn!(error = %e, "Discarding unusable forecast");
            return CycleOutcome::Failed;
        }
    };

    match index_record(store, PREDICTION_INDEX, &record).await {
        Ok(()) => {
            tracing::info!(
                predicted_price = %record.predicted_price,
                samples = prices.len(),
                timestamp = %record.timestamp,
                "Wrote prediction"
            );
            CycleOutcome::Written
        }
        Err(e) => {
            tracing::warn!(error = %e, "Error writing prediction");
            CycleOutcome::Failed
        }
    }
}

/// 취소될 때까지 `interval` 간격으로 예측 주기를 반복합니다.
pub async fn run_predict_loop(
    store: &dyn DocumentStore,
    lookback: usize,
    interval: Duration,
    shutdown: CancellationToken,
) -> CycleStats {
    let mut stats = CycleStats::new();

    tracing::info!(
        lookback = lookback,
        interval_secs = interval.as_secs(),
        "Prediction loop started"
    );

    loop {
        let outcome = tokio::select! {
            _ = shutdown.cancelled() => break,
            outcome = run_predict_cycle(store, lookback) => outcome,
        };
        stats.record(outcome);

        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }

    stats.log_summary("prediction");
    stats
}
