//! 시세 수집 및 기록 루프.

use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use vardhman_core::{
    index_record, CycleOutcome, CycleStats, PriceRecord, QuoteClient, PRICE_INDEX,
};

use crate::state::{ExporterState, LatestPrice};

/// 통계 요약을 남기는 주기 수
const SUMMARY_EVERY: u64 = 100;

/// 한 주기 실행: 현재가 조회 → 캐시 갱신 → 저장소 기록.
///
/// 어떤 실패도 에러로 전파하지 않고 결과만 반환합니다. 캐시는 기록 성공
/// 여부와 관계없이 갱신됩니다.
pub async fn run_fetch_cycle(state: &ExporterState, quote: &QuoteClient) -> CycleOutcome {
    let symbol = quote.config().symbol.as_str();

    let price = match quote.fetch_latest_price().await {
        Ok(Some(price)) => price,
        Ok(None) => {
            tracing::warn!(symbol = symbol, "No price in Yahoo response");
            return CycleOutcome::Skipped;
        }
        Err(e) => {
            tracing::error!(symbol = symbol, error = %e, "Exporter fetch error");
            return CycleOutcome::Failed;
        }
    };

    let record = match PriceRecord::new(price, Utc::now()) {
        Ok(record) => record,
        Err(e) => {
            tracing::warn!(symbol = symbol, error = %e, "Ignoring unusable price");
            return CycleOutcome::Skipped;
        }
    };

    state
        .set_latest_price(LatestPrice {
            price: record.price,
            timestamp: record.timestamp,
        })
        .await;

    let Some(store) = state.store_or_reconnect().await else {
        return CycleOutcome::Failed;
    };

    match index_record(store.as_ref(), PRICE_INDEX, &record).await {
        Ok(()) => {
            tracing::info!(
                symbol = symbol,
                price = %record.price,
                timestamp = %record.timestamp,
                "Indexed price"
            );
            CycleOutcome::Written
        }
        Err(e) => {
            tracing::warn!(symbol = symbol, price = %record.price, error = %e, "ES index failed");
            CycleOutcome::Failed
        }
    }
}

/// 취소될 때까지 `interval` 간격으로 수집 주기를 반복합니다.
pub async fn run_fetch_loop(
    state: &ExporterState,
    quote: &QuoteClient,
    interval: Duration,
    shutdown: CancellationToken,
) -> CycleStats {
    let mut stats = CycleStats::new();

    tracing::info!(
        symbol = %quote.config().symbol,
        interval_secs = interval.as_secs(),
        "Price fetch loop started"
    );

    loop {
        let outcome = tokio::select! {
            _ = shutdown.cancelled() => break,
            outcome = run_fetch_cycle(state, quote) => outcome,
        };
        stats.record(outcome);
        if stats.cycles % SUMMARY_EVERY == 0 {
            stats.log_summary("price fetch");
        }

        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }

    stats.log_summary("price fetch");
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStore;
    use rust_decimal_macros::dec;
    use std::sync::Arc;
    use vardhman_core::{QuoteConfig, StoreConfig, StoreConnector};

    const CHART_PATH: &str = "/v8/finance/chart/VTL.NS";

    fn quote_client(server: &mockito::Server) -> QuoteClient {
        QuoteClient::new(QuoteConfig {
            base_url: server.url(),
            ..Default::default()
        })
        .unwrap()
    }

    fn state_with(store: Arc<MemoryStore>) -> ExporterState {
        ExporterState::new(StoreConnector::for_exporter(StoreConfig::default())).with_store(store)
    }

    async fn serve_chart(server: &mut mockito::Server, status: usize, body: &str) -> mockito::Mock {
        server
            .mock("GET", CHART_PATH)
            .match_query(mockito::Matcher::Any)
            .with_status(status)
            .with_body(body)
            .create_async()
            .await
    }

    #[tokio::test]
    async fn test_cycle_indexes_rounded_price() {
        let mut server = mockito::Server::new_async().await;
        let _chart = serve_chart(
            &mut server,
            200,
            r#"{"chart":{"result":[{"meta":{"regularMarketPrice":512.346}}]}}"#,
        )
        .await;
        let store = Arc::new(MemoryStore::default());
        let state = state_with(store.clone());

        let outcome = run_fetch_cycle(&state, &quote_client(&server)).await;

        assert_eq!(outcome, CycleOutcome::Written);
        assert_eq!(state.latest_price().await.unwrap().price, dec!(512.35));

        let docs = store.documents(PRICE_INDEX);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0]["price"].as_f64(), Some(512.35));
        assert_eq!(docs[0]["symbol"], "VTL.NS");
        assert_eq!(docs[0]["source"], "yahoo_finance");
    }

    #[tokio::test]
    async fn test_cycle_uses_close_fallback() {
        let mut server = mockito::Server::new_async().await;
        let _chart = serve_chart(
            &mut server,
            200,
            r#"{"chart":{"result":[{"meta":{},"indicators":{"quote":[{"close":[null,5.5,null]}]}}]}}"#,
        )
        .await;
        let store = Arc::new(MemoryStore::default());
        let state = state_with(store.clone());

        assert_eq!(
            run_fetch_cycle(&state, &quote_client(&server)).await,
            CycleOutcome::Written
        );
        assert_eq!(state.latest_price().await.unwrap().price, dec!(5.50));
    }

    #[tokio::test]
    async fn test_missing_price_skips_without_record() {
        let mut server = mockito::Server::new_async().await;
        let _chart = serve_chart(&mut server, 200, r#"{"chart":{"result":[{"meta":{}}]}}"#).await;
        let store = Arc::new(MemoryStore::default());
        let state = state_with(store.clone());

        assert_eq!(
            run_fetch_cycle(&state, &quote_client(&server)).await,
            CycleOutcome::Skipped
        );
        assert!(state.latest_price().await.is_none());
        assert!(store.documents(PRICE_INDEX).is_empty());
    }

    #[tokio::test]
    async fn test_upstream_errors_are_contained() {
        let mut server = mockito::Server::new_async().await;
        let store = Arc::new(MemoryStore::default());
        let state = state_with(store.clone());

        let mock = serve_chart(&mut server, 500, "oops").await;
        assert_eq!(
            run_fetch_cycle(&state, &quote_client(&server)).await,
            CycleOutcome::Failed
        );
        mock.remove_async().await;

        let _chart = serve_chart(&mut server, 200, "not json").await;
        assert_eq!(
            run_fetch_cycle(&state, &quote_client(&server)).await,
            CycleOutcome::Failed
        );
        assert!(store.documents(PRICE_INDEX).is_empty());
    }

    #[tokio::test]
    async fn test_write_failure_still_updates_cache() {
        let mut server = mockito::Server::new_async().await;
        let _chart = serve_chart(
            &mut server,
            200,
            r#"{"chart":{"result":[{"meta":{"regularMarketPrice":480.0}}]}}"#,
        )
        .await;
        let state = state_with(Arc::new(MemoryStore::failing()));

        let outcome = run_fetch_cycle(&state, &quote_client(&server)).await;

        assert_eq!(outcome, CycleOutcome::Failed);
        assert_eq!(state.latest_price().await.unwrap().price, dec!(480.00));
    }

    #[tokio::test]
    async fn test_loop_keeps_running_after_write_failures() {
        let mut server = mockito::Server::new_async().await;
        let _chart = serve_chart(
            &mut server,
            200,
            r#"{"chart":{"result":[{"meta":{"regularMarketPrice":480.0}}]}}"#,
        )
        .await;
        let state = Arc::new(state_with(Arc::new(MemoryStore::failing())));
        let quote = quote_client(&server);
        let shutdown = CancellationToken::new();

        let handle = tokio::spawn({
            let state = state.clone();
            let shutdown = shutdown.clone();
            async move {
                run_fetch_loop(&state, &quote, Duration::from_millis(10), shutdown).await
            }
        });

        tokio::time::sleep(Duration::from_millis(200)).await;
        shutdown.cancel();
        let stats = handle.await.unwrap();

        assert!(stats.cycles >= 2);
        assert_eq!(stats.errors, stats.cycles);
        assert!(state.latest_price().await.is_some());
    }
}
