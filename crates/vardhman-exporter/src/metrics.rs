//! `/metrics` 엔드포인트.
//!
//! Prometheus 텍스트 노출 형식으로 두 개의 gauge를 렌더링합니다.
//! 현재가는 메모리 캐시에서, 예측값은 요청 시점에 저장소를 직접 조회해서
//! 가져옵니다. 값을 알 수 없으면 `NaN`을 씁니다.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use rust_decimal::Decimal;
use tower_http::trace::TraceLayer;
use vardhman_core::{latest_prediction, round_price};

use crate::state::ExporterState;

/// 메트릭 응답 Content-Type
pub const METRICS_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

const PRICE_GAUGE: &str = "vardhman_stock_price";
const PRICE_HELP: &str = "Current Vardhman stock price (INR)";
const PREDICTED_GAUGE: &str = "vardhman_predicted_price";
const PREDICTED_HELP: &str = "Predicted Vardhman stock price (INR)";

fn gauge_value(value: Option<Decimal>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "NaN".to_string())
}

fn push_gauge(out: &mut String, name: &str, help: &str, value: Option<Decimal>) {
    out.push_str(&format!("# HELP {} {}\n", name, help));
    out.push_str(&format!("# TYPE {} gauge\n", name));
    out.push_str(&format!("{} {}\n", name, gauge_value(value)));
}

/// 메트릭 본문을 렌더링합니다.
pub fn render_metrics(price: Option<Decimal>, predicted: Option<Decimal>) -> String {
    let mut out = String::new();
    push_gauge(&mut out, PRICE_GAUGE, PRICE_HELP, price);
    push_gauge(&mut out, PREDICTED_GAUGE, PREDICTED_HELP, predicted);
    out
}

/// 최신 예측값 조회. 연결이 없거나 조회 실패, 문서 없음은 모두 `None`.
async fn current_prediction(state: &ExporterState) -> Option<Decimal> {
    let store = state.store().await?;

    match latest_prediction(store.as_ref()).await {
        Ok(value) => value.and_then(round_price),
        Err(e) => {
            tracing::debug!(error = %e, "Prediction lookup failed");
            None
        }
    }
}

/// /metrics 엔드포인트 핸들러.
async fn metrics_handler(State(state): State<Arc<ExporterState>>) -> impl IntoResponse {
    let price = state.latest_price().await.map(|latest| latest.price);
    let predicted = current_prediction(&state).await;

    (
        [(header::CONTENT_TYPE, METRICS_CONTENT_TYPE)],
        render_metrics(price, predicted),
    )
}

/// 알 수 없는 경로: 본문 없는 404
async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

/// 전체 라우터 생성.
pub fn create_router(state: Arc<ExporterState>) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .fallback(not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::LatestPrice;
    use crate::testing::MemoryStore;
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request},
    };
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use tower::ServiceExt;
    use vardhman_core::{StoreConfig, StoreConnector, PREDICTION_INDEX};

    fn connector() -> StoreConnector {
        StoreConnector::for_exporter(StoreConfig::default())
    }

    async fn call(app: Router, method: Method, uri: &str) -> (StatusCode, Option<String>, String) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, String::from_utf8(body.to_vec()).unwrap())
    }

    #[test]
    fn test_render_exact_layout() {
        let body = render_metrics(Some(dec!(512.35)), Some(dec!(515.10)));
        assert_eq!(
            body,
            "# HELP vardhman_stock_price Current Vardhman stock price (INR)\n\
             # TYPE vardhman_stock_price gauge\n\
             vardhman_stock_price 512.35\n\
             # HELP vardhman_predicted_price Predicted Vardhman stock price (INR)\n\
             # TYPE vardhman_predicted_price gauge\n\
             vardhman_predicted_price 515.10\n"
        );
    }

    #[test]
    fn test_render_unknown_values_as_nan() {
        let body = render_metrics(None, None);
        assert!(body.contains("\nvardhman_stock_price NaN\n"));
        assert!(body.ends_with("\nvardhman_predicted_price NaN\n"));
    }

    #[tokio::test]
    async fn test_metrics_without_store_or_price() {
        let app = create_router(Arc::new(ExporterState::new(connector())));

        let (status, content_type, body) = call(app, Method::GET, "/metrics").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("text/plain; version=0.0.4"));
        assert_eq!(body, render_metrics(None, None));
    }

    #[tokio::test]
    async fn test_metrics_reads_cache_and_latest_prediction() {
        let store = Arc::new(MemoryStore::default());
        store.insert(
            PREDICTION_INDEX,
            json!({"timestamp": "2026-10-16T09:00:00.000000Z", "predicted_price": 500.0}),
        );
        store.insert(
            PREDICTION_INDEX,
            json!({"timestamp": "2026-10-16T09:00:30.000000Z", "predicted_price": 503.25}),
        );
        let state = Arc::new(ExporterState::new(connector()).with_store(store));
        state
            .set_latest_price(LatestPrice {
                price: dec!(501.40),
                timestamp: Utc::now(),
            })
            .await;

        let (_, _, body) = call(create_router(state), Method::GET, "/metrics").await;

        assert!(body.contains("\nvardhman_stock_price 501.40\n"));
        assert!(body.contains("\nvardhman_predicted_price 503.25\n"));
    }

    #[tokio::test]
    async fn test_failed_prediction_query_is_nan() {
        let state = Arc::new(ExporterState::new(connector()).with_store(Arc::new(MemoryStore::failing())));
        state
            .set_latest_price(LatestPrice {
                price: dec!(499.00),
                timestamp: Utc::now(),
            })
            .await;

        let (status, _, body) = call(create_router(state), Method::GET, "/metrics").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, render_metrics(Some(dec!(499.00)), None));
    }

    #[tokio::test]
    async fn test_repeated_scrapes_are_identical() {
        let store = Arc::new(MemoryStore::default());
        store.insert(
            PREDICTION_INDEX,
            json!({"timestamp": "2026-10-16T09:00:00.000000Z", "predicted_price": 510.5}),
        );
        let state = Arc::new(ExporterState::new(connector()).with_store(store));
        let app = create_router(state);

        let (_, _, first) = call(app.clone(), Method::GET, "/metrics").await;
        let (_, _, second) = call(app, Method::GET, "/metrics").await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_unknown_paths_are_404_with_empty_body() {
        let app = create_router(Arc::new(ExporterState::new(connector())));

        for method in [Method::GET, Method::POST, Method::PUT, Method::DELETE] {
            for uri in ["/", "/health", "/metrics/extra"] {
                let (status, _, body) = call(app.clone(), method.clone(), uri).await;
                assert_eq!(status, StatusCode::NOT_FOUND, "{} {}", method, uri);
                assert!(body.is_empty());
            }
        }
    }
}
