//! 가격/예측 시리즈 조회와 기록.

use serde::Serialize;
use serde_json::Value;

use super::{DocumentStore, SortOrder};
use crate::domain::{PREDICTION_INDEX, PRICE_INDEX};
use crate::Result;

/// 레코드를 JSON으로 직렬화해 인덱스에 추가합니다.
pub async fn index_record<T: Serialize + Sync>(
    store: &dyn DocumentStore,
    index: &str,
    record: &T,
) -> Result<()> {
    let document = serde_json::to_value(record)?;
    store.index_document(index, &document).await
}

/// JSON 값을 가격으로 변환합니다. 숫자 문자열도 허용합니다.
pub fn coerce_price(value: &Value) -> Option<f64> {
    let price = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    price.is_finite().then_some(price)
}

/// 최근 `lookback`개 가격을 오래된 것부터 반환합니다.
///
/// `price` 필드가 없거나 숫자로 변환되지 않는 문서는 버립니다.
pub async fn recent_prices(store: &dyn DocumentStore, lookback: usize) -> Result<Vec<f64>> {
    let docs = store
        .search_by_timestamp(PRICE_INDEX, lookback, SortOrder::Desc)
        .await?;

    let mut prices: Vec<f64> = docs
        .iter()
        .filter_map(|doc| doc.get("price").and_then(coerce_price))
        .collect();
    prices.reverse();
    Ok(prices)
}

/// 가장 최근 예측값. 예측 문서가 없으면 `None`.
pub async fn latest_prediction(store: &dyn DocumentStore) -> Result<Option<f64>> {
    let docs = store
        .search_by_timestamp(PREDICTION_INDEX, 1, SortOrder::Desc)
        .await?;

    Ok(docs
        .first()
        .and_then(|doc| doc.get("predicted_price"))
        .and_then(coerce_price))
}
