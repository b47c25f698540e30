//! 저장소에 기록되는 가격/예측 문서.
//!
//! 두 시리즈 모두 append-only이며 `timestamp` 기준으로 정렬됩니다.
//! 가격 값은 항상 소수점 둘째 자리로 고정된 `Decimal`로 보관하고,
//! JSON에는 숫자로 직렬화합니다.

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize, Serializer};

use crate::{MarketError, Result};

/// Yahoo Finance 종목 코드 (NSE 상장 Vardhman Textiles)
pub const SYMBOL: &str = "VTL.NS";
/// 회사명
pub const COMPANY: &str = "Vardhman Textiles Ltd";
/// 가격 레코드 출처 태그
pub const PRICE_SOURCE: &str = "yahoo_finance";
/// 원시 가격 시리즈 인덱스
pub const PRICE_INDEX: &str = "vardhman_prices";
/// 예측 시리즈 인덱스
pub const PREDICTION_INDEX: &str = "vardhman_predictions";
/// 가격 소수 자릿수
pub const PRICE_SCALE: u32 = 2;

/// 실수 가격을 소수점 둘째 자리로 반올림합니다.
///
/// 결과의 scale은 항상 2입니다 (`10.0` → `10.00`).
/// NaN/무한대는 `None`.
pub fn round_price(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    let mut rounded = Decimal::from_f64(value)?
        .round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(PRICE_SCALE);
    Some(rounded)
}

fn serialize_timestamp<S: Serializer>(ts: &DateTime<Utc>, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Micros, true))
}

/// 원시 가격 레코드 (`vardhman_prices`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub company: String,
    pub symbol: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub source: String,
}

impl PriceRecord {
    /// 반올림된 양수 가격으로 레코드를 생성합니다.
    pub fn new(price: f64, timestamp: DateTime<Utc>) -> Result<Self> {
        let price = round_price(price)
            .filter(|p| *p > Decimal::ZERO)
            .ok_or_else(|| MarketError::Parse(format!("invalid price: {}", price)))?;

        Ok(Self {
            timestamp,
            company: COMPANY.to_string(),
            symbol: SYMBOL.to_string(),
            price,
            source: PRICE_SOURCE.to_string(),
        })
    }
}

/// 예측 레코드 (`vardhman_predictions`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    pub company: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub predicted_price: Decimal,
}

impl PredictionRecord {
    /// 예측값을 반올림해 레코드를 생성합니다. 예측값은 음수일 수도 있습니다.
    pub fn new(predicted: f64, timestamp: DateTime<Utc>) -> Result<Self> {
        let predicted_price = round_price(predicted).ok_or_else(|| {
            MarketError::Parse(format!("non-finite prediction: {}", predicted))
        })?;

        Ok(Self {
            timestamp,
            symbol: SYMBOL.to_string(),
            company: COMPANY.to_string(),
            predicted_price,
        })
    }
}
