//! Yahoo Finance 차트 API 시세 클라이언트.
//!
//! `v8/finance/chart/{symbol}?interval=1m&range=1d` 응답에서 현재가를 뽑습니다.
//! `meta.regularMarketPrice`가 우선이고, 없으면 1분봉 종가 배열의 마지막
//! non-null 값을 사용합니다.

use serde::Deserialize;
use std::time::Duration;

use crate::config::env_var_parse;
use crate::domain::SYMBOL;
use crate::Result;

/// 기본 Yahoo Finance 호스트
pub const DEFAULT_QUOTE_BASE_URL: &str = "https://query1.finance.yahoo.com";
/// Yahoo는 브라우저가 아닌 User-Agent 요청을 거부합니다.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0";

/// 시세 조회 설정
#[derive(Debug, Clone)]
pub struct QuoteConfig {
    /// API 호스트 (`QUOTE_BASE_URL`)
    pub base_url: String,
    /// 조회 종목
    pub symbol: String,
    /// 요청 타임아웃 초 (`QUOTE_TIMEOUT_SECS`)
    pub timeout_secs: u64,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_QUOTE_BASE_URL.to_string(),
            symbol: SYMBOL.to_string(),
            timeout_secs: 10,
        }
    }
}

impl QuoteConfig {
    /// 환경변수에서 설정 로드
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("QUOTE_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_QUOTE_BASE_URL.to_string()),
            symbol: SYMBOL.to_string(),
            timeout_secs: env_var_parse("QUOTE_TIMEOUT_SECS", 10),
        }
    }

    /// 요청 타임아웃을 Duration으로 반환
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// 차트 API URL
    pub fn chart_url(&self) -> String {
        format!("{}/v8/finance/chart/{}", self.base_url, self.symbol)
    }
}

/// 차트 API 응답 (필요한 필드만).
#[derive(Debug, Default, Deserialize)]
pub struct ChartResponse {
    #[serde(default)]
    pub chart: Chart,
}

#[derive(Debug, Default, Deserialize)]
pub struct Chart {
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChartResult {
    #[serde(default)]
    pub meta: ChartMeta,
    #[serde(default)]
    pub indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    #[serde(default)]
    pub regular_market_price: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<QuoteSeries>,
}

#[derive(Debug, Default, Deserialize)]
pub struct QuoteSeries {
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

/// 응답에서 현재가를 추출합니다.
pub fn extract_price(response: &ChartResponse) -> Option<f64> {
    let result = response.chart.result.as_ref()?.first()?;

    if let Some(price) = result.meta.regular_market_price {
        return Some(price);
    }

    result
        .indicators
        .quote
        .first()?
        .close
        .iter()
        .rev()
        .find_map(|close| *close)
}

/// 차트 API 클라이언트.
#[derive(Clone)]
pub struct QuoteClient {
    client: reqwest::Client,
    config: QuoteConfig,
}

impl QuoteClient {
    /// 새 클라이언트를 생성합니다.
    pub fn new(config: QuoteConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(BROWSER_USER_AGENT)
            .build()?;

        Ok(Self { client, config })
    }

    /// 설정 참조
    pub fn config(&self) -> &QuoteConfig {
        &self.config
    }

    /// 당일 1분봉 차트를 조회해 현재가를 반환합니다.
    ///
    /// 응답에 가격이 없으면 `Ok(None)`. 네트워크 오류, 2xx 이외의 상태,
    /// 잘못된 JSON은 `Err`.
    pub async fn fetch_latest_price(&self) -> Result<Option<f64>> {
        let response: ChartResponse = self
            .client
            .get(self.config.chart_url())
            .query(&[("interval", "1m"), ("range", "1d")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(extract_price(&response))
    }
}
