//! 에러 타입 정의.

use thiserror::Error;

/// exporter/predictor 공통 에러.
#[derive(Debug, Error)]
pub enum MarketError {
    /// 설정 에러
    #[error("Configuration error: {0}")]
    Config(String),

    /// 네트워크 에러 (연결 실패, 타임아웃)
    #[error("Network error: {0}")]
    Network(String),

    /// 외부 서비스가 2xx가 아닌 상태 코드를 반환
    #[error("Upstream returned HTTP {status}: {url}")]
    UpstreamStatus { status: u16, url: String },

    /// 응답 파싱 에러
    #[error("Parse error: {0}")]
    Parse(String),

    /// 저장소 요청 에러
    #[error("Store error: {0}")]
    Store(String),

    /// 재시도 예산을 모두 소진해도 저장소에 연결할 수 없음
    #[error("Store unreachable at {host} after {attempts} attempts")]
    StoreUnreachable { host: String, attempts: u32 },
}

impl MarketError {
    /// 일시적인 장애로 다음 주기에 재시도할 가치가 있는지 확인합니다.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::UpstreamStatus { .. } | Self::Store(_)
        )
    }
}

impl From<reqwest::Error> for MarketError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::UpstreamStatus {
                status: status.as_u16(),
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
            };
        }
        if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for MarketError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Result 타입 별칭
pub type Result<T> = std::result::Result<T, MarketError>;
