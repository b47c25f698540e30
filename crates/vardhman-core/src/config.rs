//! 환경변수 기반 공통 설정.

use crate::{MarketError, Result};
use std::time::Duration;

/// 기본 Elasticsearch 주소 (docker-compose 서비스 이름)
pub const DEFAULT_STORE_HOST: &str = "http://elasticsearch:9200";

/// Elasticsearch 연결 설정
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// 저장소 URL (`ELASTICSEARCH_HOST`)
    pub host: String,
    /// TLS 인증서 검증 여부 (`ES_VERIFY_CERTS`)
    pub verify_certs: bool,
    /// 요청 타임아웃 초 (`ES_REQUEST_TIMEOUT_SECS`)
    pub request_timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_STORE_HOST.to_string(),
            verify_certs: false,
            request_timeout_secs: 30,
        }
    }
}

impl StoreConfig {
    /// 환경변수에서 설정 로드
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("ELASTICSEARCH_HOST")
            .unwrap_or_else(|_| DEFAULT_STORE_HOST.to_string());

        let config = Self {
            host: host.trim_end_matches('/').to_string(),
            verify_certs: env_var_bool("ES_VERIFY_CERTS", false),
            request_timeout_secs: env_var_parse("ES_REQUEST_TIMEOUT_SECS", 30),
        };
        config.validate()?;
        Ok(config)
    }

    /// 설정 값 검증
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(MarketError::Config(
                "ELASTICSEARCH_HOST must not be empty".to_string(),
            ));
        }
        if !self.host.starts_with("http://") && !self.host.starts_with("https://") {
            return Err(MarketError::Config(format!(
                "ELASTICSEARCH_HOST must be an http(s) URL, got '{}'",
                self.host
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(MarketError::Config(
                "ES_REQUEST_TIMEOUT_SECS must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// 요청 타임아웃을 Duration으로 반환
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// `.env` 파일이 있으면 로드합니다.
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

/// 환경변수에서 값을 파싱 (실패 시 기본값 사용)
pub fn env_var_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// 환경변수에서 bool 값 파싱
pub fn env_var_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| {
            let v = v.trim().to_lowercase();
            v == "true" || v == "1"
        })
        .unwrap_or(default)
}
