//! 환경변수 기반 exporter 설정.

use std::net::SocketAddr;
use std::time::Duration;

use vardhman_core::{env_var_parse, MarketError, QuoteConfig, Result, StoreConfig};

/// Exporter 설정
#[derive(Debug, Clone)]
pub struct ExporterConfig {
    /// Elasticsearch 설정
    pub store: StoreConfig,
    /// 시세 조회 설정
    pub quote: QuoteConfig,
    /// 메트릭 서버 포트 (`EXPORTER_PORT`)
    pub port: u16,
    /// 시세 조회 주기 초 (`FETCH_INTERVAL`)
    pub fetch_interval_secs: u64,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            quote: QuoteConfig::default(),
            port: 8000,
            fetch_interval_secs: 15,
        }
    }
}

impl ExporterConfig {
    /// 환경변수에서 설정 로드
    pub fn from_env() -> Result<Self> {
        let config = Self {
            store: StoreConfig::from_env()?,
            quote: QuoteConfig::from_env(),
            port: env_var_parse("EXPORTER_PORT", 8000),
            fetch_interval_secs: env_var_parse("FETCH_INTERVAL", 15),
        };
        config.validate()?;
        Ok(config)
    }

    /// 설정 값 검증
    pub fn validate(&self) -> Result<()> {
        if self.fetch_interval_secs == 0 {
            return Err(MarketError::Config(
                "FETCH_INTERVAL must be greater than 0".to_string(),
            ));
        }
        if self.quote.timeout_secs == 0 {
            return Err(MarketError::Config(
                "QUOTE_TIMEOUT_SECS must be greater than 0".to_string(),
            ));
        }
        self.store.validate()
    }

    /// 시세 조회 주기를 Duration으로 반환
    pub fn fetch_interval(&self) -> Duration {
        Duration::from_secs(self.fetch_interval_secs)
    }

    /// 메트릭 서버 바인딩 주소 (모든 인터페이스)
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExporterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.fetch_interval(), Duration::from_secs(15));
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8000");
        assert_eq!(config.quote.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config = ExporterConfig {
            fetch_interval_secs: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(MarketError::Config(_))));
    }
}
