//! 환경변수 기반 predictor 설정.

use std::time::Duration;

use vardhman_core::{env_var_parse, MarketError, Result, StoreConfig, MIN_SAMPLES};

/// Predictor 설정
#[derive(Debug, Clone)]
pub struct PredictorConfig {
    /// Elasticsearch 설정
    pub store: StoreConfig,
    /// 적합에 사용할 최근 가격 수 (`LOOKBACK`)
    pub lookback: usize,
    /// 예측 주기 초 (`PRED_INTERVAL`)
    pub interval_secs: u64,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            lookback: 200,
            interval_secs: 30,
        }
    }
}

impl PredictorConfig {
    /// 환경변수에서 설정 로드
    pub fn from_env() -> Result<Self> {
        let config = Self {
            store: StoreConfig::from_env()?,
            lookback: env_var_parse("LOOKBACK", 200),
            interval_secs: env_var_parse("PRED_INTERVAL", 30),
        };
        config.validate()?;
        Ok(config)
    }

    /// 설정 값 검증
    pub fn validate(&self) -> Result<()> {
        if self.lookback < MIN_SAMPLES {
            return Err(MarketError::Config(format!(
                "LOOKBACK must be at least {}, got {}",
                MIN_SAMPLES, self.lookback
            )));
        }
        if self.interval_secs == 0 {
            return Err(MarketError::Config(
                "PRED_INTERVAL must be greater than 0".to_string(),
            ));
        }
        self.store.validate()
    }

    /// 예측 주기를 Duration으로 반환
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}
