//! 재시도 기반 저장소 커넥터.
//!
//! 오케스트레이션 환경에서는 Elasticsearch가 늦게 뜨는 경우가 흔하므로
//! 시작 시 고정 간격으로 여러 번 ping을 시도합니다. 재시도 예산을 모두
//! 소진했을 때의 정책은 `fail_on_unreachable`로 결정합니다:
//! - `true`: 에러 반환 (predictor는 종료 코드 1로 종료)
//! - `false`: 연결 없이 시작하고 첫 사용 시 다시 생성 (exporter)

use std::time::Duration;

use super::{DocumentStore, ElasticsearchStore};
use crate::{MarketError, Result, StoreConfig};

/// 저장소 커넥터
#[derive(Debug, Clone)]
pub struct StoreConnector {
    config: StoreConfig,
    max_attempts: u32,
    retry_delay: Duration,
    fail_on_unreachable: bool,
}

impl StoreConnector {
    /// 기본 정책 (15회, 5초 간격, 실패 시 에러)
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            max_attempts: 15,
            retry_delay: Duration::from_secs(5),
            fail_on_unreachable: true,
        }
    }

    /// Exporter 정책: 20회, 3초 간격, 연결 실패해도 시작
    pub fn for_exporter(config: StoreConfig) -> Self {
        Self::new(config)
            .with_max_attempts(20)
            .with_retry_delay(Duration::from_secs(3))
            .fail_on_unreachable(false)
    }

    /// Predictor 정책: 15회, 5초 간격, 연결 실패 시 에러
    pub fn for_predictor(config: StoreConfig) -> Self {
        Self::new(config)
            .with_max_attempts(15)
            .with_retry_delay(Duration::from_secs(5))
            .fail_on_unreachable(true)
    }

    /// 최대 시도 횟수 설정 (최소 1)
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// 시도 간 대기 시간 설정
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// 재시도 예산 소진 시 에러 반환 여부 설정
    pub fn fail_on_unreachable(mut self, fail: bool) -> Self {
        self.fail_on_unreachable = fail;
        self
    }

    /// 저장소 설정
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// 최대 시도 횟수
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// ping 없이 클라이언트만 생성합니다 (지연 재연결용).
    pub fn instantiate(&self) -> Result<ElasticsearchStore> {
        ElasticsearchStore::new(&self.config)
    }

    /// ping이 성공할 때까지 재시도합니다.
    ///
    /// 성공 시 `Ok(Some(store))`. 재시도 예산을 모두 소진하면
    /// `fail_on_unreachable`에 따라 `Err(StoreUnreachable)` 또는 `Ok(None)`.
    pub async fn connect(&self) -> Result<Option<ElasticsearchStore>> {
        for attempt in 1..=self.max_attempts {
            let outcome = match self.instantiate() {
                Ok(store) => store.ping().await.map(|_| store),
                Err(e) => Err(e),
            };

            match outcome {
                Ok(store) => {
                    tracing::info!(host = %self.config.host, attempt, "Connected to Elasticsearch");
                    return Ok(Some(store));
                }
                // 설정 오류는 재시도해도 바뀌지 않음
                Err(e @ MarketError::Config(_)) => return Err(e),
                Err(e) => {
                    tracing::warn!(
                        host = %self.config.host,
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %e,
                        "Elasticsearch not ready"
                    );
                }
            }

            if attempt < self.max_attempts {
                tokio::time::sleep(self.retry_delay).await;
            }
        }

        if self.fail_on_unreachable {
            tracing::error!(
                host = %self.config.host,
                attempts = self.max_attempts,
                "Could not connect to Elasticsearch after retries"
            );
            Err(MarketError::StoreUnreachable {
                host: self.config.host.clone(),
                attempts: self.max_attempts,
            })
        } else {
            tracing::warn!(
                host = %self.config.host,
                attempts = self.max_attempts,
                "Could not connect to Elasticsearch after retries, starting without a connection"
            );
            Ok(None)
        }
    }
}
