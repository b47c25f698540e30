//! Exporter 공유 상태.
//!
//! 최신 가격 캐시는 수집 루프만 쓰고 메트릭 핸들러만 읽습니다.
//! 값은 항상 [`LatestPrice`] 전체를 한 번에 교체하므로 읽는 쪽이 가격과
//! 시각이 섞인 중간 상태를 볼 수 없습니다.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use vardhman_core::{DocumentStore, StoreConnector};

/// 마지막으로 조회한 가격
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatestPrice {
    /// 소수점 둘째 자리로 반올림된 가격
    pub price: Decimal,
    /// 조회 시각 (UTC)
    pub timestamp: DateTime<Utc>,
}

/// 수집 루프와 HTTP 핸들러가 공유하는 상태
pub struct ExporterState {
    latest: RwLock<Option<LatestPrice>>,
    store: RwLock<Option<Arc<dyn DocumentStore>>>,
    connector: StoreConnector,
}

impl ExporterState {
    /// 연결되지 않은 상태로 생성합니다.
    pub fn new(connector: StoreConnector) -> Self {
        Self {
            latest: RwLock::new(None),
            store: RwLock::new(None),
            connector,
        }
    }

    /// 이미 연결된 저장소를 지정합니다.
    pub fn with_store(self, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store: RwLock::new(Some(store)),
            ..self
        }
    }

    /// 최신 가격을 교체합니다.
    pub async fn set_latest_price(&self, latest: LatestPrice) {
        *self.latest.write().await = Some(latest);
    }

    /// 최신 가격. 프로세스 시작 후 아직 조회된 적이 없으면 `None`.
    pub async fn latest_price(&self) -> Option<LatestPrice> {
        *self.latest.read().await
    }

    /// 현재 저장소 핸들 (재연결하지 않음)
    pub async fn store(&self) -> Option<Arc<dyn DocumentStore>> {
        self.store.read().await.clone()
    }

    /// 연결 여부
    pub async fn has_store(&self) -> bool {
        self.store.read().await.is_some()
    }

    /// 저장소 핸들을 반환하고, 없으면 한 번 새로 생성합니다.
    ///
    /// 생성 실패는 로그만 남기고 `None`을 반환합니다.
    pub async fn store_or_reconnect(&self) -> Option<Arc<dyn DocumentStore>> {
        if let Some(store) = self.store().await {
            return Some(store);
        }

        let mut slot = self.store.write().await;
        if let Some(store) = slot.as_ref() {
            return Some(store.clone());
        }

        match self.connector.instantiate() {
            Ok(store) => {
                tracing::info!(host = %store.host(), "Elasticsearch client re-created");
                let store: Arc<dyn DocumentStore> = Arc::new(store);
                *slot = Some(store.clone());
                Some(store)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Elasticsearch client re-creation failed");
                None
            }
        }
    }
}
