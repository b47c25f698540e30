//! 문서 저장소 추상화.
//!
//! 두 프로세스는 Elasticsearch의 두 인덱스(가격, 예측)를 통해서만 협력합니다.
//! 루프와 핸들러는 [`DocumentStore`] 트레이트에만 의존하므로 테스트에서는
//! 메모리 구현으로 대체할 수 있습니다.

mod connector;
mod elasticsearch;
mod series;

pub use connector::StoreConnector;
pub use elasticsearch::ElasticsearchStore;
pub use series::{coerce_price, index_record, latest_prediction, recent_prices};

use async_trait::async_trait;
use serde_json::Value;

use crate::Result;

/// `timestamp` 정렬 방향
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// 쿼리 DSL 문자열
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// append-only 문서 저장소.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// 가벼운 생존 확인
    async fn ping(&self) -> Result<()>;

    /// 문서 하나를 인덱스에 추가합니다.
    async fn index_document(&self, index: &str, document: &Value) -> Result<()>;

    /// `timestamp` 기준으로 정렬된 최대 `size`개 문서의 `_source`를 반환합니다.
    async fn search_by_timestamp(
        &self,
        index: &str,
        size: usize,
        order: SortOrder,
    ) -> Result<Vec<Value>>;
}
