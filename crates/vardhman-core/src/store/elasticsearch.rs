//! Elasticsearch REST 구현.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{DocumentStore, SortOrder};
use crate::{MarketError, Result, StoreConfig};

/// Elasticsearch 클라이언트.
///
/// 생성 시점에는 네트워크 요청을 하지 않습니다. 연결 확인은 [`DocumentStore::ping`].
#[derive(Debug, Clone)]
pub struct ElasticsearchStore {
    client: reqwest::Client,
    host: String,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Hits,
}

#[derive(Debug, Default, Deserialize)]
struct Hits {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "_source")]
    source: Option<Value>,
}

fn store_error(err: reqwest::Error) -> MarketError {
    MarketError::Store(err.to_string())
}

impl ElasticsearchStore {
    /// 설정으로 클라이언트를 생성합니다.
    pub fn new(config: &StoreConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .danger_accept_invalid_certs(!config.verify_certs)
            .build()
            .map_err(store_error)?;

        Ok(Self {
            client,
            host: config.host.trim_end_matches('/').to_string(),
        })
    }

    /// 저장소 URL
    pub fn host(&self) -> &str {
        &self.host
    }
}

#[async_trait]
impl DocumentStore for ElasticsearchStore {
    async fn ping(&self) -> Result<()> {
        self.client
            .head(format!("{}/", self.host))
            .send()
            .await
            .map_err(store_error)?
            .error_for_status()
            .map_err(store_error)?;
        Ok(())
    }

    async fn index_document(&self, index: &str, document: &Value) -> Result<()> {
        self.client
            .post(format!("{}/{}/_doc", self.host, index))
            .json(document)
            .send()
            .await
            .map_err(store_error)?
            .error_for_status()
            .map_err(store_error)?;
        Ok(())
    }

    async fn search_by_timestamp(
        &self,
        index: &str,
        size: usize,
        order: SortOrder,
    ) -> Result<Vec<Value>> {
        let query = json!({
            "size": size,
            "sort": [{"timestamp": {"order": order.as_str()}}],
            "query": {"match_all": {}}
        });

        let response = self
            .client
            .post(format!("{}/{}/_search", self.host, index))
            .json(&query)
            .send()
            .await
            .map_err(store_error)?;

        // 아직 한 번도 기록되지 않은 인덱스
        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!(index = index, "Index does not exist yet");
            return Ok(Vec::new());
        }

        let body: SearchResponse = response
            .error_for_status()
            .map_err(store_error)?
            .json()
            .await
            .map_err(|e| MarketError::Parse(e.to_string()))?;

        Ok(body.hits.hits.into_iter().filter_map(|h| h.source).collect())
    }
}
