//! # Vardhman Core
//!
//! 가격 exporter와 predictor가 공유하는 핵심 타입과 클라이언트를 제공합니다:
//! - 가격/예측 레코드 및 반올림 규칙
//! - Elasticsearch 저장소 클라이언트와 재시도 커넥터
//! - Yahoo Finance 차트 API 시세 클라이언트
//! - 최소제곱 선형 추세 모델
//! - 환경변수 기반 설정
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod quote;
pub mod stats;
pub mod store;

pub use config::{env_var_bool, env_var_parse, load_dotenv, StoreConfig};
pub use domain::*;
pub use error::{MarketError, Result};
pub use logging::{init_logging, LogConfig, LogFormat};
pub use quote::{extract_price, QuoteClient, QuoteConfig};
pub use stats::{CycleOutcome, CycleStats};
pub use store::{
    coerce_price, index_record, latest_prediction, recent_prices, DocumentStore,
    ElasticsearchStore, SortOrder, StoreConnector,
};
