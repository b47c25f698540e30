//! Vardhman price exporter.
//!
//! 백그라운드 태스크가 주기적으로 Yahoo Finance에서 현재가를 가져와
//! Elasticsearch에 기록하고, HTTP 서버는 `/metrics`로 현재가와 최신 예측값을
//! 노출합니다. 두 쪽은 [`ExporterState`]를 공유합니다.

pub mod collector;
pub mod config;
pub mod metrics;
pub mod state;

#[cfg(test)]
mod testing;

pub use collector::{run_fetch_cycle, run_fetch_loop};
pub use config::ExporterConfig;
pub use metrics::{create_router, render_metrics};
pub use state::{ExporterState, LatestPrice};
