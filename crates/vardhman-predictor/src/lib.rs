//! Vardhman price predictor.
//!
//! 주기적으로 최근 가격 N개를 읽어 선형 추세를 적합하고 다음 가격 예측을
//! `vardhman_predictions` 인덱스에 기록합니다.

pub mod config;
pub mod predict;

pub use config::PredictorConfig;
pub use predict::{run_predict_cycle, run_predict_loop};
