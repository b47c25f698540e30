//! 도메인 모델.

pub mod records;
pub mod trend;

pub use records::*;
pub use trend::{forecast_next, LinearTrend, MIN_SAMPLES};
