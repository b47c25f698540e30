//! 주기 실행 통계.

use serde::{Deserialize, Serialize};

/// 루프 시작 이후 누적 통계
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleStats {
    /// 실행된 주기 수
    pub cycles: u64,
    /// 저장소에 문서를 기록한 주기 수
    pub written: u64,
    /// 데이터 부족으로 건너뛴 주기 수
    pub skipped: u64,
    /// 에러가 발생한 주기 수 (조회/기록 실패)
    pub errors: u64,
}

/// 한 주기의 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// 문서 기록 성공
    Written,
    /// 기록할 데이터 없음
    Skipped,
    /// 실패 (로그만 남기고 계속)
    Failed,
}

impl CycleStats {
    /// 새 통계 객체 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 주기 결과 반영
    pub fn record(&mut self, outcome: CycleOutcome) {
        self.cycles += 1;
        match outcome {
            CycleOutcome::Written => self.written += 1,
            CycleOutcome::Skipped => self.skipped += 1,
            CycleOutcome::Failed => self.errors += 1,
        }
    }

    /// 기록 성공률 (%)
    pub fn success_rate(&self) -> f64 {
        if self.cycles == 0 {
            0.0
        } else {
            (self.written as f64 / self.cycles as f64) * 100.0
        }
    }

    /// 통계 요약 로그 출력
    pub fn log_summary(&self, operation: &str) {
        tracing::info!(
            operation = operation,
            cycles = self.cycles,
            written = self.written,
            skipped = self.skipped,
            errors = self.errors,
            success_rate = format!("{:.1}%", self.success_rate()),
            "주기 통계"
        );
    }
}
