//! 최소제곱 선형 추세 모델.
//!
//! 가격을 순번(0, 1, ..., n-1)에 대해 회귀하고 한 칸 뒤(n)의 값을 외삽합니다.
//! 계절성이나 자기상관은 고려하지 않습니다.

/// 예측에 필요한 최소 표본 수
pub const MIN_SAMPLES: usize = 3;

/// 순번에 대한 선형 적합 결과.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTrend {
    /// 기울기 (순번 1 증가당 가격 변화)
    pub slope: f64,
    /// 절편 (순번 0의 적합값)
    pub intercept: f64,
    /// 적합에 사용된 표본 수
    pub samples: usize,
}

impl LinearTrend {
    /// 가격 시계열에 OLS를 적합합니다.
    ///
    /// 표본이 [`MIN_SAMPLES`]보다 적거나 유한하지 않은 값이 섞여 있으면 `None`.
    pub fn fit(prices: &[f64]) -> Option<Self> {
        if prices.len() < MIN_SAMPLES || prices.iter().any(|p| !p.is_finite()) {
            return None;
        }

        let n = prices.len() as f64;
        let mean_x = (n - 1.0) / 2.0;
        let mean_y = prices.iter().sum::<f64>() / n;

        let (sxx, sxy) = prices
            .iter()
            .enumerate()
            .fold((0.0, 0.0), |(sxx, sxy), (i, &y)| {
                let dx = i as f64 - mean_x;
                (sxx + dx * dx, sxy + dx * (y - mean_y))
            });

        let slope = sxy / sxx;
        let intercept = mean_y - slope * mean_x;
        if !slope.is_finite() || !intercept.is_finite() {
            return None;
        }

        Some(Self {
            slope,
            intercept,
            samples: prices.len(),
        })
    }

    /// 순번 `x`에서의 적합값.
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    /// 마지막 관측 다음 순번(`samples`)의 예측값.
    pub fn forecast_next(&self) -> f64 {
        self.predict(self.samples as f64)
    }
}

/// `prices`에 적합한 추세로 다음 값을 예측합니다.
pub fn forecast_next(prices: &[f64]) -> Option<f64> {
    LinearTrend::fit(prices).map(|trend| trend.forecast_next())
}
