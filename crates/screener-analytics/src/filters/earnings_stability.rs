//! 이익 안정성 필터.
//!
//! 최근 최대 10개 EPS 기록 연도(결측 연도는 먼저 제외) 전부가 하한을
//! 초과해야 합니다. 기록 연도가 하나도 없으면 자명하게 통과합니다.

use rust_decimal::Decimal;
use serde::Serialize;
use screener_core::AnnualDataset;

/// 이익 안정성 필터.
#[derive(Debug, Clone)]
pub struct EarningsStability {
    /// EPS 하한 (초과해야 통과)
    pub eps_floor: Decimal,
    /// 조회 연수
    pub span: usize,
}

/// 이익 안정성 진단.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StabilityDiagnostic {
    /// 고려한 연수
    pub years: usize,
    /// 창 안에서 관찰된 최소 EPS
    pub lowest: Option<Decimal>,
}

impl EarningsStability {
    /// 하한과 조회 연수로 필터 생성.
    pub fn new(eps_floor: Decimal, span: usize) -> Self {
        Self { eps_floor, span }
    }

    fn window(&self, dataset: &AnnualDataset) -> Vec<Decimal> {
        let history = dataset.eps_history();
        let span = history.len().min(self.span);
        history[..span].to_vec()
    }

    /// 판정: 창 안의 모든 EPS가 하한 초과.
    pub fn passes(&self, dataset: &AnnualDataset) -> bool {
        self.window(dataset).iter().all(|eps| *eps > self.eps_floor)
    }

    /// 진단: (고려 연수, 관찰된 최소 EPS).
    pub fn diagnose(&self, dataset: &AnnualDataset) -> StabilityDiagnostic {
        let window = self.window(dataset);
        StabilityDiagnostic {
            years: window.len(),
            lowest: window.iter().copied().min(),
        }
    }
}
