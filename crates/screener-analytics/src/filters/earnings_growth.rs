//! 이익 성장 필터.
//!
//! 최근 최대 10개 EPS 기록 연도에서 "최근" 평균과 "초기" 평균을 비교해
//! 성장률 = recent/early − 1을 구합니다.
//!
//! - 7년 이상: 최근 3년 평균 vs 창 안의 가장 오래된 3년 평균
//! - 정확히 5년: 최근 2년 평균 vs 4·5번째 연도 평균
//! - 그 외(특히 4년과 6년): 성장률 = −1
//!
//! 4년과 6년 이력이 부분 분기에 들지 않는 경계 비대칭은 하위 호환을
//! 위해 유지되는 동작이며 테스트로 고정돼 있습니다. 매끄럽게 고치지
//! 않습니다. 초기 평균이 0 이하이면 나눗셈 대신 성장률을 −1로
//! 정의합니다.

use rust_decimal::Decimal;
use serde::Serialize;
use screener_core::AnnualDataset;

/// 이익 성장 필터.
#[derive(Debug, Clone)]
pub struct EarningsGrowth {
    /// 최소 성장률 (recent/early − 1)
    pub growth_target: Decimal,
    /// 조회 연수
    pub span: usize,
}

/// 이익 성장 진단.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthDiagnostic {
    /// 고려한 연수
    pub years: usize,
    /// 성장률 (계산 불가 시 −1)
    pub growth: Decimal,
}

/// 성장률 계산 중간값.
struct Computation {
    years: usize,
    growth: Decimal,
    /// (최근 평균, 초기 평균) — 연수가 분기에 들지 않으면 None
    averages: Option<(Decimal, Decimal)>,
}

impl EarningsGrowth {
    /// 성장 목표와 조회 연수로 필터 생성.
    pub fn new(growth_target: Decimal, span: usize) -> Self {
        Self { growth_target, span }
    }

    fn compute(&self, dataset: &AnnualDataset) -> Computation {
        let history = dataset.eps_history();
        let years = history.len().min(self.span);

        let averages = if years > 6 {
            let recent = mean(&history[..3]);
            let early = mean(&history[years - 3..years]);
            Some((recent, early))
        } else if years == 5 {
            let recent = mean(&history[..2]);
            let early = mean(&history[3..5]);
            Some((recent, early))
        } else {
            None
        };

        let growth = match averages {
            Some((recent, early)) if early > Decimal::ZERO => recent / early - Decimal::ONE,
            _ => -Decimal::ONE,
        };

        Computation {
            years,
            growth,
            averages,
        }
    }

    /// 판정: 성장률이 목표 이상이고 두 평균이 모두 0 이상인지.
    pub fn passes(&self, dataset: &AnnualDataset) -> bool {
        let c = self.compute(dataset);
        match c.averages {
            Some((recent, early)) => {
                c.growth >= self.growth_target
                    && recent >= Decimal::ZERO
                    && early >= Decimal::ZERO
            }
            None => false,
        }
    }

    /// 진단: (고려 연수, 성장률).
    pub fn diagnose(&self, dataset: &AnnualDataset) -> GrowthDiagnostic {
        let c = self.compute(dataset);
        GrowthDiagnostic {
            years: c.years,
            growth: c.growth,
        }
    }
}

fn mean(values: &[Decimal]) -> Decimal {
    let sum: Decimal = values.iter().copied().sum();
    sum / Decimal::from(values.len() as i64)
}
