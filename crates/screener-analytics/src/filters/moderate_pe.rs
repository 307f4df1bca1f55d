//! 적정 P/E 필터.
//!
//! 최근 3개 EPS 기록 연도의 평균으로 현재가를 나눈 P/E가
//! 0 초과, 상한 미만이어야 합니다. 기록 연도가 3개 미만이면 전제조건
//! 위반으로 평가 불가입니다. 평균이 0이면 나눗셈 장애를 피하기 위해
//! P/E를 0으로 정의합니다 (무한대가 아님).

use rust_decimal::Decimal;
use serde::Serialize;
use screener_core::{AnnualDataset, ScreenerError, ScreenerResult};

/// 적정 P/E 필터.
#[derive(Debug, Clone)]
pub struct ModeratePe {
    /// P/E 상한
    pub pe_limit: Decimal,
    /// 평균에 사용하는 연수
    pub years: usize,
}

/// P/E 진단.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeDiagnostic {
    /// 사용한 연수
    pub years: usize,
    /// 계산된 P/E
    pub pe: Decimal,
}

impl ModeratePe {
    /// 상한과 평균 연수로 필터 생성.
    pub fn new(pe_limit: Decimal, years: usize) -> Self {
        Self { pe_limit, years }
    }

    /// 판정: 0 < P/E < 상한.
    pub fn passes(
        &self,
        dataset: &AnnualDataset,
        price: Option<Decimal>,
    ) -> ScreenerResult<bool> {
        let pe = self.price_to_earnings(dataset, price)?;
        Ok(Decimal::ZERO < pe && pe < self.pe_limit)
    }

    /// 진단: (사용 연수, 계산된 P/E).
    pub fn diagnose(
        &self,
        dataset: &AnnualDataset,
        price: Option<Decimal>,
    ) -> ScreenerResult<PeDiagnostic> {
        Ok(PeDiagnostic {
            years: self.years,
            pe: self.price_to_earnings(dataset, price)?,
        })
    }

    fn price_to_earnings(
        &self,
        dataset: &AnnualDataset,
        price: Option<Decimal>,
    ) -> ScreenerResult<Decimal> {
        let price = price
            .ok_or_else(|| ScreenerError::MissingInput("현재가 없음".to_string()))?;

        let history = dataset.eps_history();
        if history.len() < self.years {
            return Err(ScreenerError::InsufficientHistory {
                required: self.years,
                available: history.len(),
            });
        }

        let sum: Decimal = history[..self.years].iter().copied().sum();
        let average = sum / Decimal::from(self.years as i64);

        if average.is_zero() {
            Ok(Decimal::ZERO)
        } else {
            Ok(price / average)
        }
    }
}
