//! 배당 기록 필터.
//!
//! 최근 최대 20개 배당 기록 연도(결측 연도는 먼저 제외) 중 "무배당"
//! 센티널과 같은 해가 하나도 없어야 합니다. 즉 기록이 있는 해마다
//! 배당이 지급됐어야 합니다.

use rust_decimal::Decimal;
use serde::Serialize;
use screener_core::AnnualDataset;

/// 배당 기록 필터.
#[derive(Debug, Clone)]
pub struct DividendRecord {
    /// "무배당" 센티널 값
    pub sentinel: Decimal,
    /// 조회 연수
    pub span: usize,
}

/// 배당 기록 진단.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DividendDiagnostic {
    /// 고려한 연수
    pub years: usize,
    /// 창 안에서 관찰된 최소 배당
    pub lowest: Option<Decimal>,
}

impl DividendRecord {
    /// 센티널과 조회 연수로 필터 생성.
    pub fn new(sentinel: Decimal, span: usize) -> Self {
        Self { sentinel, span }
    }

    fn window(&self, dataset: &AnnualDataset) -> Vec<Decimal> {
        let history = dataset.dividend_history();
        let span = history.len().min(self.span);
        history[..span].to_vec()
    }

    /// 판정: 창 안에 센티널과 같은 배당이 없는지.
    pub fn passes(&self, dataset: &AnnualDataset) -> bool {
        self.window(dataset).iter().all(|d| *d != self.sentinel)
    }

    /// 진단: (고려 연수, 관찰된 최소 배당).
    pub fn diagnose(&self, dataset: &AnnualDataset) -> DividendDiagnostic {
        let window = self.window(dataset);
        DividendDiagnostic {
            years: window.len(),
            lowest: window.iter().copied().min(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use screener_core::AnnualRecord;

    fn dataset(dividends: &[(i32, Option<Decimal>)]) -> AnnualDataset {
        let records = dividends
            .iter()
            .map(|(year, dividend)| {
                let mut r = AnnualRecord::new(*year);
                r.dividend = *dividend;
                r
            })
            .collect();
        AnnualDataset::new("test", records)
    }

    #[test]
    fn test_uninterrupted_dividends_pass() {
        let filter = DividendRecord::new(dec!(0), 20);
        let ds = dataset(&[
            (2016, Some(dec!(0.5))),
            (2015, Some(dec!(0.4))),
            (2014, Some(dec!(0.45))),
        ]);
        assert!(filter.passes(&ds));

        let diag = filter.diagnose(&ds);
        assert_eq!(diag.years, 3);
        assert_eq!(diag.lowest, Some(dec!(0.4)));
    }

    #[test]
    fn test_sentinel_year_fails() {
        let filter = DividendRecord::new(dec!(0), 20);
        let ds = dataset(&[(2016, Some(dec!(0.5))), (2015, Some(dec!(0)))]);
        assert!(!filter.passes(&ds));
    }

    #[test]
    fn test_absent_years_are_not_failures() {
        // 기록이 없는 해는 "무배당"이 아니라 "무기록"
        let filter = DividendRecord::new(dec!(0), 20);
        let ds = dataset(&[(2016, Some(dec!(0.5))), (2015, None), (2014, Some(dec!(0.4)))]);
        assert!(filter.passes(&ds));
        assert_eq!(filter.diagnose(&ds).years, 2);
    }

    #[test]
    fn test_empty_window_trivially_passes() {
        let filter = DividendRecord::new(dec!(0), 20);
        let ds = dataset(&[(2016, None)]);
        assert!(filter.passes(&ds));
        assert_eq!(filter.diagnose(&ds).lowest, None);
    }
}
