//! 기업 규모 필터.
//!
//! 직전 회계연도(내림차순 인덱스 1)의 매출이 기준을 넘어야 합니다.
//! 최신 연도는 잠정·미완결 집계일 수 있어 의도적으로 건너뜁니다.

use rust_decimal::Decimal;
use screener_core::{AnnualDataset, Field, ScreenerError, ScreenerResult};

/// 기업 규모 필터.
#[derive(Debug, Clone)]
pub struct AdequateSize {
    /// 최소 매출 (발행 통화 백만 단위)
    pub turnover_limit: Decimal,
}

impl AdequateSize {
    /// 매출 기준으로 필터 생성.
    pub fn new(turnover_limit: Decimal) -> Self {
        Self { turnover_limit }
    }

    /// 판정: 직전 연도 매출이 기준을 초과하는지 (엄격한 `>`).
    pub fn passes(&self, dataset: &AnnualDataset) -> ScreenerResult<bool> {
        Ok(self.turnover(dataset)? > self.turnover_limit)
    }

    /// 진단: 판정에 사용된 매출 값.
    pub fn turnover(&self, dataset: &AnnualDataset) -> ScreenerResult<Decimal> {
        let record = dataset
            .record_at(1)
            .ok_or(ScreenerError::InsufficientHistory {
                required: 2,
                available: dataset.len(),
            })?;
        record
            .get(Field::Turnover)
            .ok_or_else(|| ScreenerError::MissingInput(format!("{}년 매출 없음", record.year)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use screener_core::AnnualRecord;

    fn dataset(turnovers: &[(i32, Option<Decimal>)]) -> AnnualDataset {
        let records = turnovers
            .iter()
            .map(|(year, turnover)| {
                let mut r = AnnualRecord::new(*year);
                r.turnover = *turnover;
                r
            })
            .collect();
        AnnualDataset::new("test", records)
    }

    #[test]
    fn test_second_most_recent_year_is_used() {
        let filter = AdequateSize::new(dec!(100));
        // 최신 연도(2016)는 50이어도 무관, 직전 연도(2015)가 150이면 통과
        let ds = dataset(&[(2016, Some(dec!(50))), (2015, Some(dec!(150))), (2014, Some(dec!(90)))]);
        assert!(filter.passes(&ds).unwrap());
        assert_eq!(filter.turnover(&ds).unwrap(), dec!(150));
    }

    #[test]
    fn test_exact_limit_fails() {
        let filter = AdequateSize::new(dec!(100));
        let ds = dataset(&[(2016, Some(dec!(500))), (2015, Some(dec!(100)))]);
        assert!(!filter.passes(&ds).unwrap());
    }

    #[test]
    fn test_single_year_cannot_evaluate() {
        let filter = AdequateSize::new(dec!(100));
        let ds = dataset(&[(2016, Some(dec!(500)))]);
        let err = filter.passes(&ds).unwrap_err();
        assert!(matches!(err, ScreenerError::InsufficientHistory { required: 2, available: 1 }));
        assert!(err.is_evaluation_failure());
    }

    #[test]
    fn test_absent_turnover_cannot_evaluate() {
        let filter = AdequateSize::new(dec!(100));
        let ds = dataset(&[(2016, Some(dec!(500))), (2015, None)]);
        let err = filter.passes(&ds).unwrap_err();
        assert!(matches!(err, ScreenerError::MissingInput(_)));
    }
}
