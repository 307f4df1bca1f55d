//! 적정 주가순자산 필터.
//!
//! P/B와 P/E가 모두 기록된 가장 최근 연도 한 해만 봅니다. 그런 해가
//! 없으면 탈락, P/B가 상한을 넘으면 탈락, P/E × P/B가 상한을 넘으면
//! 탈락, 나머지는 통과입니다.

use rust_decimal::Decimal;
use serde::Serialize;
use screener_core::{AnnualDataset, ScreenerError, ScreenerResult};

/// 적정 주가순자산 필터.
#[derive(Debug, Clone)]
pub struct PriceToAssets {
    /// P/B 상한
    pub pb_limit: Decimal,
    /// P/E × P/B 상한
    pub pe_pb_limit: Decimal,
}

/// 주가순자산 진단.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetsDiagnostic {
    /// P/B
    pub pb: Decimal,
    /// P/E × P/B
    pub pe_pb: Decimal,
}

impl PriceToAssets {
    /// 두 상한으로 필터 생성.
    pub fn new(pb_limit: Decimal, pe_pb_limit: Decimal) -> Self {
        Self { pb_limit, pe_pb_limit }
    }

    /// P/B와 P/E가 모두 기록된 가장 최근 연도의 (P/B, P/E).
    fn qualifying(&self, dataset: &AnnualDataset) -> Option<(Decimal, Decimal)> {
        dataset
            .records()
            .iter()
            .find_map(|r| Some((r.price_to_book?, r.price_to_earnings?)))
    }

    /// 판정: 자격 연도가 없거나 상한을 넘으면 탈락.
    pub fn passes(&self, dataset: &AnnualDataset) -> bool {
        match self.qualifying(dataset) {
            None => false,
            Some((pb, pe)) => pb <= self.pb_limit && pe * pb <= self.pe_pb_limit,
        }
    }

    /// 진단: (P/B, P/E × P/B). 자격 연도가 없으면 평가 불가.
    pub fn diagnose(&self, dataset: &AnnualDataset) -> ScreenerResult<AssetsDiagnostic> {
        let (pb, pe) = self.qualifying(dataset).ok_or_else(|| {
            ScreenerError::MissingInput("P/B와 P/E가 모두 기록된 연도 없음".to_string())
        })?;
        Ok(AssetsDiagnostic { pb, pe_pb: pe * pb })
    }
}
