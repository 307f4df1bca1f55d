//! 스크리닝 실행.
//!
//! 작업 집합의 회사를 하나씩 필터 배터리에 통과시켜 보고서를
//! 만듭니다. 실행에 필요한 상태는 전부 컨텍스트로 주입되며, 실행
//! 간에 살아남는 프로세스 전역 상태는 없습니다. 회사 간 평가 순서에
//! 의존하는 로직도 없습니다 (연도 순서만 의미를 가짐).

use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::{info, warn};

use screener_core::{AnnualDataset, AppConfig, ScreeningConfig, Universe};
use screener_data::DatasetStore;

use crate::filters::{
    AdequateSize, DividendRecord, EarningsGrowth, EarningsStability, FilterId, ModeratePe,
    PriceToAssets,
};
use crate::report::{DiagnosticBundle, ScreeningReport};

/// 설정에서 구성한 필터 일습.
#[derive(Debug, Clone)]
pub struct FilterSet {
    pub adequate_size: AdequateSize,
    pub earnings_stability: EarningsStability,
    pub dividend_record: DividendRecord,
    pub earnings_growth: EarningsGrowth,
    pub moderate_pe: ModeratePe,
    pub price_to_assets: PriceToAssets,
}

impl FilterSet {
    /// 스크리닝 설정으로 필터 일습을 구성합니다.
    pub fn from_config(config: &ScreeningConfig) -> Self {
        Self {
            adequate_size: AdequateSize::new(config.turnover_limit),
            earnings_stability: EarningsStability::new(config.eps_floor, config.stability_span),
            dividend_record: DividendRecord::new(config.dividend_sentinel, config.dividend_span),
            earnings_growth: EarningsGrowth::new(config.growth_target, config.growth_span),
            moderate_pe: ModeratePe::new(config.pe_limit, config.pe_years),
            price_to_assets: PriceToAssets::new(config.pb_limit, config.pe_pb_limit),
        }
    }
}

/// 한 번의 스크리닝 실행 컨텍스트.
pub struct ScreeningRun<'a, S: DatasetStore> {
    store: &'a S,
    universe: &'a Universe,
    prices: &'a HashMap<String, Decimal>,
    filters: FilterSet,
    manual_exclusions: Vec<String>,
}

impl<'a, S: DatasetStore> ScreeningRun<'a, S> {
    /// 실행 컨텍스트를 구성합니다.
    pub fn new(
        store: &'a S,
        universe: &'a Universe,
        prices: &'a HashMap<String, Decimal>,
        config: &AppConfig,
    ) -> Self {
        Self {
            store,
            universe,
            prices,
            filters: FilterSet::from_config(&config.screening),
            manual_exclusions: config.exclusions.manual.clone(),
        }
    }

    /// 작업 집합 전체를 평가해 보고서를 만듭니다.
    ///
    /// 작업 집합 = 전체 − 스냅샷 결측 − 수동 제외. 평가 실패는
    /// 회사/필터 단위 노트로 강등되고 배치는 계속 진행됩니다.
    pub fn execute(&self) -> ScreeningReport {
        let working = self
            .store
            .working_ids(self.universe, &self.manual_exclusions);
        info!(
            total = self.universe.len(),
            working = working.len(),
            "스크리닝 시작"
        );

        let mut report = ScreeningReport::new();
        let mut datasets: HashMap<String, AnnualDataset> = HashMap::new();

        for id in &working {
            let dataset = match self.store.get(id) {
                Ok(dataset) => dataset,
                Err(err) => {
                    // 저장소 장애도 회사 단위로 격리
                    warn!(company = %id, error = %err, "데이터셋 로드 실패");
                    report.note(id, None, err.to_string());
                    continue;
                }
            };
            self.evaluate(id, &dataset, &mut report);
            datasets.insert(id.clone(), dataset);
        }

        report.compute_combined();

        // 결합 통과 회사마다 각 필터의 진단 형태를 재호출해 근거를 수집
        for id in report.combined.clone() {
            if let Some(dataset) = datasets.get(&id) {
                let bundle = self.diagnose(&id, dataset);
                report.push_bundle(bundle);
            }
        }

        info!(combined = report.combined.len(), "스크리닝 완료");
        report
    }

    fn price_of(&self, id: &str) -> Option<Decimal> {
        self.prices.get(id).copied()
    }

    /// 한 회사를 여섯 필터에 통과시킵니다.
    fn evaluate(&self, id: &str, dataset: &AnnualDataset, report: &mut ScreeningReport) {
        match self.filters.adequate_size.passes(dataset) {
            Ok(true) => report.record_pass(FilterId::AdequateSize, id),
            Ok(false) => {}
            Err(err) => report.note(id, Some(FilterId::AdequateSize), err.to_string()),
        }

        if self.filters.earnings_stability.passes(dataset) {
            report.record_pass(FilterId::EarningsStability, id);
        }

        if self.filters.dividend_record.passes(dataset) {
            report.record_pass(FilterId::DividendRecord, id);
        }

        match self.filters.moderate_pe.passes(dataset, self.price_of(id)) {
            Ok(true) => report.record_pass(FilterId::ModeratePe, id),
            Ok(false) => {}
            Err(err) => report.note(id, Some(FilterId::ModeratePe), err.to_string()),
        }

        if self.filters.earnings_growth.passes(dataset) {
            report.record_pass(FilterId::EarningsGrowth, id);
        }

        if self.filters.price_to_assets.passes(dataset) {
            report.record_pass(FilterId::PriceToAssets, id);
        }
    }

    /// 결합 통과 회사의 수치 근거를 수집합니다.
    ///
    /// 진단 자체가 불가능한 필터는 None으로 남습니다 (판정 단계에서
    /// 이미 노트가 남아 있음).
    fn diagnose(&self, id: &str, dataset: &AnnualDataset) -> DiagnosticBundle {
        DiagnosticBundle {
            company_id: id.to_string(),
            turnover: self.filters.adequate_size.turnover(dataset).ok(),
            stability: self.filters.earnings_stability.diagnose(dataset),
            dividends: self.filters.dividend_record.diagnose(dataset),
            growth: self.filters.earnings_growth.diagnose(dataset),
            pe: self
                .filters
                .moderate_pe
                .diagnose(dataset, self.price_of(id))
                .ok(),
            assets: self.filters.price_to_assets.diagnose(dataset).ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_filter_set_from_default_config() {
        let filters = FilterSet::from_config(&ScreeningConfig::default());

        assert_eq!(filters.adequate_size.turnover_limit, dec!(100));
        assert_eq!(filters.earnings_stability.span, 10);
        assert_eq!(filters.dividend_record.span, 20);
        assert_eq!(filters.moderate_pe.pe_limit, dec!(15));
        assert_eq!(filters.moderate_pe.years, 3);
        assert_eq!(filters.price_to_assets.pb_limit, dec!(1.5));
        assert_eq!(filters.price_to_assets.pe_pb_limit, dec!(22.5));
    }
}
