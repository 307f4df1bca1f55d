//! 스크리닝 보고서.
//!
//! 필터별 통과 목록, 결합 통과 목록, 결합 통과 회사의 수치 근거,
//! 그리고 회사/필터 단위 평가 불가 노트를 담습니다. 렌더링 형식은
//! 계약이 아니며, 담기는 데이터가 계약입니다.

use rust_decimal::Decimal;
use serde::Serialize;
use screener_core::Universe;

use crate::filters::{
    AssetsDiagnostic, DividendDiagnostic, FilterId, GrowthDiagnostic, PeDiagnostic,
    StabilityDiagnostic,
};

/// 필터별 통과 목록.
#[derive(Debug, Clone, Serialize)]
pub struct FilterResult {
    /// 필터 식별자
    pub filter: FilterId,
    /// 통과한 회사 식별자 (평가 순서대로)
    pub passed: Vec<String>,
}

/// 회사/필터 단위 평가 불가 노트.
///
/// 평가 실패는 탈락이 아니라 "판정 없음"입니다. 해당 회사는 그 필터의
/// 통과 목록에서 빠지고 여기 기록됩니다.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationNote {
    /// 회사 식별자
    pub company_id: String,
    /// 평가 중이던 필터 (데이터셋 로드 실패 등 필터 이전 단계면 None)
    pub filter: Option<FilterId>,
    /// 사유
    pub reason: String,
}

/// 결합 통과 회사의 수치 근거 묶음.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticBundle {
    /// 회사 식별자
    pub company_id: String,
    /// 규모 판정에 쓰인 매출
    pub turnover: Option<Decimal>,
    pub stability: StabilityDiagnostic,
    pub dividends: DividendDiagnostic,
    pub growth: GrowthDiagnostic,
    pub pe: Option<PeDiagnostic>,
    pub assets: Option<AssetsDiagnostic>,
}

/// 한 번의 스크리닝 실행 결과.
#[derive(Debug, Clone, Serialize)]
pub struct ScreeningReport {
    /// 필터별 통과 목록 ([`FilterId::ALL`] 순서)
    pub results: Vec<FilterResult>,
    /// 결합 통과 목록 ([`FilterId::COMBINED`] 논리곱)
    pub combined: Vec<String>,
    /// 결합 통과 회사의 수치 근거
    pub diagnostics: Vec<DiagnosticBundle>,
    /// 평가 불가 노트
    pub notes: Vec<EvaluationNote>,
}

impl ScreeningReport {
    /// 빈 보고서 생성.
    pub fn new() -> Self {
        Self {
            results: FilterId::ALL
                .into_iter()
                .map(|filter| FilterResult {
                    filter,
                    passed: Vec::new(),
                })
                .collect(),
            combined: Vec::new(),
            diagnostics: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// 필터 통과 기록.
    pub fn record_pass(&mut self, filter: FilterId, company_id: &str) {
        if let Some(result) = self.results.iter_mut().find(|r| r.filter == filter) {
            result.passed.push(company_id.to_string());
        }
    }

    /// 필터의 통과 목록.
    pub fn passed(&self, filter: FilterId) -> &[String] {
        self.results
            .iter()
            .find(|r| r.filter == filter)
            .map(|r| r.passed.as_slice())
            .unwrap_or(&[])
    }

    /// 평가 불가 노트 기록.
    pub fn note(&mut self, company_id: &str, filter: Option<FilterId>, reason: String) {
        self.notes.push(EvaluationNote {
            company_id: company_id.to_string(),
            filter,
            reason,
        });
    }

    /// 결합 통과 목록 계산.
    ///
    /// [`FilterId::COMBINED`] 다섯 필터의 논리곱입니다. 이익 안정성은
    /// 들어가지 않습니다 (테스트로 고정된 동작).
    pub fn compute_combined(&mut self) {
        let mut combined = self.passed(FilterId::COMBINED[0]).to_vec();
        for filter in &FilterId::COMBINED[1..] {
            let passed = self.passed(*filter);
            combined.retain(|id| passed.contains(id));
        }
        self.combined = combined;
    }

    /// 진단 묶음 추가.
    pub fn push_bundle(&mut self, bundle: DiagnosticBundle) {
        self.diagnostics.push(bundle);
    }

    /// JSON 직렬화.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// 텍스트 보고서 렌더링.
    pub fn render(&self, universe: &Universe) -> String {
        let mut out = String::new();

        out.push_str("=========================================\n");
        out.push_str(" SCREENING REPORT\n");
        out.push_str("=========================================\n");

        for result in &self.results {
            out.push_str(&format!(
                "{:<20} {:>4} passed\n",
                result.filter.label(),
                result.passed.len()
            ));
        }
        out.push_str(&format!("{:<20} {:>4} passed\n", "combined", self.combined.len()));

        if !self.combined.is_empty() {
            out.push('\n');
            out.push_str("Combined pass list:\n");
            for id in &self.combined {
                out.push_str(&format!("  {} ({})\n", universe.name_of(id), id));
            }
        }

        for bundle in &self.diagnostics {
            out.push('\n');
            out.push_str(&format!(
                "{} ({})\n",
                universe.name_of(&bundle.company_id),
                bundle.company_id
            ));
            out.push_str(&format!(
                "  turnover (y-1)     : {}\n",
                opt(bundle.turnover)
            ));
            out.push_str(&format!(
                "  earnings stability : {} years, lowest {}\n",
                bundle.stability.years,
                opt(bundle.stability.lowest)
            ));
            out.push_str(&format!(
                "  dividend record    : {} years, lowest {}\n",
                bundle.dividends.years,
                opt(bundle.dividends.lowest)
            ));
            out.push_str(&format!(
                "  earnings growth    : {} years, growth {}\n",
                bundle.growth.years,
                round4(bundle.growth.growth)
            ));
            match &bundle.pe {
                Some(pe) => out.push_str(&format!(
                    "  moderate P/E       : {} years, P/E {}\n",
                    pe.years,
                    round4(pe.pe)
                )),
                None => out.push_str("  moderate P/E       : -\n"),
            }
            match &bundle.assets {
                Some(assets) => out.push_str(&format!(
                    "  price-to-assets    : P/B {}, P/E*P/B {}\n",
                    round4(assets.pb),
                    round4(assets.pe_pb)
                )),
                None => out.push_str("  price-to-assets    : -\n"),
            }
        }

        if !self.notes.is_empty() {
            out.push('\n');
            out.push_str("Evaluation notes:\n");
            for note in &self.notes {
                let filter = note
                    .filter
                    .map(|f| f.label())
                    .unwrap_or("dataset");
                out.push_str(&format!(
                    "  {} ({}) [{}]: {}\n",
                    universe.name_of(&note.company_id),
                    note.company_id,
                    filter,
                    note.reason
                ));
            }
        }

        out
    }
}

impl Default for ScreeningReport {
    fn default() -> Self {
        Self::new()
    }
}

fn opt(value: Option<Decimal>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn round4(value: Decimal) -> Decimal {
    value.round_dp(4)
}

#[cfg(test)]
mod tests {
    use super::*;
    use screener_core::Company;

    #[test]
    fn test_combined_ignores_earnings_stability() {
        let mut report = ScreeningReport::new();
        // 안정성을 제외한 다섯 필터만 통과한 회사
        for filter in FilterId::COMBINED {
            report.record_pass(filter, "1930");
        }
        report.compute_combined();

        // 안정성 목록에 없어도 결합 목록에는 포함됨
        assert!(report.passed(FilterId::EarningsStability).is_empty());
        assert_eq!(report.combined, vec!["1930".to_string()]);
    }

    #[test]
    fn test_combined_requires_all_five() {
        let mut report = ScreeningReport::new();
        for filter in FilterId::COMBINED {
            report.record_pass(filter, "1930");
        }
        // 배당 기록이 빠진 회사는 결합 탈락
        for filter in [
            FilterId::AdequateSize,
            FilterId::EarningsGrowth,
            FilterId::ModeratePe,
            FilterId::PriceToAssets,
        ] {
            report.record_pass(filter, "2048");
        }
        report.compute_combined();

        assert_eq!(report.combined, vec!["1930".to_string()]);
    }

    #[test]
    fn test_render_uses_display_names() {
        let universe = Universe::new(vec![Company::new("1930", "Nokian Renkaat")]);
        let mut report = ScreeningReport::new();
        report.record_pass(FilterId::AdequateSize, "1930");
        report.note("1930", Some(FilterId::ModeratePe), "입력 누락: 현재가 없음".to_string());

        let text = report.render(&universe);
        assert!(text.contains("adequate-size"));
        assert!(text.contains("Nokian Renkaat"));
        assert!(text.contains("moderate-pe"));
    }
}
