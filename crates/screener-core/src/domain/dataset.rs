//! 회사별 연도 인덱스 데이터셋.

use serde::{Deserialize, Serialize};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::fmt;

use super::record::{AnnualRecord, Field};

/// 한 회사의 정합화된 연도별 재무 데이터셋.
///
/// 불변식 (정합화 이후 항상 성립):
/// - `year` 값은 유일하다
/// - 레코드는 연도 내림차순 (최신 연도가 인덱스 0)
/// - 기록된 값은 전부 숫자 (`Option<Decimal>`, 문자열 없음)
///
/// 모든 필터가 내림차순 정렬을 전제하므로 생성자가 정렬을 보장합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualDataset {
    company_id: String,
    records: Vec<AnnualRecord>,
}

impl AnnualDataset {
    /// 레코드 목록으로 데이터셋을 생성합니다. 연도 내림차순으로 정렬됩니다.
    ///
    /// 연도 유일성은 Reconciler가 병합으로 보장합니다. 여기서는 정렬만
    /// 책임집니다.
    pub fn new(company_id: impl Into<String>, mut records: Vec<AnnualRecord>) -> Self {
        records.sort_by(|a, b| b.year.cmp(&a.year));
        Self {
            company_id: company_id.into(),
            records,
        }
    }

    /// 회사 식별자.
    pub fn company_id(&self) -> &str {
        &self.company_id
    }

    /// 레코드 슬라이스 (연도 내림차순).
    pub fn records(&self) -> &[AnnualRecord] {
        &self.records
    }

    /// 레코드 수.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// 비어 있는지 확인.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 최신 연도 레코드.
    pub fn latest(&self) -> Option<&AnnualRecord> {
        self.records.first()
    }

    /// 내림차순 인덱스로 레코드 조회 (0 = 최신 연도).
    pub fn record_at(&self, index: usize) -> Option<&AnnualRecord> {
        self.records.get(index)
    }

    /// 연도로 레코드 조회.
    pub fn year(&self, year: i32) -> Option<&AnnualRecord> {
        self.records.iter().find(|r| r.year == year)
    }

    /// 연도로 레코드 조회 (가변, repair 경로에서 사용).
    pub fn year_mut(&mut self, year: i32) -> Option<&mut AnnualRecord> {
        self.records.iter_mut().find(|r| r.year == year)
    }

    /// 한 필드의 값 이력 (연도 내림차순, 값이 있는 해만).
    ///
    /// 필터들의 "absent years dropped" 시맨틱이 여기에 구현돼 있습니다.
    pub fn history(&self, field: Field) -> Vec<Decimal> {
        self.records.iter().filter_map(|r| r.get(field)).collect()
    }

    /// EPS 이력 (내림차순, 값이 있는 해만).
    pub fn eps_history(&self) -> Vec<Decimal> {
        self.history(Field::Eps)
    }

    /// 배당 이력 (내림차순, 값이 있는 해만).
    pub fn dividend_history(&self) -> Vec<Decimal> {
        self.history(Field::Dividend)
    }

    /// 한 해라도 값이 기록된 필드 집합.
    pub fn populated_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| self.records.iter().any(|r| r.get(*f).is_some()))
            .collect()
    }

    /// 기준 집합([`Field::CANONICAL`]) 중 기록이 전혀 없는 필드.
    pub fn missing_fields(&self) -> Vec<Field> {
        Field::CANONICAL
            .into_iter()
            .filter(|f| self.records.iter().all(|r| r.get(*f).is_none()))
            .collect()
    }

    /// 연도 유일성 불변식 검사 (감사 경로에서 사용).
    pub fn years_unique(&self) -> bool {
        let mut seen = HashSet::new();
        self.records.iter().all(|r| seen.insert(r.year))
    }
}

/// 회사별 데이터셋 품질 상태.
///
/// 전이: `Missing → Clean` (정합화 성공), `Clean → Erroneous` (감사 시
/// 검증 실패), `Erroneous → Clean` (수리 후 재검증 성공).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatasetQuality {
    /// 정합화 완료, 스크리닝 가능
    Clean,
    /// 데이터셋 미수집
    Missing,
    /// 데이터셋은 있으나 검증 실패
    Erroneous,
}

impl DatasetQuality {
    /// 스크리닝 작업 집합에 포함 가능한 상태인지 확인합니다.
    ///
    /// Erroneous는 수리 대상일 뿐 작업 집합에서는 빠지지 않습니다.
    /// Missing만 제외합니다.
    pub fn is_workable(&self) -> bool {
        !matches!(self, DatasetQuality::Missing)
    }
}

impl fmt::Display for DatasetQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetQuality::Clean => write!(f, "clean"),
            DatasetQuality::Missing => write!(f, "missing"),
            DatasetQuality::Erroneous => write!(f, "erroneous"),
        }
    }
}
