//! 원시 테이블 정합화.
//!
//! 스크레이핑된 테이블의 전형적 결함을 수리해 [`AnnualDataset`]의
//! 불변식을 만족하는 데이터셋을 만듭니다:
//! - U+00A0로 인코딩된 천 단위 구분자
//! - 결측을 뜻하는 "-" 자리표시자
//! - 같은 회계연도의 중복 행 (연 2회 배당)
//!
//! 자동 해소가 불가능한 결함은 회사/필드 단위로 귀속 가능한 에러로
//! 반환됩니다.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::debug;

use screener_core::{AnnualDataset, AnnualRecord, Field, ScreenerError, ScreenerResult};

use crate::raw::{RawCell, RawTable, YEAR_LABEL};

/// 셀 정규화 정책.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NumericPolicy {
    /// 파싱 불가 셀은 에러 (기본)
    #[default]
    Strict,
    /// 파싱 불가 셀은 결측으로 강등 (수리 경로)
    Coerce,
}

/// 컬럼 검증 정책.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnPolicy {
    /// 기준 집합 전체가 채워져야 완전 (감사 워크플로)
    Strict,
    /// 누락 컬럼 수가 허용치 이하면 완전 (스크리닝 수집)
    Tolerant { max_missing: usize },
}

/// 원시 셀 하나를 숫자-또는-결측으로 정규화합니다.
///
/// - U+00A0 천 단위 구분자를 제거합니다
/// - `"-"`와 빈 문자열은 결측으로 매핑합니다 (0이 아님)
/// - 그 외에는 십진수로 파싱하고, 실패하면 정책에 따라
///   [`ScreenerError::NonNumeric`] 또는 결측을 반환합니다
pub fn normalize_cell(
    field_label: &str,
    cell: &RawCell,
    policy: NumericPolicy,
) -> ScreenerResult<Option<Decimal>> {
    match cell {
        RawCell::Null => Ok(None),
        RawCell::Number(n) => Ok(Some(*n)),
        RawCell::Text(s) => {
            let cleaned = s.replace('\u{a0}', "");
            let trimmed = cleaned.trim();
            if trimmed.is_empty() || trimmed == "-" {
                return Ok(None);
            }
            match Decimal::from_str(trimmed) {
                Ok(value) => Ok(Some(value)),
                Err(_) => match policy {
                    NumericPolicy::Strict => Err(ScreenerError::NonNumeric {
                        field: field_label.to_string(),
                        value: s.clone(),
                    }),
                    NumericPolicy::Coerce => {
                        debug!(field = field_label, value = %s, "파싱 불가 셀을 결측으로 강등");
                        Ok(None)
                    }
                },
            }
        }
    }
}

/// 행의 연도 셀을 파싱합니다. 연도는 정수여야 하며 결측일 수 없습니다.
fn parse_year(cell: Option<&RawCell>) -> ScreenerResult<i32> {
    let cell = cell.ok_or_else(|| ScreenerError::MissingInput("Year column".to_string()))?;
    let value = normalize_cell(YEAR_LABEL, cell, NumericPolicy::Strict)?
        .ok_or_else(|| ScreenerError::MissingInput("Year value".to_string()))?;
    if !value.fract().is_zero() {
        return Err(ScreenerError::NonNumeric {
            field: YEAR_LABEL.to_string(),
            value: value.to_string(),
        });
    }
    value.to_i32().ok_or_else(|| ScreenerError::NonNumeric {
        field: YEAR_LABEL.to_string(),
        value: value.to_string(),
    })
}

/// 원시 테이블을 정합화된 데이터셋으로 변환합니다.
///
/// 중복 연도는 병합합니다: 배당은 합산(연 2회 배당), 그 외 필드가
/// 양쪽 모두 값을 가지면 [`ScreenerError::Conflict`]입니다. 결과는
/// 연도 유일, 내림차순 정렬입니다.
pub fn reconcile(
    company_id: &str,
    table: &RawTable,
    policy: NumericPolicy,
) -> ScreenerResult<AnnualDataset> {
    let mut by_year: BTreeMap<i32, AnnualRecord> = BTreeMap::new();

    for row in &table.rows {
        let year = parse_year(row.get(YEAR_LABEL))?;

        let mut incoming = AnnualRecord::new(year);
        for field in Field::ALL {
            if let Some(cell) = row.get(field.label()) {
                incoming.set(field, normalize_cell(field.label(), cell, policy)?);
            }
        }

        match by_year.entry(year) {
            Entry::Vacant(slot) => {
                slot.insert(incoming);
            }
            Entry::Occupied(mut slot) => merge_into(slot.get_mut(), &incoming)?,
        }
    }

    Ok(AnnualDataset::new(company_id, by_year.into_values().collect()))
}

/// 같은 연도의 레코드를 병합합니다.
fn merge_into(existing: &mut AnnualRecord, incoming: &AnnualRecord) -> ScreenerResult<()> {
    for field in Field::ALL {
        match (existing.get(field), incoming.get(field)) {
            (_, None) => {}
            (None, value @ Some(_)) => existing.set(field, value),
            (Some(a), Some(b)) => {
                if field.is_additive() {
                    existing.set(field, Some(a + b));
                } else {
                    return Err(ScreenerError::Conflict {
                        year: existing.year,
                        field: field.label().to_string(),
                    });
                }
            }
        }
    }
    Ok(())
}

/// 데이터셋의 컬럼 구성이 정책 기준으로 완전한지 확인합니다.
pub fn columns_complete(dataset: &AnnualDataset, policy: ColumnPolicy) -> bool {
    let deficit = dataset.missing_fields().len();
    match policy {
        ColumnPolicy::Strict => deficit == 0,
        ColumnPolicy::Tolerant { max_missing } => deficit <= max_missing,
    }
}

/// 숫자 변환에 실패한 원시 셀.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellDefect {
    /// 결함이 있는 행의 연도 (연도 자체가 결함이면 None)
    pub year: Option<i32>,
    /// 컬럼 라벨
    pub field: String,
    /// 문제가 된 원시 셀 값
    pub value: String,
}

/// 원시 테이블의 숫자 변환 결함을 전부 수집합니다.
///
/// 기록된 모든 컬럼이 부동소수 표현 가능해야 한다는 감사 규칙입니다.
/// 결함이 하나라도 있으면 해당 데이터셋은 Erroneous로 처리됩니다.
pub fn numeric_defects(table: &RawTable) -> Vec<CellDefect> {
    let mut defects = Vec::new();

    for row in &table.rows {
        let year = match parse_year(row.get(YEAR_LABEL)) {
            Ok(year) => Some(year),
            Err(_) => {
                let value = match row.get(YEAR_LABEL) {
                    Some(RawCell::Text(s)) => s.clone(),
                    Some(RawCell::Number(n)) => n.to_string(),
                    _ => String::new(),
                };
                defects.push(CellDefect {
                    year: None,
                    field: YEAR_LABEL.to_string(),
                    value,
                });
                None
            }
        };

        for field in Field::ALL {
            if let Some(cell) = row.get(field.label()) {
                if let Err(ScreenerError::NonNumeric { value, .. }) =
                    normalize_cell(field.label(), cell, NumericPolicy::Strict)
                {
                    defects.push(CellDefect {
                        year,
                        field: field.label().to_string(),
                        value,
                    });
                }
            }
        }
    }

    defects
}
