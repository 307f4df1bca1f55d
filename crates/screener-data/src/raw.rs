//! 원시 테이블 계약 (Source Acquirer → Reconciler).
//!
//! Acquirer가 어디서 어떻게 데이터를 긁어오는지는 코어의 관심사가
//! 아닙니다. 전달되는 것은 행의 순서열이고, 각 행은 컬럼 라벨에서
//! 문자열-또는-숫자 셀로 가는 매핑입니다. 연도 정렬도 유일성도
//! 보장되지 않습니다.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 연도 컬럼 라벨.
pub const YEAR_LABEL: &str = "Year";

/// 원시 셀.
///
/// 스크레이핑된 테이블 값은 숫자일 수도, 자리표시자가 섞인 문자열일
/// 수도, 아예 비어 있을 수도 있습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCell {
    /// 숫자 셀
    Number(Decimal),
    /// 문자열 셀 (천 단위 구분자, "-" 자리표시자 포함 가능)
    Text(String),
    /// 빈 셀
    Null,
}

impl RawCell {
    /// 문자열 셀 생성 헬퍼.
    pub fn text(s: impl Into<String>) -> Self {
        RawCell::Text(s.into())
    }
}

/// 원시 테이블의 한 행.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRow {
    cells: BTreeMap<String, RawCell>,
}

impl RawRow {
    /// 빈 행 생성.
    pub fn new() -> Self {
        Self::default()
    }

    /// 셀 추가 (빌더 스타일).
    pub fn with(mut self, label: impl Into<String>, cell: RawCell) -> Self {
        self.cells.insert(label.into(), cell);
        self
    }

    /// 셀 설정.
    pub fn insert(&mut self, label: impl Into<String>, cell: RawCell) {
        self.cells.insert(label.into(), cell);
    }

    /// 라벨로 셀 조회.
    pub fn get(&self, label: &str) -> Option<&RawCell> {
        self.cells.get(label)
    }

    /// 행에 존재하는 컬럼 라벨.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(|s| s.as_str())
    }
}

/// 원시 테이블.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    /// 행 목록 (순서/유일성 무보장)
    pub rows: Vec<RawRow>,
}

impl RawTable {
    /// 빈 테이블 생성.
    pub fn new() -> Self {
        Self::default()
    }

    /// 행 추가.
    pub fn push(&mut self, row: RawRow) {
        self.rows.push(row);
    }

    /// 행 수.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// 비어 있는지 확인.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cell_json_shapes() {
        // 숫자, 문자열, null이 한 테이블에 섞여 들어올 수 있음
        let json = r#"{"rows": [{"Year": 2016, "Turnover": "23 641", "P/E": null}]}"#;
        let table: RawTable = serde_json::from_str(json).unwrap();

        let row = &table.rows[0];
        assert_eq!(row.get("Year"), Some(&RawCell::Number(dec!(2016))));
        assert_eq!(row.get("Turnover"), Some(&RawCell::text("23 641")));
        assert_eq!(row.get("P/E"), Some(&RawCell::Null));
        assert_eq!(row.get("P/B"), None);
    }

    #[test]
    fn test_row_builder() {
        let row = RawRow::new()
            .with(YEAR_LABEL, RawCell::Number(dec!(2015)))
            .with("Adj. Dividend", RawCell::text("1.50"));

        let labels: Vec<&str> = row.labels().collect();
        assert_eq!(labels.len(), 2);
        assert!(labels.contains(&"Adj. Dividend"));
    }
}
