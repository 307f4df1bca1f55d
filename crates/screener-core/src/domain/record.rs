//! 연도별 재무 레코드와 필드 정의.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 재무 라인 아이템.
///
/// 원시 테이블의 컬럼 라벨과 일대일로 대응합니다. 컬럼 검증은
/// [`Field::CANONICAL`] 집합을 기준으로 하며, 유동비율은 데이터 모델에는
/// 포함되지만 검증 집합에는 들어가지 않습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    /// 매출 (백만 단위)
    Turnover,
    /// 조정 순유동자산
    NetCurrentAssets,
    /// 주가순자산비율
    PriceToBook,
    /// 주가수익비율
    PriceToEarnings,
    /// 주당순이익
    Eps,
    /// 조정 배당금
    Dividend,
    /// 유동비율
    CurrentRatio,
}

impl Field {
    /// 전체 필드.
    pub const ALL: [Field; 7] = [
        Field::Turnover,
        Field::NetCurrentAssets,
        Field::PriceToBook,
        Field::PriceToEarnings,
        Field::Eps,
        Field::Dividend,
        Field::CurrentRatio,
    ];

    /// 컬럼 검증 기준 집합 (유동비율 제외).
    pub const CANONICAL: [Field; 6] = [
        Field::Turnover,
        Field::NetCurrentAssets,
        Field::PriceToEarnings,
        Field::PriceToBook,
        Field::Eps,
        Field::Dividend,
    ];

    /// 원시 테이블 컬럼 라벨.
    pub fn label(&self) -> &'static str {
        match self {
            Field::Turnover => "Turnover",
            Field::NetCurrentAssets => "Adj. Net Current Assets",
            Field::PriceToBook => "P/B",
            Field::PriceToEarnings => "P/E",
            Field::Eps => "Earnings per Share",
            Field::Dividend => "Adj. Dividend",
            Field::CurrentRatio => "Current Ratio",
        }
    }

    /// 컬럼 라벨에서 필드를 찾습니다.
    pub fn from_label(label: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.label() == label)
    }

    /// 중복 연도 병합 시 합산 가능한 필드인지 확인합니다.
    ///
    /// 한 회계연도에 여러 번 지급된 배당만 해당합니다.
    pub fn is_additive(&self) -> bool {
        matches!(self, Field::Dividend)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for Field {
    type Err = String;

    /// 컬럼 라벨 또는 축약명을 필드로 변환합니다 (CLI 인자용).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(field) = Field::from_label(s) {
            return Ok(field);
        }
        match s.to_lowercase().as_str() {
            "turnover" => Ok(Field::Turnover),
            "net_current_assets" | "nca" => Ok(Field::NetCurrentAssets),
            "pb" | "price_to_book" => Ok(Field::PriceToBook),
            "pe" | "price_to_earnings" => Ok(Field::PriceToEarnings),
            "eps" => Ok(Field::Eps),
            "dividend" => Ok(Field::Dividend),
            "current_ratio" => Ok(Field::CurrentRatio),
            _ => Err(format!("Unknown field: {}", s)),
        }
    }
}

/// 한 회사의 한 회계연도 레코드.
///
/// 값이 기록되지 않은 필드는 `None`입니다. 0과 "없음"은 구분됩니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnualRecord {
    /// 회계연도 (자연 키)
    pub year: i32,
    pub turnover: Option<Decimal>,
    pub net_current_assets: Option<Decimal>,
    pub price_to_book: Option<Decimal>,
    pub price_to_earnings: Option<Decimal>,
    pub eps: Option<Decimal>,
    pub dividend: Option<Decimal>,
    pub current_ratio: Option<Decimal>,
}

impl AnnualRecord {
    /// 모든 필드가 비어 있는 레코드 생성.
    pub fn new(year: i32) -> Self {
        Self {
            year,
            ..Default::default()
        }
    }

    /// 필드 값 조회.
    pub fn get(&self, field: Field) -> Option<Decimal> {
        match field {
            Field::Turnover => self.turnover,
            Field::NetCurrentAssets => self.net_current_assets,
            Field::PriceToBook => self.price_to_book,
            Field::PriceToEarnings => self.price_to_earnings,
            Field::Eps => self.eps,
            Field::Dividend => self.dividend,
            Field::CurrentRatio => self.current_ratio,
        }
    }

    /// 필드 값 설정.
    pub fn set(&mut self, field: Field, value: Option<Decimal>) {
        match field {
            Field::Turnover => self.turnover = value,
            Field::NetCurrentAssets => self.net_current_assets = value,
            Field::PriceToBook => self.price_to_book = value,
            Field::PriceToEarnings => self.price_to_earnings = value,
            Field::Eps => self.eps = value,
            Field::Dividend => self.dividend = value,
            Field::CurrentRatio => self.current_ratio = value,
        }
    }

    /// 값이 기록된 필드 목록.
    pub fn populated(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| self.get(*f).is_some())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_get_set_roundtrip() {
        let mut record = AnnualRecord::new(2016);
        for field in Field::ALL {
            assert_eq!(record.get(field), None);
        }

        record.set(Field::Eps, Some(dec!(1.25)));
        record.set(Field::Dividend, Some(dec!(0.5)));
        assert_eq!(record.get(Field::Eps), Some(dec!(1.25)));
        assert_eq!(record.populated(), vec![Field::Eps, Field::Dividend]);

        record.set(Field::Eps, None);
        assert_eq!(record.get(Field::Eps), None);
    }

    #[test]
    fn test_field_labels() {
        assert_eq!(Field::from_label("Adj. Dividend"), Some(Field::Dividend));
        assert_eq!(Field::from_label("P/E"), Some(Field::PriceToEarnings));
        assert_eq!(Field::from_label("Price"), None);

        // 축약명도 허용 (CLI)
        assert_eq!("eps".parse::<Field>().unwrap(), Field::Eps);
        assert_eq!("pb".parse::<Field>().unwrap(), Field::PriceToBook);
        assert!("unknown".parse::<Field>().is_err());
    }

    #[test]
    fn test_only_dividend_is_additive() {
        let additive: Vec<Field> = Field::ALL.into_iter().filter(|f| f.is_additive()).collect();
        assert_eq!(additive, vec![Field::Dividend]);
    }
}
