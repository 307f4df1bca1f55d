//! 스크리닝 시스템의 에러 타입.
//!
//! 이 모듈은 정합화와 필터 평가 전반에서 사용되는 에러 타입을 정의합니다.
//! 정합화 결함은 회사와 필드 단위로 귀속 가능해야 하고, 평가 결함은
//! 배치를 중단하지 않고 "평가 불가" 노트로 강등됩니다.

use thiserror::Error;

/// 핵심 스크리닝 에러.
#[derive(Debug, Error)]
pub enum ScreenerError {
    /// 숫자가 아닌 원시 셀 값 (정합화 시점, 재라벨링으로 복구 가능)
    #[error("숫자가 아닌 값: {field} = {value:?}")]
    NonNumeric { field: String, value: String },

    /// 중복 연도 병합 충돌 (배당 합산 외에는 자동 해소 불가)
    #[error("중복 연도 충돌: {year}년 {field}")]
    Conflict { year: i32, field: String },

    /// 필터의 최소 조회 연수 미달
    #[error("데이터 연수 부족: 필요 {required}, 보유 {available}")]
    InsufficientHistory { required: usize, available: usize },

    /// 평가에 필요한 입력 누락 (가격, 데이터셋 등)
    #[error("입력 누락: {0}")]
    MissingInput(String),

    /// 찾을 수 없음
    #[error("찾을 수 없음: {0}")]
    NotFound(String),

    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),
}

/// 스크리닝 작업을 위한 Result 타입.
pub type ScreenerResult<T> = Result<T, ScreenerError>;

impl ScreenerError {
    /// 배치를 중단하지 않고 회사/필터 단위 노트로 강등되는 에러인지 확인합니다.
    pub fn is_evaluation_failure(&self) -> bool {
        matches!(
            self,
            ScreenerError::InsufficientHistory { .. } | ScreenerError::MissingInput(_)
        )
    }

    /// 수동 재라벨링(repair)으로 복구 가능한 정합화 결함인지 확인합니다.
    pub fn is_repairable(&self) -> bool {
        matches!(
            self,
            ScreenerError::NonNumeric { .. } | ScreenerError::Conflict { .. }
        )
    }
}

impl From<serde_json::Error> for ScreenerError {
    fn from(err: serde_json::Error) -> Self {
        ScreenerError::Serialization(err.to_string())
    }
}
