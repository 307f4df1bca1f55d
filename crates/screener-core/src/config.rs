//! 설정 관리.
//!
//! 이 모듈은 애플리케이션 설정을 정의하고 관리합니다.
//! 필터 기준값은 전부 설정으로 노출되며, 기본값은 고전적 방어투자자
//! 기준(매출 100, P/E 15, P/B 1.5, P/E×P/B 22.5, 성장 1/3)입니다.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
    /// 데이터셋 저장소 설정
    #[serde(default)]
    pub store: StoreConfig,
    /// 스크리닝 필터 설정
    #[serde(default)]
    pub screening: ScreeningConfig,
    /// 수동 제외 설정
    #[serde(default)]
    pub exclusions: ExclusionConfig,
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// 데이터셋 저장소 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// 회사별 스냅샷이 저장되는 디렉토리
    pub data_dir: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: "data/datasets".to_string(),
        }
    }
}

/// 스크리닝 필터 설정.
///
/// 모든 임계값과 조회 연수는 여기서 조정합니다. 필터 구현은 이 값들을
/// 주입받을 뿐 자체 상수를 갖지 않습니다.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScreeningConfig {
    /// 최소 매출 (발행 통화 백만 단위)
    pub turnover_limit: Decimal,
    /// 이익 안정성 기준 EPS 하한 (초과해야 통과)
    pub eps_floor: Decimal,
    /// "무배당" 센티널 값 (이 값과 같은 해가 있으면 탈락)
    pub dividend_sentinel: Decimal,
    /// 최소 이익 성장률 (recent/early - 1)
    pub growth_target: Decimal,
    /// P/E 상한
    pub pe_limit: Decimal,
    /// P/B 상한
    pub pb_limit: Decimal,
    /// P/E × P/B 상한
    pub pe_pb_limit: Decimal,
    /// 이익 안정성 조회 연수
    pub stability_span: usize,
    /// 배당 기록 조회 연수
    pub dividend_span: usize,
    /// 이익 성장 조회 연수
    pub growth_span: usize,
    /// P/E 계산에 사용하는 평균 연수
    pub pe_years: usize,
    /// 관대한 컬럼 검증이 허용하는 최대 누락 컬럼 수
    pub max_missing_columns: usize,
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            turnover_limit: Decimal::new(100, 0),
            eps_floor: Decimal::ZERO,
            dividend_sentinel: Decimal::ZERO,
            growth_target: Decimal::from(1) / Decimal::from(3),
            pe_limit: Decimal::new(15, 0),
            pb_limit: Decimal::new(15, 1),
            pe_pb_limit: Decimal::new(225, 1),
            stability_span: 10,
            dividend_span: 20,
            growth_span: 10,
            pe_years: 3,
            max_missing_columns: 1,
        }
    }
}

/// 수동 제외 설정.
///
/// 교차상장, 최근 구조조정 등으로 데이터가 스크리닝에 부적합한 회사의
/// 식별자 목록입니다. 운영자가 설정 파일에서 관리합니다.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ExclusionConfig {
    /// 작업 집합에서 제외할 회사 식별자
    #[serde(default)]
    pub manual: Vec<String>,
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            // 환경 변수로 오버라이드 (예: SCREENER__SCREENING__PE_LIMIT=12)
            .add_source(
                config::Environment::with_prefix("SCREENER")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// 기본 경로에서 설정을 로드합니다. 파일이 없으면 기본값을 사용합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        let path = Path::new("config/default.toml");
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_thresholds() {
        let config = ScreeningConfig::default();
        assert_eq!(config.turnover_limit, dec!(100));
        assert_eq!(config.pe_limit, dec!(15));
        assert_eq!(config.pb_limit, dec!(1.5));
        assert_eq!(config.pe_pb_limit, dec!(22.5));
        assert_eq!(config.stability_span, 10);
        assert_eq!(config.dividend_span, 20);
    }

    #[test]
    fn test_growth_target_is_one_third() {
        let config = ScreeningConfig::default();
        // recent/early = 4/3이면 성장률이 정확히 기준값과 같아야 함
        let growth = dec!(4) / dec!(3) - dec!(1);
        assert_eq!(growth, config.growth_target);
    }

    #[test]
    fn test_exclusions_default_empty() {
        let config = AppConfig::default();
        assert!(config.exclusions.manual.is_empty());
    }
}
