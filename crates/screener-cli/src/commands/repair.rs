//! 스냅샷 수동 재라벨링 명령.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::info;

use screener_core::{AppConfig, Field};
use screener_data::{DatasetStore, SnapshotStore};

/// 재라벨링 명령 설정.
#[derive(Debug)]
pub struct RepairConfig {
    /// 회사 식별자
    pub id: String,
    /// 회계연도
    pub year: i32,
    /// 필드 이름
    pub field: String,
    /// 새 값 (None이면 결측 처리)
    pub value: Option<String>,
}

/// 저장된 데이터셋의 필드 하나를 바꾸고 다시 검증합니다.
///
/// 프롬프트 없이 호출 가능한 순수 연산이라 어떤 프런트엔드에서도 쓸 수
/// 있습니다. 성공하면 회사가 오류 장부에서 내려갑니다 (Erroneous → Clean).
pub fn repair(app: &AppConfig, config: RepairConfig) -> Result<()> {
    let field = Field::from_str(&config.field)
        .map_err(|err| anyhow::anyhow!("필드 해석 실패: {err}"))?;

    let value = match &config.value {
        Some(raw) => Some(
            Decimal::from_str(raw)
                .with_context(|| format!("값 파싱 실패: {raw:?}"))?,
        ),
        None => None,
    };

    let store = SnapshotStore::open(&app.store.data_dir)
        .with_context(|| format!("저장소 열기 실패: {}", app.store.data_dir))?;

    let dataset = store
        .repair(&config.id, config.year, field, value)
        .with_context(|| format!("재라벨링 실패: {} {}년", config.id, config.year))?;

    info!(
        company = %config.id,
        year = config.year,
        field = %field,
        "재라벨링 완료"
    );

    let record = dataset
        .year(config.year)
        .expect("repair가 존재를 보장한 연도");
    println!(
        "{} {}: {} = {}",
        config.id,
        config.year,
        field,
        record
            .get(field)
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string())
    );

    Ok(())
}
