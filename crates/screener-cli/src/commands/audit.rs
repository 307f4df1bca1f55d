//! 스냅샷 감사 명령.

use anyhow::{Context, Result};
use tracing::info;

use screener_core::AppConfig;
use screener_data::{DatasetStore, SnapshotStore};

/// 저장된 스냅샷 전체를 감사합니다.
///
/// 엄격한 컬럼 검증과 연도 유일성 불변식을 확인하고, `mark`가 참이면
/// 불변식 위반 회사를 오류 장부에 기록합니다 (Clean → Erroneous).
pub fn audit(app: &AppConfig, mark: bool) -> Result<()> {
    let store = SnapshotStore::open(&app.store.data_dir)
        .with_context(|| format!("저장소 열기 실패: {}", app.store.data_dir))?;

    let ids = store.ids().context("스냅샷 목록 조회 실패")?;
    info!(snapshots = ids.len(), mark, "감사 시작");

    let outcome = store.audit(&ids, mark).context("감사 실패")?;

    println!("Audited {} snapshot(s)", ids.len());

    println!("\nMissing canonical columns ({}):", outcome.missing_columns.len());
    for id in &outcome.missing_columns {
        println!("  {}", id);
    }

    println!("\nInvariant violations ({}):", outcome.invalid.len());
    for id in &outcome.invalid {
        println!("  {}", id);
    }

    let erroneous = store.erroneous_ids().context("오류 장부 조회 실패")?;
    println!("\nErroneous ledger ({}):", erroneous.len());
    for id in &erroneous {
        println!("  {}", id);
    }

    Ok(())
}
