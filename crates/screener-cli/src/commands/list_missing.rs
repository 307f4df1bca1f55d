//! 스냅샷 결측 회사 나열 명령.

use anyhow::{Context, Result};
use std::fs;

use screener_core::{AppConfig, Universe};
use screener_data::{DatasetStore, SnapshotStore};

/// 유니버스 중 스냅샷이 없는 회사를 나열합니다.
pub fn list_missing(app: &AppConfig, universe_path: &str) -> Result<()> {
    let content = fs::read_to_string(universe_path)
        .with_context(|| format!("유니버스 파일 읽기 실패: {}", universe_path))?;
    let universe: Universe =
        serde_json::from_str(&content).context("유니버스 파싱 실패")?;

    let store = SnapshotStore::open(&app.store.data_dir)
        .with_context(|| format!("저장소 열기 실패: {}", app.store.data_dir))?;

    let missing = store.list_missing(&universe);

    println!("Missing datasets ({} of {}):", missing.len(), universe.len());
    for id in &missing {
        println!("  {} ({})", universe.name_of(id), id);
    }

    Ok(())
}
