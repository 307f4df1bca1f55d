//! 스크리닝 실행 명령.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fs;
use tracing::info;

use screener_analytics::ScreeningRun;
use screener_core::{AppConfig, Universe};
use screener_data::SnapshotStore;

/// 스크리닝 명령 설정.
#[derive(Debug)]
pub struct ScreenConfig {
    /// 유니버스 파일 경로
    pub universe_path: String,
    /// 가격 파일 경로
    pub prices_path: String,
    /// 보고서 JSON 저장 경로
    pub output: Option<String>,
}

/// 작업 집합 전체를 스크리닝하고 보고서를 출력합니다.
pub fn screen(app: &AppConfig, config: ScreenConfig) -> Result<()> {
    let universe: Universe = read_json(&config.universe_path)
        .with_context(|| format!("유니버스 파일 읽기 실패: {}", config.universe_path))?;
    let prices: HashMap<String, Decimal> = read_json(&config.prices_path)
        .with_context(|| format!("가격 파일 읽기 실패: {}", config.prices_path))?;

    let store = SnapshotStore::open(&app.store.data_dir)
        .with_context(|| format!("저장소 열기 실패: {}", app.store.data_dir))?;

    let run = ScreeningRun::new(&store, &universe, &prices, app);
    let report = run.execute();

    println!("{}", report.render(&universe));

    if let Some(path) = &config.output {
        let json = report.to_json().context("보고서 직렬화 실패")?;
        fs::write(path, json).with_context(|| format!("보고서 저장 실패: {}", path))?;
        info!(path = %path, "보고서 JSON 저장 완료");
    }

    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> Result<T> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
