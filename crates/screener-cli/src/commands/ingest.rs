//! 원시 테이블 수집 명령.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use screener_core::AppConfig;
use screener_data::{
    columns_complete, numeric_defects, ColumnPolicy, DatasetStore, NumericPolicy, RawTable,
    SnapshotStore,
};

/// 수집 명령 설정.
#[derive(Debug)]
pub struct IngestConfig {
    /// 원시 테이블 파일 또는 디렉토리
    pub input: String,
    /// 파싱 불가 셀을 결측으로 강등
    pub coerce: bool,
}

/// 원시 테이블 JSON 파일들을 정합화해 저장소에 기록합니다.
///
/// 파일명(확장자 제외)이 회사 식별자입니다. 회사 하나의 실패는
/// 오류 장부에 기록될 뿐 배치를 멈추지 않습니다.
pub fn ingest(app: &AppConfig, config: IngestConfig) -> Result<()> {
    let store = SnapshotStore::open(&app.store.data_dir)
        .with_context(|| format!("저장소 열기 실패: {}", app.store.data_dir))?;

    let policy = if config.coerce {
        NumericPolicy::Coerce
    } else {
        NumericPolicy::Strict
    };

    let files = collect_input_files(Path::new(&config.input))?;
    if files.is_empty() {
        anyhow::bail!("수집할 파일이 없습니다: {}", config.input);
    }

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .expect("progress template"),
    );

    let mut succeeded = 0usize;
    let mut failed = 0usize;

    for file in &files {
        let Some(id) = file.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        progress.set_message(id.to_string());

        match load_table(file) {
            Ok(table) => match store.ingest(id, &table, policy) {
                Ok(dataset) => {
                    succeeded += 1;
                    // 수집 단계는 관대한 컬럼 검증만 적용 (엄격한 검증은 audit)
                    let tolerant = ColumnPolicy::Tolerant {
                        max_missing: app.screening.max_missing_columns,
                    };
                    if !columns_complete(&dataset, tolerant) {
                        warn!(
                            company = id,
                            missing = ?dataset.missing_fields(),
                            "기준 컬럼 누락 (재수집 후보)"
                        );
                    }
                    info!(company = id, years = dataset.len(), "정합화 완료");
                }
                Err(err) => {
                    failed += 1;
                    warn!(company = id, error = %err, "정합화 실패");
                    // 어떤 셀이 문제인지 전부 나열해 수리 대상을 좁힌다
                    for defect in numeric_defects(&table) {
                        warn!(
                            company = id,
                            year = ?defect.year,
                            field = %defect.field,
                            value = %defect.value,
                            "숫자 변환 결함"
                        );
                    }
                }
            },
            Err(err) => {
                failed += 1;
                warn!(company = id, error = %err, "원시 테이블 로드 실패");
            }
        }
        progress.inc(1);
    }

    progress.finish_and_clear();
    info!(succeeded, failed, "수집 종료");
    println!("Ingested {} dataset(s), {} failure(s)", succeeded, failed);

    Ok(())
}

fn load_table(path: &Path) -> Result<RawTable> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("파일 읽기 실패: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("원시 테이블 파싱 실패: {}", path.display()))
}

fn collect_input_files(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(input)
        .with_context(|| format!("디렉토리 읽기 실패: {}", input.display()))?
    {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) == Some("json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
