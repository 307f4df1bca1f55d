//! 회사별 데이터셋 스냅샷 저장소.
//!
//! 회사 식별자 → 데이터셋의 키-값 저장과 두 개의 장부(스냅샷 결측,
//! 검증 실패)를 제공합니다. 배치 스크리닝은 회사당 한 번 읽는
//! 읽기 위주 접근이며, 쓰기는 정합화/수리 때만 일어납니다.
//!
//! # 파일 배치
//!
//! - `<dir>/<id>.json` — 회사별 스냅샷 (데이터셋 + 정합화 시각)
//! - `<dir>/erroneous.json` — 검증 실패 회사 식별자 집합

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

use screener_core::{AnnualDataset, AnnualRecord, DatasetQuality, Field, Universe};

use crate::error::{DataError, Result};
use crate::raw::RawTable;
use crate::reconcile::{self, columns_complete, ColumnPolicy, NumericPolicy};

/// 데이터셋 영속화 시임.
///
/// 코어가 저장소에 요구하는 전부입니다. 파일이든 DB든 이 계약만
/// 만족하면 적합합니다.
pub trait DatasetStore {
    /// 데이터셋 조회. 스냅샷이 없으면 [`DataError::NotFound`].
    fn get(&self, id: &str) -> Result<AnnualDataset>;

    /// 데이터셋 저장 (멱등 덮어쓰기).
    fn put(&self, id: &str, dataset: &AnnualDataset) -> Result<()>;

    /// 스냅샷 존재 여부.
    fn contains(&self, id: &str) -> bool;

    /// 스냅샷이 있는 전체 식별자 (정렬됨).
    fn ids(&self) -> Result<Vec<String>>;

    /// 검증 실패 장부의 식별자 (정렬됨).
    fn erroneous_ids(&self) -> Result<Vec<String>>;

    /// 회사를 검증 실패 장부에 올립니다.
    fn mark_erroneous(&self, id: &str) -> Result<()>;

    /// 회사를 검증 실패 장부에서 내립니다.
    fn clear_erroneous(&self, id: &str) -> Result<()>;

    /// 회사의 데이터셋 품질 상태.
    fn quality(&self, id: &str) -> Result<DatasetQuality> {
        if !self.contains(id) {
            return Ok(DatasetQuality::Missing);
        }
        if self.erroneous_ids()?.iter().any(|e| e == id) {
            Ok(DatasetQuality::Erroneous)
        } else {
            Ok(DatasetQuality::Clean)
        }
    }

    /// 스냅샷이 없는 회사 식별자 목록.
    fn list_missing(&self, universe: &Universe) -> Vec<String> {
        universe
            .ids()
            .into_iter()
            .filter(|id| !self.contains(id))
            .collect()
    }

    /// 스크리닝 작업 집합: 전체 − 결측 − 수동 제외.
    fn working_ids(&self, universe: &Universe, manual_exclusions: &[String]) -> Vec<String> {
        universe
            .ids()
            .into_iter()
            .filter(|id| self.contains(id))
            .filter(|id| !manual_exclusions.iter().any(|e| e == id))
            .collect()
    }

    /// 원시 테이블을 정합화해 저장합니다.
    ///
    /// 성공하면 오류 장부에서 내리고, 정합화가 실패하면 장부에 올린 채
    /// 에러를 반환합니다. 배치 진행 여부는 호출자가 결정합니다.
    fn ingest(
        &self,
        id: &str,
        table: &RawTable,
        policy: NumericPolicy,
    ) -> Result<AnnualDataset> {
        match reconcile::reconcile(id, table, policy) {
            Ok(dataset) => {
                self.put(id, &dataset)?;
                self.clear_erroneous(id)?;
                Ok(dataset)
            }
            Err(err) => {
                warn!(company = id, error = %err, "정합화 실패, 오류 장부에 기록");
                self.mark_erroneous(id)?;
                Err(err.into())
            }
        }
    }

    /// 저장된 데이터셋 하나를 수동 재라벨링합니다.
    ///
    /// 해당 연도의 필드 값을 바꾸고 다시 저장한 뒤 오류 표시를 지웁니다.
    /// 프롬프트를 포함하지 않는 순수 연산이며, 대화형 여부는 호출하는
    /// 프런트엔드의 몫입니다.
    fn repair(
        &self,
        id: &str,
        year: i32,
        field: Field,
        value: Option<Decimal>,
    ) -> Result<AnnualDataset> {
        let mut dataset = self.get(id)?;
        let record = dataset
            .year_mut(year)
            .ok_or_else(|| DataError::NotFound(format!("{id}: year {year}")))?;
        record.set(field, value);
        self.put(id, &dataset)?;
        self.clear_erroneous(id)?;
        Ok(dataset)
    }

    /// 저장된 스냅샷을 감사합니다.
    ///
    /// 엄격한 컬럼 검증과 연도 유일성 불변식을 확인합니다. `mark`가
    /// 참이면 불변식 위반 회사를 오류 장부에 올립니다 (Clean →
    /// Erroneous 전이). 스냅샷이 없는 회사는 건너뜁니다.
    fn audit(&self, ids: &[String], mark: bool) -> Result<AuditOutcome> {
        let mut outcome = AuditOutcome::default();

        for id in ids {
            let dataset = match self.get(id) {
                Ok(dataset) => dataset,
                Err(DataError::NotFound(_)) => continue,
                Err(err) => return Err(err),
            };

            if !dataset.years_unique() {
                outcome.invalid.push(id.clone());
                if mark {
                    self.mark_erroneous(id)?;
                }
                continue;
            }

            if !columns_complete(&dataset, ColumnPolicy::Strict) {
                outcome.missing_columns.push(id.clone());
            }
        }

        Ok(outcome)
    }
}

/// 감사 결과.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AuditOutcome {
    /// 기준 컬럼이 누락된 회사 (재수집 후보)
    pub missing_columns: Vec<String>,
    /// 불변식 위반으로 수리가 필요한 회사
    pub invalid: Vec<String>,
}

/// 회사별 스냅샷 파일 내용.
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    company_id: String,
    reconciled_at: DateTime<Utc>,
    records: Vec<AnnualRecord>,
}

/// 디렉토리 기반 스냅샷 저장소.
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    /// 디렉토리를 지정해 저장소를 엽니다. 없으면 생성합니다.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// 저장소 디렉토리.
    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }

    fn snapshot_path(&self, id: &str) -> Result<PathBuf> {
        // 식별자가 파일명이 되므로 경로 문자를 거부
        if id.is_empty() || id.contains(['/', '\\', '.']) {
            return Err(DataError::InvalidData(format!("invalid company id: {id:?}")));
        }
        Ok(self.dir.join(format!("{id}.json")))
    }

    fn erroneous_path(&self) -> PathBuf {
        self.dir.join("erroneous.json")
    }

    fn read_erroneous(&self) -> Result<BTreeSet<String>> {
        let path = self.erroneous_path();
        if !path.exists() {
            return Ok(BTreeSet::new());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn write_erroneous(&self, set: &BTreeSet<String>) -> Result<()> {
        let content = serde_json::to_string_pretty(set)?;
        fs::write(self.erroneous_path(), content)?;
        Ok(())
    }
}

impl DatasetStore for SnapshotStore {
    fn get(&self, id: &str) -> Result<AnnualDataset> {
        let path = self.snapshot_path(id)?;
        if !path.exists() {
            return Err(DataError::NotFound(id.to_string()));
        }
        let content = fs::read_to_string(path)?;
        let snapshot: Snapshot = serde_json::from_str(&content)?;
        // 생성자를 거쳐 내림차순 정렬 불변식을 복원
        Ok(AnnualDataset::new(snapshot.company_id, snapshot.records))
    }

    fn put(&self, id: &str, dataset: &AnnualDataset) -> Result<()> {
        let path = self.snapshot_path(id)?;
        let snapshot = Snapshot {
            company_id: id.to_string(),
            reconciled_at: Utc::now(),
            records: dataset.records().to_vec(),
        };
        let content = serde_json::to_string_pretty(&snapshot)?;
        fs::write(&path, content)?;
        debug!(company = id, path = %path.display(), "스냅샷 저장");
        Ok(())
    }

    fn contains(&self, id: &str) -> bool {
        self.snapshot_path(id).map(|p| p.exists()).unwrap_or(false)
    }

    fn ids(&self) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if stem != "erroneous" {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }

    fn erroneous_ids(&self) -> Result<Vec<String>> {
        Ok(self.read_erroneous()?.into_iter().collect())
    }

    fn mark_erroneous(&self, id: &str) -> Result<()> {
        let mut set = self.read_erroneous()?;
        if set.insert(id.to_string()) {
            self.write_erroneous(&set)?;
        }
        Ok(())
    }

    fn clear_erroneous(&self, id: &str) -> Result<()> {
        let mut set = self.read_erroneous()?;
        if set.remove(id) {
            self.write_erroneous(&set)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::{RawCell, RawRow, YEAR_LABEL};
    use rust_decimal_macros::dec;
    use screener_core::Company;

    fn record(year: i32, turnover: Decimal) -> AnnualRecord {
        let mut r = AnnualRecord::new(year);
        r.turnover = Some(turnover);
        r
    }

    fn sample_dataset(id: &str) -> AnnualDataset {
        AnnualDataset::new(
            id,
            vec![record(2014, dec!(90)), record(2016, dec!(120)), record(2015, dec!(110))],
        )
    }

    #[test]
    fn test_put_get_roundtrip_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::open(dir.path()).unwrap();

        store.put("1930", &sample_dataset("1930")).unwrap();
        let loaded = store.get("1930").unwrap();

        let years: Vec<i32> = loaded.records().iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2016, 2015, 2014]);
        assert_eq!(loaded.year(2015).unwrap().turnover, Some(dec!(110)));
    }

    #[test]
    fn test_put_is_idempotent_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::open(dir.path()).unwrap();

        store.put("1930", &sample_dataset("1930")).unwrap();
        let smaller = AnnualDataset::new("1930", vec![record(2016, dec!(200))]);
        store.put("1930", &smaller).unwrap();

        let loaded = store.get("1930").unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.latest().unwrap().turnover, Some(dec!(200)));
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::open(dir.path()).unwrap();

        match store.get("9999") {
            Err(DataError::NotFound(id)) => assert_eq!(id, "9999"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_id_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::open(dir.path()).unwrap();

        let err = store.put("../escape", &sample_dataset("x")).unwrap_err();
        assert!(matches!(err, DataError::InvalidData(_)));
    }

    #[test]
    fn test_missing_and_working_sets() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::open(dir.path()).unwrap();

        let universe = Universe::new(vec![
            Company::new("1930", "Nokian Renkaat"),
            Company::new("2048", "Kone"),
            Company::new("2112", "Fortum"),
        ]);

        store.put("1930", &sample_dataset("1930")).unwrap();
        store.put("2048", &sample_dataset("2048")).unwrap();

        assert_eq!(store.list_missing(&universe), vec!["2112".to_string()]);

        // 작업 집합 = 전체 − 결측 − 수동 제외
        let working = store.working_ids(&universe, &["2048".to_string()]);
        assert_eq!(working, vec!["1930".to_string()]);
    }

    #[test]
    fn test_erroneous_ledger_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = SnapshotStore::open(dir.path()).unwrap();
            store.mark_erroneous("1930").unwrap();
            store.mark_erroneous("2048").unwrap();
            store.clear_erroneous("2048").unwrap();
        }

        let reopened = SnapshotStore::open(dir.path()).unwrap();
        assert_eq!(reopened.erroneous_ids().unwrap(), vec!["1930".to_string()]);
        // 장부 파일은 스냅샷 목록에 섞이지 않음
        assert!(reopened.ids().unwrap().is_empty());
    }

    #[test]
    fn test_quality_transitions() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::open(dir.path()).unwrap();

        assert_eq!(store.quality("1930").unwrap(), DatasetQuality::Missing);

        store.put("1930", &sample_dataset("1930")).unwrap();
        assert_eq!(store.quality("1930").unwrap(), DatasetQuality::Clean);

        store.mark_erroneous("1930").unwrap();
        assert_eq!(store.quality("1930").unwrap(), DatasetQuality::Erroneous);

        // 수리 후 재검증 성공 → Clean 복귀
        store
            .repair("1930", 2016, Field::Turnover, Some(dec!(130)))
            .unwrap();
        assert_eq!(store.quality("1930").unwrap(), DatasetQuality::Clean);
        assert_eq!(store.get("1930").unwrap().year(2016).unwrap().turnover, Some(dec!(130)));
    }

    #[test]
    fn test_ingest_failure_marks_erroneous() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::open(dir.path()).unwrap();

        let mut table = RawTable::new();
        table.push(
            RawRow::new()
                .with(YEAR_LABEL, RawCell::Number(dec!(2016)))
                .with("Turnover", RawCell::text("ei saatavilla")),
        );

        assert!(store.ingest("1930", &table, NumericPolicy::Strict).is_err());
        assert_eq!(store.erroneous_ids().unwrap(), vec!["1930".to_string()]);

        // 강등 정책으로 재수집하면 성공하고 장부에서 내려감
        let dataset = store.ingest("1930", &table, NumericPolicy::Coerce).unwrap();
        assert_eq!(dataset.latest().unwrap().turnover, None);
        assert!(store.erroneous_ids().unwrap().is_empty());
    }

    #[test]
    fn test_audit_flags_missing_columns() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::open(dir.path()).unwrap();

        // 매출만 있는 데이터셋은 엄격한 컬럼 검증에서 탈락
        store.put("1930", &sample_dataset("1930")).unwrap();

        let outcome = store.audit(&["1930".to_string(), "9999".to_string()], false).unwrap();
        assert_eq!(outcome.missing_columns, vec!["1930".to_string()]);
        assert!(outcome.invalid.is_empty());
    }
}
