//! Persisted datasets: one CSV file each plus a JSON bookkeeping index.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use etl_table::CsvTable;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{Result, StarWarsError};

const INDEX_FILE: &str = "datasets.json";

/// Bookkeeping for one stored dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub uuid: Uuid,
    pub date: DateTime<Utc>,
    /// CSV location relative to the store root.
    pub file: PathBuf,
}

impl Dataset {
    fn new(date: DateTime<Utc>) -> Self {
        let uuid = Uuid::new_v4();
        let file = PathBuf::from(format!(
            "datasets/{}/{uuid}.csv",
            date.format("%Y/%m/%d")
        ));
        Self { uuid, date, file }
    }
}

/// Where fetched tables are kept.
pub trait DatasetStore {
    /// Persist CSV bytes as a new dataset.
    fn save(&self, csv: &[u8]) -> Result<Dataset>;

    /// All datasets, newest first.
    fn list(&self) -> Result<Vec<Dataset>>;

    /// Look a dataset up by its UUID string.
    fn get(&self, id: &str) -> Result<Dataset>;

    /// Lazily re-readable table over the dataset's CSV.
    fn load(&self, dataset: &Dataset) -> Result<CsvTable>;
}

/// Datasets under a directory: `datasets/YYYY/MM/DD/<uuid>.csv` plus
/// `datasets.json`.
///
/// The CSV is written before the index entry, so a failed save never leaves
/// a listed dataset without its file.
#[derive(Debug, Clone)]
pub struct FileDatasetStore {
    root: PathBuf,
}

impl FileDatasetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of a dataset's CSV.
    pub fn path_of(&self, dataset: &Dataset) -> PathBuf {
        self.root.join(&dataset.file)
    }

    /// Persist CSV bytes with an explicit timestamp.
    pub fn save_dated(&self, csv: &[u8], date: DateTime<Utc>) -> Result<Dataset> {
        let dataset = Dataset::new(date);
        let path = self.path_of(&dataset);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, csv)?;

        let mut index = self.read_index()?;
        index.push(dataset.clone());
        if let Err(e) = self.write_index(&index) {
            if let Err(cleanup) = fs::remove_file(&path) {
                warn!(path = %path.display(), error = %cleanup, "Failed to remove orphaned dataset file");
            }
            return Err(e);
        }

        info!(uuid = %dataset.uuid, path = %path.display(), bytes = csv.len(), "Saved dataset");
        Ok(dataset)
    }

    fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_FILE)
    }

    fn read_index(&self) -> Result<Vec<Dataset>> {
        match fs::read(self.index_path()) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_index(&self, index: &[Dataset]) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        let tmp = self.root.join(format!("{INDEX_FILE}.tmp"));
        fs::write(&tmp, serde_json::to_vec_pretty(index)?)?;
        fs::rename(&tmp, self.index_path())?;
        Ok(())
    }
}

impl DatasetStore for FileDatasetStore {
    fn save(&self, csv: &[u8]) -> Result<Dataset> {
        self.save_dated(csv, Utc::now())
    }

    fn list(&self) -> Result<Vec<Dataset>> {
        let mut datasets = self.read_index()?;
        datasets.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(datasets)
    }

    fn get(&self, id: &str) -> Result<Dataset> {
        let not_found = || StarWarsError::DatasetNotFound { id: id.to_string() };
        let uuid = Uuid::parse_str(id.trim()).map_err(|_| not_found())?;
        self.read_index()?
            .into_iter()
            .find(|d| d.uuid == uuid)
            .ok_or_else(not_found)
    }

    fn load(&self, dataset: &Dataset) -> Result<CsvTable> {
        let path = self.path_of(dataset);
        if !path.is_file() {
            return Err(StarWarsError::DatasetNotFound {
                id: dataset.uuid.to_string(),
            });
        }
        Ok(CsvTable::from_path(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use etl_table::{Table, Value};

    const CSV: &[u8] = b"name,homeworld\nLuke,Tatooine\nLeia,Alderaan\n";

    #[test]
    fn test_save_writes_dated_path() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDatasetStore::new(dir.path());
        let date = Utc.with_ymd_and_hms(2021, 6, 12, 8, 30, 0).unwrap();

        let dataset = store.save_dated(CSV, date).unwrap();
        assert_eq!(
            dataset.file,
            PathBuf::from(format!("datasets/2021/06/12/{}.csv", dataset.uuid))
        );
        assert_eq!(fs::read(store.path_of(&dataset)).unwrap(), CSV);
        assert!(dir.path().join("datasets.json").is_file());
    }

    #[test]
    fn test_list_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDatasetStore::new(dir.path());
        let older = store
            .save_dated(CSV, Utc.with_ymd_and_hms(2021, 6, 12, 8, 0, 0).unwrap())
            .unwrap();
        let newer = store
            .save_dated(CSV, Utc.with_ymd_and_hms(2021, 6, 13, 8, 0, 0).unwrap())
            .unwrap();

        let listed: Vec<Uuid> = store.list().unwrap().into_iter().map(|d| d.uuid).collect();
        assert_eq!(listed, [newer.uuid, older.uuid]);
    }

    #[test]
    fn test_empty_store_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FileDatasetStore::new(dir.path().join("missing")).list().unwrap().is_empty());
    }

    #[test]
    fn test_get_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDatasetStore::new(dir.path());
        let saved = store.save(CSV).unwrap();

        let found = store.get(&saved.uuid.to_string()).unwrap();
        assert_eq!(found, saved);

        let table = store.load(&found).unwrap();
        assert_eq!(table.header().unwrap().names(), ["name", "homeworld"]);
        assert_eq!(
            table.rows().unwrap()[1],
            vec![Value::from("Leia"), Value::from("Alderaan")]
        );
    }

    #[test]
    fn test_get_unknown_or_invalid_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDatasetStore::new(dir.path());
        store.save(CSV).unwrap();

        for id in [Uuid::new_v4().to_string(), "not-a-uuid".to_string()] {
            assert!(matches!(
                store.get(&id),
                Err(StarWarsError::DatasetNotFound { id: missing }) if missing == id
            ));
        }
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDatasetStore::new(dir.path());
        let saved = store.save(CSV).unwrap();
        fs::remove_file(store.path_of(&saved)).unwrap();
        assert!(matches!(
            store.load(&saved),
            Err(StarWarsError::DatasetNotFound { .. })
        ));
    }

    #[test]
    fn test_corrupt_index_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("datasets.json"), b"{not json").unwrap();
        let store = FileDatasetStore::new(dir.path());
        assert!(matches!(store.list(), Err(StarWarsError::Index(_))));
    }
}
