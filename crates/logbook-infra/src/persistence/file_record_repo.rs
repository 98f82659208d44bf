//! File-based service record repository implementation

use std::cell::RefCell;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use tracing::info;

use logbook_domain::model::ServiceRecord;
use logbook_domain::repository::ServiceRecordRepository;
use logbook_types::{Error, Result};

/// File-based implementation of ServiceRecordRepository
///
/// Records of every vehicle live in a single `records.json`, in insertion
/// order.
pub struct FileServiceRecordRepository {
    store_path: PathBuf,
    records: RefCell<Vec<ServiceRecord>>,
}

impl FileServiceRecordRepository {
    /// Create or load a record repository
    pub fn open(store_dir: &Path) -> Result<Self> {
        fs::create_dir_all(store_dir)?;
        let store_path = store_dir.join("records.json");

        let records = if store_path.exists() {
            let file = File::open(&store_path)?;
            let reader = BufReader::new(file);
            serde_json::from_reader(reader)?
        } else {
            Vec::new()
        };

        Ok(Self {
            store_path,
            records: RefCell::new(records),
        })
    }

    /// Write `records` to disk, then make them the cached state.
    /// A failed write leaves the cache untouched.
    fn commit(&self, records: Vec<ServiceRecord>) -> Result<()> {
        let file = File::create(&self.store_path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &records)?;
        *self.records.borrow_mut() = records;
        Ok(())
    }

    /// Get total record count
    pub fn count(&self) -> usize {
        self.records.borrow().len()
    }
}

fn upsert(records: &mut Vec<ServiceRecord>, record: &ServiceRecord) {
    match records.iter_mut().find(|r| r.id == record.id) {
        Some(existing) => *existing = record.clone(),
        None => records.push(record.clone()),
    }
}

impl ServiceRecordRepository for FileServiceRecordRepository {
    fn save(&self, record: &ServiceRecord) -> std::result::Result<(), Error> {
        let mut records = self.records.borrow().clone();
        upsert(&mut records, record);
        self.commit(records)?;
        info!(record = %record.id, vehicle = %record.vehicle_id, "service record saved");
        Ok(())
    }

    /// Single write for the whole batch
    fn save_all(&self, new_records: &[ServiceRecord]) -> std::result::Result<(), Error> {
        let mut records = self.records.borrow().clone();
        for record in new_records {
            upsert(&mut records, record);
        }
        self.commit(records)?;
        info!(count = new_records.len(), "service records saved");
        Ok(())
    }

    fn find_by_vehicle(&self, vehicle_id: &str) -> std::result::Result<Vec<ServiceRecord>, Error> {
        Ok(self
            .records
            .borrow()
            .iter()
            .filter(|r| r.vehicle_id == vehicle_id)
            .cloned()
            .collect())
    }

    fn remove_by_vehicle(&self, vehicle_id: &str) -> std::result::Result<usize, Error> {
        let mut records = self.records.borrow().clone();
        records.retain(|r| r.vehicle_id != vehicle_id);
        let removed = self.count() - records.len();
        if removed > 0 {
            self.commit(records)?;
            info!(vehicle = %vehicle_id, removed, "service records removed");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_records_filtered_by_vehicle() {
        let dir = tempdir().unwrap();
        let repo = FileServiceRecordRepository::open(dir.path()).unwrap();
        repo.save(&ServiceRecord::maintenance("a", "Vidange", date(2026, 1, 1), 10000, 90.0))
            .unwrap();
        repo.save(&ServiceRecord::fuel("b", "Plein", date(2026, 1, 2), 500, 70.0, 40.0))
            .unwrap();
        repo.save(&ServiceRecord::fuel("a", "Plein", date(2026, 2, 1), 10600, 72.0, 41.0))
            .unwrap();

        let reopened = FileServiceRecordRepository::open(dir.path()).unwrap();
        let records = reopened.find_by_vehicle("a").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "Vidange");
        assert_eq!(records[1].fuel_volume, Some(41.0));
    }

    #[test]
    fn test_save_replaces_same_id() {
        let dir = tempdir().unwrap();
        let repo = FileServiceRecordRepository::open(dir.path()).unwrap();
        let mut record = ServiceRecord::maintenance("a", "Vidnage", date(2026, 1, 1), 10000, 90.0);
        repo.save(&record).unwrap();
        record.title = "Vidange".to_string();
        repo.save(&record).unwrap();
        assert_eq!(repo.count(), 1);
        assert_eq!(repo.find_by_vehicle("a").unwrap()[0].title, "Vidange");
    }

    #[test]
    fn test_remove_by_vehicle() {
        let dir = tempdir().unwrap();
        let repo = FileServiceRecordRepository::open(dir.path()).unwrap();
        repo.save_all(&[
            ServiceRecord::maintenance("a", "Vidange", date(2026, 1, 1), 10000, 90.0),
            ServiceRecord::maintenance("a", "CT", date(2026, 2, 1), 10500, 78.0),
            ServiceRecord::maintenance("b", "CT", date(2026, 2, 1), 40500, 78.0),
        ])
        .unwrap();
        assert_eq!(repo.remove_by_vehicle("a").unwrap(), 2);
        assert_eq!(repo.remove_by_vehicle("a").unwrap(), 0);
        assert_eq!(repo.count(), 1);
    }

    #[test]
    fn test_failed_write_keeps_cache() {
        let dir = tempdir().unwrap();
        let repo = FileServiceRecordRepository::open(dir.path()).unwrap();
        repo.save(&ServiceRecord::maintenance("a", "Vidange", date(2026, 1, 1), 10000, 90.0))
            .unwrap();

        // a directory in place of records.json makes every write fail
        fs::remove_file(dir.path().join("records.json")).unwrap();
        fs::create_dir(dir.path().join("records.json")).unwrap();

        let batch = [
            ServiceRecord::fuel("a", "Plein", date(2026, 1, 2), 10300, 70.0, 40.0),
            ServiceRecord::fuel("a", "Plein", date(2026, 2, 1), 10600, 72.0, 41.0),
        ];
        assert!(repo.save_all(&batch).is_err());
        assert!(repo.remove_by_vehicle("a").is_err());
        assert_eq!(repo.count(), 1);
        assert_eq!(repo.find_by_vehicle("a").unwrap()[0].title, "Vidange");
    }
}
