//! Vehicle transfer bundle
//!
//! A single JSON file carrying a vehicle and its full invoice history, handed
//! from seller to buyer.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use logbook_domain::model::{ServiceRecord, Vehicle};
use logbook_types::{Error, Result};

/// Current bundle format version
pub const TRANSFER_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferBundle {
    pub version: u32,
    pub exported_at: DateTime<Utc>,
    pub vehicle: Vehicle,
    pub records: Vec<ServiceRecord>,
}

impl TransferBundle {
    pub fn new(vehicle: Vehicle, records: Vec<ServiceRecord>, exported_at: DateTime<Utc>) -> Self {
        Self {
            version: TRANSFER_VERSION,
            exported_at,
            vehicle,
            records,
        }
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Read and validate a bundle
    pub fn read_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound(format!(
                "Transfer bundle not found: {}",
                path.display()
            )));
        }
        let file = File::open(path)?;
        let bundle: TransferBundle = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| Error::Transfer(format!("Failed to parse bundle: {}", e)))?;
        bundle.validate()?;
        Ok(bundle)
    }

    fn validate(&self) -> Result<()> {
        if self.version != TRANSFER_VERSION {
            return Err(Error::Transfer(format!(
                "Unsupported bundle version {} (expected {})",
                self.version, TRANSFER_VERSION
            )));
        }
        if let Some(stray) = self
            .records
            .iter()
            .find(|r| r.vehicle_id != self.vehicle.id)
        {
            return Err(Error::Transfer(format!(
                "Record {} does not belong to vehicle {}",
                stray.id, self.vehicle.id
            )));
        }
        Ok(())
    }

    /// Vehicle and records under fresh IDs, ready to store on the buyer side
    pub fn into_rekeyed(self) -> (Vehicle, Vec<ServiceRecord>) {
        let mut vehicle = self.vehicle;
        vehicle.id = uuid::Uuid::new_v4().to_string();

        let records = self
            .records
            .into_iter()
            .map(|mut record| {
                record.id = uuid::Uuid::new_v4().to_string();
                record.vehicle_id = vehicle.id.clone();
                record
            })
            .collect();
        (vehicle, records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use logbook_domain::model::FuelType;
    use tempfile::tempdir;

    fn bundle() -> TransferBundle {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let vehicle = Vehicle::new("Golf", "GH-789-IJ", date, FuelType::Diesel);
        let records = vec![
            ServiceRecord::maintenance(&vehicle.id, "Vidange", date, 10000, 95.0),
            ServiceRecord::fuel(&vehicle.id, "Plein", date, 10400, 70.0, 40.0),
        ];
        TransferBundle::new(vehicle, records, Utc::now())
    }

    #[test]
    fn test_write_read_and_rekey() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("golf.json");
        let original = bundle();
        let original_id = original.vehicle.id.clone();
        original.write_to(&path).unwrap();

        let (vehicle, records) = TransferBundle::read_from(&path).unwrap().into_rekeyed();
        assert_ne!(vehicle.id, original_id);
        assert_eq!(vehicle.plate, "GH-789-IJ");
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.vehicle_id == vehicle.id));
    }

    #[test]
    fn test_rejects_unknown_version() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("future.json");
        let mut future = bundle();
        future.version = 99;
        future.write_to(&path).unwrap();

        let err = TransferBundle::read_from(&path).unwrap_err();
        assert!(matches!(err, Error::Transfer(_)));
    }

    #[test]
    fn test_rejects_foreign_record() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mixed.json");
        let mut mixed = bundle();
        mixed.records[0].vehicle_id = "someone-else".to_string();
        mixed.write_to(&path).unwrap();

        assert!(TransferBundle::read_from(&path).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = TransferBundle::read_from(Path::new("/nonexistent/bundle.json")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound(_)));
    }
}
