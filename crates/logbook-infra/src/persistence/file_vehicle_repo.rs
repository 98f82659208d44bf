//! File-based vehicle repository implementation

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use tracing::info;

use logbook_domain::model::Vehicle;
use logbook_domain::repository::{normalize_plate, VehicleRepository};
use logbook_types::{Error, Result};

/// File-based implementation of VehicleRepository
///
/// Stores vehicles in `vehicles.json`, keyed by ID.
pub struct FileVehicleRepository {
    store_path: PathBuf,
    vehicles: RefCell<HashMap<String, Vehicle>>,
}

impl FileVehicleRepository {
    /// Create or load a vehicle repository
    pub fn open(store_dir: &Path) -> Result<Self> {
        fs::create_dir_all(store_dir)?;
        let store_path = store_dir.join("vehicles.json");

        let vehicles = if store_path.exists() {
            let file = File::open(&store_path)?;
            let reader = BufReader::new(file);
            serde_json::from_reader(reader)?
        } else {
            HashMap::new()
        };

        Ok(Self {
            store_path,
            vehicles: RefCell::new(vehicles),
        })
    }

    /// Write `vehicles` to disk, then make them the cached state.
    /// A failed write leaves the cache untouched.
    fn commit(&self, vehicles: HashMap<String, Vehicle>) -> Result<()> {
        let file = File::create(&self.store_path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &vehicles)?;
        *self.vehicles.borrow_mut() = vehicles;
        Ok(())
    }

    /// Get total vehicle count
    pub fn count(&self) -> usize {
        self.vehicles.borrow().len()
    }
}

impl VehicleRepository for FileVehicleRepository {
    fn save(&self, vehicle: &Vehicle) -> std::result::Result<(), Error> {
        let mut vehicles = self.vehicles.borrow().clone();
        vehicles.insert(vehicle.id.clone(), vehicle.clone());
        self.commit(vehicles)?;
        info!(vehicle = %vehicle.id, plate = %vehicle.plate, "vehicle saved");
        Ok(())
    }

    fn find_by_id(&self, id: &str) -> std::result::Result<Option<Vehicle>, Error> {
        Ok(self.vehicles.borrow().get(id).cloned())
    }

    fn find_by_plate(&self, plate: &str) -> std::result::Result<Option<Vehicle>, Error> {
        let wanted = normalize_plate(plate);
        let result = self
            .vehicles
            .borrow()
            .values()
            .find(|v| normalize_plate(&v.plate) == wanted)
            .cloned();
        Ok(result)
    }

    fn find_all(&self) -> std::result::Result<Vec<Vehicle>, Error> {
        let mut vehicles: Vec<_> = self.vehicles.borrow().values().cloned().collect();
        vehicles.sort_by(|a, b| a.name.cmp(&b.name).then(a.plate.cmp(&b.plate)));
        Ok(vehicles)
    }

    fn remove(&self, id: &str) -> std::result::Result<bool, Error> {
        let mut vehicles = self.vehicles.borrow().clone();
        let removed = vehicles.remove(id).is_some();
        if removed {
            self.commit(vehicles)?;
            info!(vehicle = %id, "vehicle removed");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use logbook_domain::model::FuelType;
    use tempfile::tempdir;

    fn sample(name: &str, plate: &str) -> Vehicle {
        Vehicle::new(
            name,
            plate,
            NaiveDate::from_ymd_opt(2019, 4, 2).unwrap(),
            FuelType::Gasoline,
        )
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let clio = sample("Clio", "AB-123-CD");
        {
            let repo = FileVehicleRepository::open(dir.path()).unwrap();
            repo.save(&clio).unwrap();
            repo.save(&sample("Alpine", "EF-456-GH")).unwrap();
        }

        let repo = FileVehicleRepository::open(dir.path()).unwrap();
        assert_eq!(repo.count(), 2);
        assert_eq!(repo.find_by_id(&clio.id).unwrap(), Some(clio));
        let names: Vec<_> = repo.find_all().unwrap().into_iter().map(|v| v.name).collect();
        assert_eq!(names, vec!["Alpine", "Clio"]);
    }

    #[test]
    fn test_find_by_plate_ignores_separators() {
        let dir = tempdir().unwrap();
        let repo = FileVehicleRepository::open(dir.path()).unwrap();
        repo.save(&sample("Clio", "AB-123-CD")).unwrap();
        assert!(repo.find_by_plate("ab 123 cd").unwrap().is_some());
        assert!(repo.find_by_plate("ZZ-999-ZZ").unwrap().is_none());
    }

    #[test]
    fn test_remove() {
        let dir = tempdir().unwrap();
        let repo = FileVehicleRepository::open(dir.path()).unwrap();
        let clio = sample("Clio", "AB-123-CD");
        repo.save(&clio).unwrap();
        assert!(repo.remove(&clio.id).unwrap());
        assert!(!repo.remove(&clio.id).unwrap());
        assert_eq!(repo.count(), 0);
    }

    #[test]
    fn test_failed_write_keeps_cache() {
        let dir = tempdir().unwrap();
        let repo = FileVehicleRepository::open(dir.path()).unwrap();
        let clio = sample("Clio", "AB-123-CD");
        repo.save(&clio).unwrap();

        fs::remove_file(dir.path().join("vehicles.json")).unwrap();
        fs::create_dir(dir.path().join("vehicles.json")).unwrap();

        assert!(repo.save(&sample("Alpine", "EF-456-GH")).is_err());
        assert!(repo.remove(&clio.id).is_err());
        assert_eq!(repo.count(), 1);
        assert!(repo.find_by_plate("EF-456-GH").unwrap().is_none());
        assert!(repo.find_by_id(&clio.id).unwrap().is_some());
    }
}
