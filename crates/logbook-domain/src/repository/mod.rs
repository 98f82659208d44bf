//! Repository trait definitions for data persistence

use logbook_types::Error;

use crate::model::{ServiceRecord, Vehicle};

/// Repository for registered vehicles
pub trait VehicleRepository {
    /// Insert or replace a vehicle
    fn save(&self, vehicle: &Vehicle) -> Result<(), Error>;

    /// Find a vehicle by its ID
    fn find_by_id(&self, id: &str) -> Result<Option<Vehicle>, Error>;

    /// Find a vehicle by license plate (case and separator insensitive)
    fn find_by_plate(&self, plate: &str) -> Result<Option<Vehicle>, Error>;

    /// Find all vehicles
    fn find_all(&self) -> Result<Vec<Vehicle>, Error>;

    /// Remove a vehicle, returning whether it existed
    fn remove(&self, id: &str) -> Result<bool, Error>;
}

/// Repository for maintenance and fuel invoices
pub trait ServiceRecordRepository {
    /// Insert or replace a record
    fn save(&self, record: &ServiceRecord) -> Result<(), Error>;

    /// Insert or replace several records. Stores that can write a batch at
    /// once should override this so a failure leaves none of them stored.
    fn save_all(&self, records: &[ServiceRecord]) -> Result<(), Error> {
        for record in records {
            self.save(record)?;
        }
        Ok(())
    }

    /// All records of a vehicle, in storage order
    fn find_by_vehicle(&self, vehicle_id: &str) -> Result<Vec<ServiceRecord>, Error>;

    /// Remove all records of a vehicle, returning how many were removed
    fn remove_by_vehicle(&self, vehicle_id: &str) -> Result<usize, Error>;
}

/// Normalize a plate for comparison: separators dropped, uppercase
pub fn normalize_plate(plate: &str) -> String {
    plate
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_uppercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_plate() {
        assert_eq!(normalize_plate("ab-123-cd"), "AB123CD");
        assert_eq!(normalize_plate("AB 123 CD"), "AB123CD");
    }
}
