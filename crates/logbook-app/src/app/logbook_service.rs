//! Logbook Service - Vehicle and Invoice Use Cases
//!
//! Onboarding, invoice entry, CSV import, vehicle transfer between owners
//! and Excel export, on top of the repository traits.

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::info;

use logbook_domain::model::{ServiceRecord, TechnicalSpecs, Vehicle};
use logbook_domain::repository::normalize_plate;
use logbook_domain::service::DiagnosticEvaluator;
use logbook_domain::{ServiceRecordRepository, VehicleRepository};
use logbook_infra::excel::{export_to_excel, LogbookReport};
use logbook_infra::record_csv::load_records_from_csv;
use logbook_infra::transfer::TransferBundle;
use logbook_types::{Error, Result};

use super::dashboard_service::{Dashboard, DashboardService, DashboardSettings};

/// Outcome of a transfer bundle import
#[derive(Debug, Clone, Serialize)]
pub struct TransferImport {
    pub vehicle: Vehicle,
    pub record_count: usize,
    /// Nothing was written to the store
    pub dry_run: bool,
}

pub struct LogbookService<V, R> {
    vehicles: V,
    records: R,
    evaluator: DiagnosticEvaluator,
    settings: DashboardSettings,
}

impl<V: VehicleRepository, R: ServiceRecordRepository> LogbookService<V, R> {
    pub fn new(vehicles: V, records: R, evaluator: DiagnosticEvaluator) -> Self {
        Self {
            vehicles,
            records,
            evaluator,
            settings: DashboardSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: DashboardSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn evaluator(&self) -> &DiagnosticEvaluator {
        &self.evaluator
    }

    // ========================================================================
    // Vehicles
    // ========================================================================

    /// Find a vehicle by ID or plate
    pub fn resolve_vehicle(&self, key: &str) -> Result<Vehicle> {
        if let Some(vehicle) = self.vehicles.find_by_id(key)? {
            return Ok(vehicle);
        }
        self.vehicles
            .find_by_plate(key)?
            .ok_or_else(|| Error::VehicleNotFound(key.to_string()))
    }

    pub fn list_vehicles(&self) -> Result<Vec<Vehicle>> {
        self.vehicles.find_all()
    }

    /// Register a vehicle; plates are unique in the store
    pub fn add_vehicle(&self, vehicle: Vehicle) -> Result<Vehicle> {
        if vehicle.name.trim().is_empty() {
            return Err(Error::InvalidInput("vehicle name is empty".to_string()));
        }
        if normalize_plate(&vehicle.plate).is_empty() {
            return Err(Error::InvalidInput("license plate is empty".to_string()));
        }
        if let Some(existing) = self.vehicles.find_by_plate(&vehicle.plate)? {
            return Err(Error::InvalidInput(format!(
                "plate {} is already registered ({})",
                existing.plate, existing.name
            )));
        }

        self.vehicles.save(&vehicle)?;
        Ok(vehicle)
    }

    /// Edit the technical sheet by hand; a blank value clears the field
    pub fn update_specs(&self, key: &str, specs: &TechnicalSpecs) -> Result<Vehicle> {
        let mut vehicle = self.resolve_vehicle(key)?;
        vehicle.specs.merge(specs);
        self.vehicles.save(&vehicle)?;
        Ok(vehicle)
    }

    /// Remove a vehicle and all of its records
    pub fn remove_vehicle(&self, key: &str) -> Result<(Vehicle, usize)> {
        let vehicle = self.resolve_vehicle(key)?;
        let removed = self.records.remove_by_vehicle(&vehicle.id)?;
        self.vehicles.remove(&vehicle.id)?;
        info!(vehicle = %vehicle.id, records = removed, "vehicle removed with its records");
        Ok((vehicle, removed))
    }

    // ========================================================================
    // Records
    // ========================================================================

    /// Store a record; technical specs read from the invoice are merged into
    /// the vehicle's technical sheet
    pub fn add_record(&self, record: ServiceRecord) -> Result<ServiceRecord> {
        let mut vehicle = self
            .vehicles
            .find_by_id(&record.vehicle_id)?
            .ok_or_else(|| Error::VehicleNotFound(record.vehicle_id.clone()))?;
        validate_record(&record)?;

        self.records.save(&record)?;

        if let Some(ref specs) = record.detected_specs {
            let before = vehicle.specs.clone();
            vehicle.specs.merge(specs);
            if vehicle.specs != before {
                self.vehicles.save(&vehicle)?;
                info!(vehicle = %vehicle.id, "technical sheet updated from invoice");
            }
        }

        Ok(record)
    }

    /// Records of a vehicle, newest first
    pub fn history(&self, key: &str) -> Result<(Vehicle, Vec<ServiceRecord>)> {
        let vehicle = self.resolve_vehicle(key)?;
        let records = self.records.find_by_vehicle(&vehicle.id)?;
        let records = super::dashboard_service::recent_records(&records, records.len());
        Ok((vehicle, records))
    }

    /// Import records from a CSV file; nothing is stored if a row is invalid
    pub fn import_csv(&self, key: &str, path: &Path) -> Result<Vec<ServiceRecord>> {
        let vehicle = self.resolve_vehicle(key)?;
        let records = load_records_from_csv(path, &vehicle.id)?;
        for record in &records {
            validate_record(record)?;
        }
        self.records.save_all(&records)?;
        info!(vehicle = %vehicle.id, count = records.len(), "records imported from CSV");
        Ok(records)
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    pub fn dashboard_service(&self) -> DashboardService<'_> {
        DashboardService::new(&self.vehicles, &self.records, &self.evaluator, self.settings)
    }

    pub fn dashboard(&self, key: &str, today: NaiveDate) -> Result<Dashboard> {
        let vehicle = self.resolve_vehicle(key)?;
        self.dashboard_service().dashboard(&vehicle.id, today)
    }

    // ========================================================================
    // Transfer and export
    // ========================================================================

    /// Write the transfer bundle of a vehicle (seller side)
    pub fn export_transfer(
        &self,
        key: &str,
        path: &Path,
        exported_at: DateTime<Utc>,
    ) -> Result<TransferBundle> {
        let (vehicle, records) = self.history(key)?;
        let bundle = TransferBundle::new(vehicle, records, exported_at);
        bundle.write_to(path)?;
        info!(vehicle = %bundle.vehicle.id, path = %path.display(), "transfer bundle written");
        Ok(bundle)
    }

    /// Read a transfer bundle and register its vehicle (buyer side)
    pub fn import_transfer(&self, path: &Path, dry_run: bool) -> Result<TransferImport> {
        let bundle = TransferBundle::read_from(path)?;
        if let Some(existing) = self.vehicles.find_by_plate(&bundle.vehicle.plate)? {
            return Err(Error::Transfer(format!(
                "plate {} is already registered ({})",
                existing.plate, existing.name
            )));
        }

        let (vehicle, records) = bundle.into_rekeyed();
        if !dry_run {
            self.vehicles.save(&vehicle)?;
            if let Err(e) = self.records.save_all(&records) {
                // no vehicle without its history
                self.vehicles.remove(&vehicle.id)?;
                return Err(e);
            }
            info!(vehicle = %vehicle.id, records = records.len(), "vehicle imported from transfer bundle");
        }

        Ok(TransferImport {
            vehicle,
            record_count: records.len(),
            dry_run,
        })
    }

    /// Export the dashboard and full history of a vehicle to a workbook
    pub fn export_excel(&self, key: &str, today: NaiveDate, path: &Path) -> Result<()> {
        let vehicle = self.resolve_vehicle(key)?;
        let records = self.records.find_by_vehicle(&vehicle.id)?;
        let dashboard = self.dashboard_service().build(vehicle, &records, today);

        let report = LogbookReport {
            vehicle: &dashboard.vehicle,
            verdict: &dashboard.verdict,
            next_inspection: dashboard.next_inspection,
            fuel: &dashboard.fuel,
            records: &records,
        };
        export_to_excel(&report, path)?;
        info!(vehicle = %dashboard.vehicle.id, path = %path.display(), "Excel report written");
        Ok(())
    }
}

fn validate_record(record: &ServiceRecord) -> Result<()> {
    if record.title.trim().is_empty() {
        return Err(Error::InvalidInput("record title is empty".to_string()));
    }
    if !record.price_amount.is_finite() || record.price_amount < 0.0 {
        return Err(Error::InvalidInput(format!(
            "invalid price for '{}': {}",
            record.title, record.price_amount
        )));
    }
    if let Some(volume) = record.fuel_volume {
        if !volume.is_finite() || volume < 0.0 {
            return Err(Error::InvalidInput(format!(
                "invalid fuel volume for '{}': {}",
                record.title, volume
            )));
        }
    }
    Ok(())
}
