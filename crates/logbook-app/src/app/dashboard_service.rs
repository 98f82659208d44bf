//! Dashboard Service - Health Overview of One Vehicle
//!
//! Loads a vehicle and its records, then assembles what the dashboard shows:
//! - the diagnostic verdict
//! - the next technical inspection date
//! - fuel economy and the overconsumption notice
//! - the last known mileage and the most recent records

use chrono::NaiveDate;
use serde::Serialize;

use logbook_domain::model::{FuelEconomySummary, FuelType, ServiceRecord, Vehicle};
use logbook_domain::service::{current_distance, summarize_fuel_economy, DiagnosticEvaluator};
use logbook_domain::{DiagnosticVerdict, ServiceRecordRepository, VehicleRepository};
use logbook_types::{Error, Result};

/// Display settings taken from the configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashboardSettings {
    pub overconsumption_threshold: f64,
    pub history_limit: usize,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            overconsumption_threshold: 8.5,
            history_limit: 5,
        }
    }
}

/// Notice shown when a diesel vehicle burns more than expected
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverconsumptionNotice {
    pub average: f64,
    pub threshold: f64,
    pub message: String,
}

/// Everything the dashboard displays for one vehicle
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub vehicle: Vehicle,
    pub verdict: DiagnosticVerdict,
    pub next_inspection: NaiveDate,
    pub fuel: FuelEconomySummary,
    pub overconsumption: Option<OverconsumptionNotice>,
    pub last_known_mileage: u32,
    /// Newest first, capped by the history limit
    pub recent_records: Vec<ServiceRecord>,
}

/// Overconsumption notice, for diesel vehicles whose average strictly
/// exceeds `threshold`
pub fn overconsumption_notice(
    vehicle: &Vehicle,
    summary: &FuelEconomySummary,
    threshold: f64,
) -> Option<OverconsumptionNotice> {
    let average = summary.average_consumption_per_hundred_km?;
    if vehicle.fuel_type != FuelType::Diesel || average <= threshold {
        return None;
    }

    Some(OverconsumptionNotice {
        average,
        threshold,
        message: format!(
            "High consumption: {:.1} L/100km (over {:.1}). Check tyre pressure.",
            average, threshold
        ),
    })
}

/// Highest odometer reading on record, else the odometer at onboarding
pub fn last_known_mileage(vehicle: &Vehicle, records: &[ServiceRecord]) -> u32 {
    if records.is_empty() {
        vehicle.initial_odometer
    } else {
        current_distance(records)
    }
}

/// Records newest first (date, then odometer), at most `limit`
pub fn recent_records(records: &[ServiceRecord], limit: usize) -> Vec<ServiceRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then(b.odometer_reading.cmp(&a.odometer_reading))
    });
    sorted.truncate(limit);
    sorted
}

pub struct DashboardService<'a> {
    vehicles: &'a dyn VehicleRepository,
    records: &'a dyn ServiceRecordRepository,
    evaluator: &'a DiagnosticEvaluator,
    settings: DashboardSettings,
}

impl<'a> DashboardService<'a> {
    pub fn new(
        vehicles: &'a dyn VehicleRepository,
        records: &'a dyn ServiceRecordRepository,
        evaluator: &'a DiagnosticEvaluator,
        settings: DashboardSettings,
    ) -> Self {
        Self {
            vehicles,
            records,
            evaluator,
            settings,
        }
    }

    /// Dashboard of the vehicle with `vehicle_id`, as of `today`
    pub fn dashboard(&self, vehicle_id: &str, today: NaiveDate) -> Result<Dashboard> {
        let vehicle = self
            .vehicles
            .find_by_id(vehicle_id)?
            .ok_or_else(|| Error::VehicleNotFound(vehicle_id.to_string()))?;
        let records = self.records.find_by_vehicle(&vehicle.id)?;

        Ok(self.build(vehicle, &records, today))
    }

    /// Assemble the dashboard from already loaded data
    pub fn build(&self, vehicle: Vehicle, records: &[ServiceRecord], today: NaiveDate) -> Dashboard {
        let verdict = self.evaluator.evaluate(&vehicle, records, today);
        let next_inspection =
            self.evaluator
                .next_inspection_due(vehicle.first_registration_date, records, today);
        let fuel = summarize_fuel_economy(records);
        let overconsumption =
            overconsumption_notice(&vehicle, &fuel, self.settings.overconsumption_threshold);

        Dashboard {
            last_known_mileage: last_known_mileage(&vehicle, records),
            recent_records: recent_records(records, self.settings.history_limit),
            vehicle,
            verdict,
            next_inspection,
            fuel,
            overconsumption,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn summary(average: Option<f64>) -> FuelEconomySummary {
        FuelEconomySummary {
            fill_count: 2,
            average_consumption_per_hundred_km: average,
            ..Default::default()
        }
    }

    fn vehicle(fuel: FuelType) -> Vehicle {
        Vehicle::new("Berlingo", "AA-001-AA", date(2020, 1, 1), fuel)
    }

    // ========================================================================
    // Overconsumption
    // ========================================================================

    #[test]
    fn test_overconsumption_diesel_only() {
        let notice = overconsumption_notice(&vehicle(FuelType::Diesel), &summary(Some(9.26)), 8.5)
            .unwrap();
        assert_eq!(notice.average, 9.26);
        assert!(notice.message.contains("9.3 L/100km"));

        assert!(overconsumption_notice(&vehicle(FuelType::Gasoline), &summary(Some(9.26)), 8.5)
            .is_none());
    }

    #[test]
    fn test_overconsumption_threshold_is_strict() {
        let diesel = vehicle(FuelType::Diesel);
        assert!(overconsumption_notice(&diesel, &summary(Some(8.5)), 8.5).is_none());
        assert!(overconsumption_notice(&diesel, &summary(Some(8.51)), 8.5).is_some());
        assert!(overconsumption_notice(&diesel, &summary(None), 8.5).is_none());
    }

    // ========================================================================
    // History
    // ========================================================================

    #[test]
    fn test_last_known_mileage_falls_back_to_initial_odometer() {
        let v = vehicle(FuelType::Diesel).with_initial_odometer(42_000);
        assert_eq!(last_known_mileage(&v, &[]), 42_000);

        let records = vec![ServiceRecord::fuel(&v.id, "Plein", date(2026, 1, 1), 43_100, 80.0, 45.0)];
        assert_eq!(last_known_mileage(&v, &records), 43_100);
    }

    #[test]
    fn test_recent_records_newest_first_and_capped() {
        let records: Vec<_> = (1..=7)
            .map(|m| ServiceRecord::fuel("v", "Plein", date(2026, m, 1), m * 1000, 70.0, 40.0))
            .collect();
        let recent = recent_records(&records, 5);
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].date, date(2026, 7, 1));
        assert_eq!(recent[4].date, date(2026, 3, 1));
    }
}
