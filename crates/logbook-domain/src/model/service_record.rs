use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::TechnicalSpecs;

/// Invoice category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordCategory {
    Maintenance,
    Fuel,
}

impl std::fmt::Display for RecordCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordCategory::Maintenance => write!(f, "maintenance"),
            RecordCategory::Fuel => write!(f, "fuel"),
        }
    }
}

impl std::str::FromStr for RecordCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "maintenance" | "entretien" => Ok(RecordCategory::Maintenance),
            "fuel" | "carburant" => Ok(RecordCategory::Fuel),
            other => Err(format!("unknown record category: {}", other)),
        }
    }
}

/// A maintenance or fuel invoice attached to a vehicle
///
/// Records are immutable once created. Storage order says nothing about
/// chronology: sort by `date` or `odometer_reading` explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub id: String,
    pub vehicle_id: String,
    pub category: RecordCategory,
    /// Free-text label; the only signal for the maintenance sub-type
    pub title: String,
    pub date: NaiveDate,
    /// Odometer reading at the time of the event
    pub odometer_reading: u32,
    pub price_amount: f64,
    /// Litres pumped (fuel records only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_volume: Option<f64>,
    /// Technical fields read off the invoice
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_specs: Option<TechnicalSpecs>,
}

impl ServiceRecord {
    pub fn maintenance(
        vehicle_id: impl Into<String>,
        title: impl Into<String>,
        date: NaiveDate,
        odometer_reading: u32,
        price_amount: f64,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            vehicle_id: vehicle_id.into(),
            category: RecordCategory::Maintenance,
            title: title.into(),
            date,
            odometer_reading,
            price_amount,
            fuel_volume: None,
            detected_specs: None,
        }
    }

    pub fn fuel(
        vehicle_id: impl Into<String>,
        title: impl Into<String>,
        date: NaiveDate,
        odometer_reading: u32,
        price_amount: f64,
        fuel_volume: f64,
    ) -> Self {
        Self {
            category: RecordCategory::Fuel,
            fuel_volume: Some(fuel_volume),
            ..Self::maintenance(vehicle_id, title, date, odometer_reading, price_amount)
        }
    }

    pub fn with_detected_specs(mut self, specs: TechnicalSpecs) -> Self {
        self.detected_specs = Some(specs);
        self
    }

    pub fn is_fuel(&self) -> bool {
        self.category == RecordCategory::Fuel
    }

    pub fn is_maintenance(&self) -> bool {
        self.category == RecordCategory::Maintenance
    }
}
