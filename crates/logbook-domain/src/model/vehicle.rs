//! Vehicle type definitions

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::TechnicalSpecs;

/// Fuel type declared at onboarding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FuelType {
    Diesel,
    Gasoline,
    Hybrid,
    Electric,
}

impl FuelType {
    pub fn label(&self) -> &'static str {
        match self {
            FuelType::Diesel => "diesel",
            FuelType::Gasoline => "gasoline",
            FuelType::Hybrid => "hybrid",
            FuelType::Electric => "electric",
        }
    }
}

impl std::fmt::Display for FuelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for FuelType {
    type Err = String;

    /// Accepts the English names and the French labels used on
    /// registration certificates (gazole, essence, hybride, électrique).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "diesel" | "gazole" | "gasoil" => Ok(FuelType::Diesel),
            "gasoline" | "petrol" | "essence" => Ok(FuelType::Gasoline),
            "hybrid" | "hybride" => Ok(FuelType::Hybrid),
            "electric" | "electrique" | "électrique" => Ok(FuelType::Electric),
            other => Err(format!("unknown fuel type: {}", other)),
        }
    }
}

/// Vehicle body kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleKind {
    #[default]
    Car,
    Motorcycle,
}

impl std::fmt::Display for VehicleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VehicleKind::Car => write!(f, "car"),
            VehicleKind::Motorcycle => write!(f, "motorcycle"),
        }
    }
}

impl std::str::FromStr for VehicleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "car" | "voiture" => Ok(VehicleKind::Car),
            "motorcycle" | "moto" => Ok(VehicleKind::Motorcycle),
            other => Err(format!("unknown vehicle kind: {}", other)),
        }
    }
}

/// A registered vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Unique ID (UUID)
    pub id: String,
    /// Display name (e.g., "Peugeot 308")
    pub name: String,
    /// License plate (e.g., "AB-123-CD")
    pub plate: String,
    #[serde(default)]
    pub kind: VehicleKind,
    /// Date of first registration, fixed once onboarded
    pub first_registration_date: NaiveDate,
    pub fuel_type: FuelType,
    /// Odometer reading at onboarding
    #[serde(default)]
    pub initial_odometer: u32,
    /// Technical sheet, filled manually or from invoices
    #[serde(default)]
    pub specs: TechnicalSpecs,
}

impl Vehicle {
    /// Create a new vehicle with a fresh ID
    pub fn new(
        name: impl Into<String>,
        plate: impl Into<String>,
        first_registration_date: NaiveDate,
        fuel_type: FuelType,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            plate: plate.into(),
            kind: VehicleKind::default(),
            first_registration_date,
            fuel_type,
            initial_odometer: 0,
            specs: TechnicalSpecs::default(),
        }
    }

    pub fn with_kind(mut self, kind: VehicleKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_initial_odometer(mut self, km: u32) -> Self {
        self.initial_odometer = km;
        self
    }

    /// Age in years (365.25-day years) at the given reference date
    pub fn age_years(&self, today: NaiveDate) -> f64 {
        (today - self.first_registration_date).num_days() as f64 / 365.25
    }
}
