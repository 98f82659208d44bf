//! Domain model types

pub mod service_record;
pub mod technical_specs;
pub mod vehicle;
pub mod verdict;

pub use service_record::{RecordCategory, ServiceRecord};
pub use technical_specs::TechnicalSpecs;
pub use vehicle::{FuelType, Vehicle, VehicleKind};
pub use verdict::{Deadline, DiagnosticVerdict, FuelEconomySummary, Severity};
