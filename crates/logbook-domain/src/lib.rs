//! Domain layer for vehicle-logbook
//!
//! Holds the vehicle and service record models, the maintenance diagnostic
//! engine and the repository traits implemented by the infrastructure crate.

pub mod model;
pub mod repository;
pub mod service;

pub use model::*;
pub use repository::{ServiceRecordRepository, VehicleRepository};
