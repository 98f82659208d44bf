//! Infrastructure layer for vehicle-logbook
//!
//! File-backed repositories, the CSV record loader, the vehicle transfer
//! bundle and the Excel exporter.

pub mod excel;
pub mod persistence;
pub mod record_csv;
pub mod transfer;
