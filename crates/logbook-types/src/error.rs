//! Error types for vehicle-logbook

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Unknown keyword locale: {0}")]
    UnknownLocale(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("CSV import error: {0}")]
    Csv(String),

    #[error("Excel export error: {0}")]
    Excel(String),

    #[error("Vehicle not found: {0}")]
    VehicleNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Transfer bundle error: {0}")]
    Transfer(String),

    #[error("File not found: {0}")]
    FileNotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;
