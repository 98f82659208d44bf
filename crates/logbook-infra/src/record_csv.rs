//! CSV loader for service records
//!
//! Expected header (order free, extra columns ignored):
//! `date,category,title,odometer,price[,volume]`
//!
//! Spreadsheet exports are handled: a `;` delimiter switches numbers to
//! decimal commas, and files that are not valid UTF-8 are decoded as
//! Windows-1252.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use encoding_rs::WINDOWS_1252;
use thiserror::Error;
use tracing::warn;

use logbook_domain::model::{RecordCategory, ServiceRecord};

#[derive(Error, Debug)]
pub enum CsvLoaderError {
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse CSV: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Invalid date format in row {row}: {value}")]
    InvalidDate { row: usize, value: String },

    #[error("Invalid number format in row {row}, column {column}: {value}")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Invalid category in row {row}: {value}")]
    InvalidCategory { row: usize, value: String },
}

impl From<CsvLoaderError> for logbook_types::Error {
    fn from(err: CsvLoaderError) -> Self {
        logbook_types::Error::Csv(err.to_string())
    }
}

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];

/// Load the records of one vehicle from a CSV file
pub fn load_records_from_csv(
    path: &Path,
    vehicle_id: &str,
) -> Result<Vec<ServiceRecord>, CsvLoaderError> {
    let bytes = fs::read(path)?;
    let content = decode(bytes);
    parse_records(&content, vehicle_id)
}

fn decode(bytes: Vec<u8>) -> String {
    let content = match String::from_utf8(bytes) {
        Ok(content) => content,
        Err(err) => {
            let (decoded, _, had_errors) = WINDOWS_1252.decode(err.as_bytes());
            if had_errors {
                warn!("some characters could not be decoded from Windows-1252");
            }
            decoded.into_owned()
        }
    };
    content.trim_start_matches('\u{feff}').to_string()
}

/// Parse CSV text into records attached to `vehicle_id`
pub fn parse_records(content: &str, vehicle_id: &str) -> Result<Vec<ServiceRecord>, CsvLoaderError> {
    let header_line = content.lines().next().unwrap_or("");
    let semicolon = header_line.contains(';') && !header_line.contains(',');
    let delimiter = if semicolon { b';' } else { b',' };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let columns = Columns::locate(&headers)?;

    let mut records = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let row = result?;
        // +2: 0-based index and the header row
        let row_num = row_idx + 2;
        if row.iter().all(|field| field.is_empty()) {
            continue;
        }
        records.push(columns.parse_row(&row, row_num, vehicle_id, semicolon)?);
    }

    Ok(records)
}

struct Columns {
    date: usize,
    category: usize,
    title: usize,
    odometer: usize,
    price: usize,
    volume: Option<usize>,
}

impl Columns {
    fn locate(headers: &csv::StringRecord) -> Result<Self, CsvLoaderError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name))
        };
        let require = |name: &str| find(name).ok_or_else(|| CsvLoaderError::MissingColumn(name.to_string()));

        Ok(Self {
            date: require("date")?,
            category: require("category")?,
            title: require("title")?,
            odometer: require("odometer")?,
            price: require("price")?,
            volume: find("volume"),
        })
    }

    fn parse_row(
        &self,
        row: &csv::StringRecord,
        row_num: usize,
        vehicle_id: &str,
        decimal_comma: bool,
    ) -> Result<ServiceRecord, CsvLoaderError> {
        let field = |idx: usize| row.get(idx).unwrap_or("");

        let date = parse_date(field(self.date)).ok_or_else(|| CsvLoaderError::InvalidDate {
            row: row_num,
            value: field(self.date).to_string(),
        })?;

        let category: RecordCategory =
            field(self.category)
                .parse()
                .map_err(|_| CsvLoaderError::InvalidCategory {
                    row: row_num,
                    value: field(self.category).to_string(),
                })?;

        let odometer_raw = field(self.odometer).replace([' ', '\u{a0}'], "");
        let odometer_reading: u32 =
            odometer_raw
                .parse()
                .map_err(|_| CsvLoaderError::InvalidNumber {
                    row: row_num,
                    column: "odometer".to_string(),
                    value: field(self.odometer).to_string(),
                })?;

        let price_amount = parse_decimal(field(self.price), decimal_comma).ok_or_else(|| {
            CsvLoaderError::InvalidNumber {
                row: row_num,
                column: "price".to_string(),
                value: field(self.price).to_string(),
            }
        })?;

        let fuel_volume = match self.volume.map(field).filter(|v| !v.is_empty()) {
            Some(raw) => Some(parse_decimal(raw, decimal_comma).ok_or_else(|| {
                CsvLoaderError::InvalidNumber {
                    row: row_num,
                    column: "volume".to_string(),
                    value: raw.to_string(),
                }
            })?),
            None => None,
        };

        let title = field(self.title).to_string();
        let record = match category {
            RecordCategory::Fuel => {
                let volume = fuel_volume.ok_or_else(|| CsvLoaderError::InvalidNumber {
                    row: row_num,
                    column: "volume".to_string(),
                    value: String::new(),
                })?;
                ServiceRecord::fuel(vehicle_id, title, date, odometer_reading, price_amount, volume)
            }
            RecordCategory::Maintenance => {
                if fuel_volume.is_some() {
                    warn!(row = row_num, "volume ignored on a maintenance invoice");
                }
                ServiceRecord::maintenance(vehicle_id, title, date, odometer_reading, price_amount)
            }
        };
        Ok(record)
    }
}

/// Parse a date in any of the accepted formats
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

fn parse_decimal(s: &str, decimal_comma: bool) -> Option<f64> {
    let cleaned: String = s
        .trim()
        .trim_end_matches('€')
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let cleaned = if decimal_comma {
        cleaned.replace(',', ".")
    } else {
        cleaned
    };
    cleaned.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_comma_separated() {
        let csv = "date,category,title,odometer,price,volume\n\
                   2026-01-15,maintenance,Vidange + filtres,84000,189.90,\n\
                   16/02/2026,fuel,Plein gazole,84650,78.40,42.5\n";
        let records = parse_records(csv, "v1").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].category, RecordCategory::Maintenance);
        assert_eq!(records[0].title, "Vidange + filtres");
        assert!(records[0].fuel_volume.is_none());
        assert_eq!(records[1].date, NaiveDate::from_ymd_opt(2026, 2, 16).unwrap());
        assert_eq!(records[1].fuel_volume, Some(42.5));
        assert!(records.iter().all(|r| r.vehicle_id == "v1"));
    }

    #[test]
    fn test_parse_semicolon_decimal_comma() {
        let csv = "Date;Category;Title;Odometer;Price;Volume\n\
                   2026-03-01;carburant;Plein SP95;12 500;65,20 €;38,4\n";
        let records = parse_records(csv, "v1").unwrap();
        assert_eq!(records[0].category, RecordCategory::Fuel);
        assert_eq!(records[0].odometer_reading, 12500);
        assert!((records[0].price_amount - 65.2).abs() < 1e-9);
        assert_eq!(records[0].fuel_volume, Some(38.4));
    }

    #[test]
    fn test_missing_column() {
        let err = parse_records("date,title,odometer,price\n", "v1").unwrap_err();
        assert!(matches!(err, CsvLoaderError::MissingColumn(ref c) if c == "category"));
    }

    #[test]
    fn test_invalid_date_names_row() {
        let csv = "date,category,title,odometer,price\n\
                   2026-01-15,maintenance,Vidange,84000,189.90\n\
                   soon,maintenance,CT,85000,78\n";
        let err = parse_records(csv, "v1").unwrap_err();
        assert!(matches!(err, CsvLoaderError::InvalidDate { row: 3, .. }));
    }

    #[test]
    fn test_fuel_row_needs_volume() {
        let csv = "date,category,title,odometer,price,volume\n\
                   2026-01-15,maintenance,Vidange,84000,189.90,5\n\
                   2026-02-16,fuel,Plein gazole,84650,78.40,\n";
        let err = parse_records(csv, "v1").unwrap_err();
        assert!(matches!(
            err,
            CsvLoaderError::InvalidNumber { row: 3, ref column, .. } if column == "volume"
        ));

        let without_column = "date,category,title,odometer,price\n\
                              2026-02-16,fuel,Plein gazole,84650,78.40\n";
        assert!(parse_records(without_column, "v1").is_err());
    }

    #[test]
    fn test_volume_on_maintenance_row_is_ignored() {
        let csv = "date,category,title,odometer,price,volume\n\
                   2026-01-15,maintenance,Vidange,84000,189.90,5\n";
        let records = parse_records(csv, "v1").unwrap();
        assert!(records[0].fuel_volume.is_none());
    }

    #[test]
    fn test_windows_1252_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("factures.csv");
        // "Révision" with é encoded as 0xE9
        let mut bytes = b"date,category,title,odometer,price\n2026-01-15,maintenance,R".to_vec();
        bytes.push(0xE9);
        bytes.extend_from_slice(b"vision,84000,250\n");
        std::fs::write(&path, bytes).unwrap();

        let records = load_records_from_csv(&path, "v1").unwrap();
        assert_eq!(records[0].title, "Révision");
    }
}
