//! Excel export of a vehicle's logbook

use std::path::Path;

use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use logbook_domain::model::verdict::DATE_FORMAT;
use logbook_domain::model::{DiagnosticVerdict, FuelEconomySummary, ServiceRecord, Vehicle};
use logbook_types::{Error, Result};

/// Everything written to the workbook
pub struct LogbookReport<'a> {
    pub vehicle: &'a Vehicle,
    pub verdict: &'a DiagnosticVerdict,
    pub next_inspection: NaiveDate,
    pub fuel: &'a FuelEconomySummary,
    pub records: &'a [ServiceRecord],
}

fn excel_err(e: XlsxError) -> Error {
    Error::Excel(e.to_string())
}

/// Export a logbook report to an Excel file
pub fn export_to_excel(report: &LogbookReport<'_>, output_path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();

    let summary_sheet = workbook.add_worksheet();
    write_summary_sheet(summary_sheet, report)?;

    let history_sheet = workbook.add_worksheet();
    write_history_sheet(history_sheet, report.records)?;

    workbook.save(output_path).map_err(excel_err)?;

    Ok(())
}

fn write_summary_sheet(sheet: &mut Worksheet, report: &LogbookReport<'_>) -> Result<()> {
    sheet.set_name("Summary").map_err(excel_err)?;

    let header_format = Format::new().set_bold();
    let vehicle = report.vehicle;

    sheet
        .write_string_with_format(0, 0, "Vehicle Logbook Report", &header_format)
        .map_err(excel_err)?;

    let registered = vehicle.first_registration_date.format(DATE_FORMAT).to_string();
    let next_inspection = report.next_inspection.format(DATE_FORMAT).to_string();
    let deadline = report.verdict.next_deadline.to_string();
    let rows: [(&str, &str); 8] = [
        ("Vehicle:", vehicle.name.as_str()),
        ("Plate:", vehicle.plate.as_str()),
        ("First registration:", registered.as_str()),
        ("Fuel:", vehicle.fuel_type.label()),
        ("Status:", report.verdict.severity.label()),
        ("Diagnostic:", report.verdict.message.as_str()),
        ("Next deadline:", deadline.as_str()),
        ("Next inspection:", next_inspection.as_str()),
    ];
    for (i, (label, value)) in rows.iter().enumerate() {
        let row = (i + 2) as u32;
        sheet.write_string(row, 0, *label).map_err(excel_err)?;
        sheet.write_string(row, 1, *value).map_err(excel_err)?;
    }

    let row = (rows.len() + 2) as u32;
    sheet
        .write_string(row, 0, "Average consumption (L/100km):")
        .map_err(excel_err)?;
    match report.fuel.average_consumption_per_hundred_km {
        Some(avg) => sheet.write_number(row, 1, avg).map_err(excel_err)?,
        None => sheet.write_string(row, 1, "-").map_err(excel_err)?,
    };

    let mut row = row + 2;
    let specs: Vec<_> = vehicle
        .specs
        .fields()
        .into_iter()
        .filter_map(|(label, value)| value.map(|v| (label, v)))
        .collect();
    if !specs.is_empty() {
        sheet
            .write_string_with_format(row, 0, "Technical Sheet", &header_format)
            .map_err(excel_err)?;
        for (label, value) in specs {
            row += 1;
            sheet.write_string(row, 0, label).map_err(excel_err)?;
            sheet.write_string(row, 1, value).map_err(excel_err)?;
        }
    }

    sheet.set_column_width(0, 30).map_err(excel_err)?;
    sheet.set_column_width(1, 60).map_err(excel_err)?;

    Ok(())
}

fn write_history_sheet(sheet: &mut Worksheet, records: &[ServiceRecord]) -> Result<()> {
    sheet.set_name("History").map_err(excel_err)?;

    let header_format = Format::new().set_bold();
    let headers = ["Date", "Category", "Title", "Odometer (km)", "Price", "Volume (L)"];
    for (col, header) in headers.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(excel_err)?;
    }

    let mut sorted: Vec<&ServiceRecord> = records.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    for (row_idx, record) in sorted.iter().enumerate() {
        let row = (row_idx + 1) as u32;
        sheet
            .write_string(row, 0, record.date.format(DATE_FORMAT).to_string())
            .map_err(excel_err)?;
        sheet
            .write_string(row, 1, record.category.to_string())
            .map_err(excel_err)?;
        sheet.write_string(row, 2, &record.title).map_err(excel_err)?;
        sheet
            .write_number(row, 3, f64::from(record.odometer_reading))
            .map_err(excel_err)?;
        sheet
            .write_number(row, 4, record.price_amount)
            .map_err(excel_err)?;
        if let Some(volume) = record.fuel_volume {
            sheet.write_number(row, 5, volume).map_err(excel_err)?;
        }
    }

    sheet.set_column_width(0, 12).map_err(excel_err)?;
    sheet.set_column_width(2, 40).map_err(excel_err)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use logbook_domain::model::{Deadline, FuelType, Severity};
    use tempfile::tempdir;

    #[test]
    fn test_export_creates_workbook() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logbook.xlsx");
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();

        let mut vehicle = Vehicle::new("Clio", "AB-123-CD", date, FuelType::Gasoline);
        vehicle.specs.tire_dimensions = Some("185/65 R15".to_string());
        let records = vec![
            ServiceRecord::maintenance(&vehicle.id, "Vidange", date, 10000, 95.0),
            ServiceRecord::fuel(&vehicle.id, "Plein", date, 10400, 70.0, 40.0),
        ];
        let verdict = DiagnosticVerdict::new("default", Severity::Ok, "Healthy", Deadline::Clear);
        let fuel = FuelEconomySummary::default();

        let report = LogbookReport {
            vehicle: &vehicle,
            verdict: &verdict,
            next_inspection: date,
            fuel: &fuel,
            records: &records,
        };
        export_to_excel(&report, &path).unwrap();

        let metadata = std::fs::metadata(&path).unwrap();
        assert!(metadata.len() > 0);
    }
}
