//! Output formatting module

use chrono::NaiveDate;
use serde::Serialize;

use logbook_app::app::{Dashboard, OverconsumptionNotice, TransferImport};
use logbook_domain::model::verdict::DATE_FORMAT;
use logbook_domain::model::{FuelEconomySummary, ServiceRecord, Severity, Vehicle};
use logbook_types::{OutputFormat, Result};

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    println!("{}", content);
    Ok(())
}

fn status_marker(severity: Severity) -> &'static str {
    match severity {
        Severity::Ok => "[ OK ]",
        Severity::Warning => "[WARN]",
        Severity::Critical => "[CRIT]",
    }
}

fn print_record_table(records: &[ServiceRecord]) {
    if records.is_empty() {
        println!("  (no records)");
        return;
    }
    println!(
        "  {:<10}  {:<11}  {:<32}  {:>9}  {:>9}  {:>7}",
        "Date", "Category", "Title", "Km", "Price", "Litres"
    );
    for record in records {
        let volume = record
            .fuel_volume
            .map(|v| format!("{:.1}", v))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<10}  {:<11}  {:<32}  {:>9}  {:>9.2}  {:>7}",
            record.date.format(DATE_FORMAT).to_string(),
            record.category.to_string(),
            truncate(&record.title, 32),
            record.odometer_reading,
            record.price_amount,
            volume
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max - 1).collect();
        format!("{}…", cut)
    }
}

fn print_specs(vehicle: &Vehicle) {
    if vehicle.specs.is_empty() {
        return;
    }
    println!("\nTechnical sheet");
    println!("---------------");
    for (label, value) in vehicle.specs.fields() {
        if let Some(value) = value {
            println!("{:<16} {}", format!("{}:", label), value);
        }
    }
}

pub fn output_vehicles(output_format: OutputFormat, vehicles: &[Vehicle]) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(vehicles);
    }

    if vehicles.is_empty() {
        println!("No registered vehicles");
        return Ok(());
    }

    println!("{:<20}  {:<12}  {:<10}  {:<10}  ID", "Name", "Plate", "Fuel", "Registered");
    for v in vehicles {
        println!(
            "{:<20}  {:<12}  {:<10}  {:<10}  {}",
            truncate(&v.name, 20),
            v.plate,
            v.fuel_type.label(),
            v.first_registration_date.format(DATE_FORMAT).to_string(),
            v.id
        );
    }
    Ok(())
}

pub fn output_vehicle(output_format: OutputFormat, vehicle: &Vehicle) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(vehicle);
    }

    println!("\n{} ({})", vehicle.name, vehicle.plate);
    println!("==================");
    println!("ID:               {}", vehicle.id);
    println!("Kind:             {}", vehicle.kind);
    println!("Fuel:             {}", vehicle.fuel_type);
    println!(
        "Registered:       {}",
        vehicle.first_registration_date.format(DATE_FORMAT)
    );
    println!("Initial odometer: {} km", vehicle.initial_odometer);
    print_specs(vehicle);
    Ok(())
}

#[derive(Serialize)]
struct RemovalOutput<'a> {
    removed: &'a Vehicle,
    record_count: usize,
}

pub fn output_removal(output_format: OutputFormat, vehicle: &Vehicle, record_count: usize) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(&RemovalOutput {
            removed: vehicle,
            record_count,
        });
    }

    println!(
        "Removed {} ({}) and {} records",
        vehicle.name, vehicle.plate, record_count
    );
    Ok(())
}

pub fn output_records(output_format: OutputFormat, records: &[ServiceRecord]) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(records);
    }
    print_record_table(records);
    Ok(())
}

pub fn output_dashboard(output_format: OutputFormat, dashboard: &Dashboard) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(dashboard);
    }

    let vehicle = &dashboard.vehicle;
    let verdict = &dashboard.verdict;

    println!("\n{} ({})", vehicle.name, vehicle.plate);
    println!("==================");
    println!("{} {}", status_marker(verdict.severity), verdict.message);
    println!("Next deadline:    {}", verdict.next_deadline);
    println!(
        "Next inspection:  {}",
        dashboard.next_inspection.format(DATE_FORMAT)
    );
    println!("Mileage:          {} km", dashboard.last_known_mileage);
    match dashboard.fuel.average_consumption_per_hundred_km {
        Some(avg) => println!("Consumption:      {:.1} L/100km", avg),
        None => println!("Consumption:      -"),
    }
    if let Some(ref notice) = dashboard.overconsumption {
        println!("{} {}", status_marker(Severity::Warning), notice.message);
    }

    println!("\nRecent invoices");
    println!("---------------");
    print_record_table(&dashboard.recent_records);

    Ok(())
}

#[derive(Serialize)]
struct InspectionOutput<'a> {
    vehicle: &'a str,
    plate: &'a str,
    next_inspection: NaiveDate,
    days_left: i64,
}

pub fn output_inspection(
    output_format: OutputFormat,
    vehicle: &Vehicle,
    due: NaiveDate,
    today: NaiveDate,
) -> Result<()> {
    let days_left = (due - today).num_days();
    if output_format == OutputFormat::Json {
        return print_json(&InspectionOutput {
            vehicle: &vehicle.name,
            plate: &vehicle.plate,
            next_inspection: due,
            days_left,
        });
    }

    println!("Next technical inspection: {}", due.format(DATE_FORMAT));
    if days_left < 0 {
        println!("Overdue by {} days", -days_left);
    } else {
        println!("{} days left", days_left);
    }
    Ok(())
}

#[derive(Serialize)]
struct ConsumptionOutput<'a> {
    #[serde(flatten)]
    summary: &'a FuelEconomySummary,
    overconsumption: Option<&'a OverconsumptionNotice>,
}

pub fn output_consumption(
    output_format: OutputFormat,
    summary: &FuelEconomySummary,
    notice: Option<&OverconsumptionNotice>,
) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(&ConsumptionOutput {
            summary,
            overconsumption: notice,
        });
    }

    println!("Fuel fills:       {}", summary.fill_count);
    match summary.average_consumption_per_hundred_km {
        Some(avg) => {
            println!("Average:          {:.1} L/100km", avg);
            if let (Some(km), Some(litres)) = (summary.tracked_distance, summary.tracked_volume) {
                println!("Measured over:    {} km, {:.1} L", km, litres);
            }
        }
        None => println!("Average:          not enough fuel invoices"),
    }
    if let Some(notice) = notice {
        println!("{} {}", status_marker(Severity::Warning), notice.message);
    }
    Ok(())
}

pub fn output_transfer_import(output_format: OutputFormat, import: &TransferImport) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(import);
    }

    let verb = if import.dry_run { "Would import" } else { "Imported" };
    println!(
        "{} {} ({}) with {} records",
        verb, import.vehicle.name, import.vehicle.plate, import.record_count
    );
    Ok(())
}
