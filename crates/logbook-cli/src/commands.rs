//! Command handlers

use std::path::PathBuf;

use chrono::{Local, NaiveDate, Utc};
use tracing::{debug, warn};

use logbook_app::app::{overconsumption_notice, LogbookService};
use logbook_app::config::Config;
use logbook_app::repository::{open_record_repo, open_vehicle_repo};
use logbook_domain::model::{RecordCategory, ServiceRecord, TechnicalSpecs, Vehicle};
use logbook_domain::repository::normalize_plate;
use logbook_domain::service::summarize_fuel_economy;
use logbook_infra::persistence::{FileServiceRecordRepository, FileVehicleRepository};
use logbook_types::{Error, OutputFormat, Result};

use crate::cli::{Cli, Commands, RecordAction, TransferAction, VehicleAction};
use crate::output::{
    output_consumption, output_dashboard, output_inspection, output_records,
    output_removal, output_transfer_import, output_vehicle, output_vehicles,
};

type Logbook = LogbookService<FileVehicleRepository, FileServiceRecordRepository>;

/// Execute CLI command
pub fn execute(cli: Cli) -> Result<()> {
    // Load config
    let mut config = Config::load()?;

    // Override from CLI args
    if let Some(ref dir) = cli.store_dir {
        config.store_dir = Some(dir.clone());
    }
    let output_format = cli.format.unwrap_or(config.output_format);
    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());

    match cli.command {
        Commands::Vehicle { action } => {
            let logbook = open_logbook(&config)?;
            cmd_vehicle(&logbook, action, output_format)
        }

        Commands::Record { action } => {
            let logbook = open_logbook(&config)?;
            cmd_record(&logbook, action, today, output_format)
        }

        Commands::Diagnose { vehicle } => {
            let logbook = open_logbook(&config)?;
            let dashboard = logbook.dashboard(&vehicle, today)?;
            output_dashboard(output_format, &dashboard)
        }

        Commands::Inspection { vehicle } => {
            let logbook = open_logbook(&config)?;
            cmd_inspection(&logbook, &vehicle, today, output_format)
        }

        Commands::Consumption { vehicle } => {
            let logbook = open_logbook(&config)?;
            cmd_consumption(&logbook, &vehicle, config.overconsumption_threshold, output_format)
        }

        Commands::Transfer { action } => {
            let logbook = open_logbook(&config)?;
            cmd_transfer(&logbook, action, output_format)
        }

        Commands::Export { vehicle, output } => {
            let logbook = open_logbook(&config)?;
            cmd_export(&logbook, &vehicle, output, today)
        }

        Commands::Config {
            show,
            set_store_dir,
            set_output,
            set_locale,
            set_keywords_file,
            set_threshold,
            set_history_limit,
            reset,
        } => cmd_config(ConfigUpdate {
            show,
            store_dir: set_store_dir,
            output_format: set_output,
            keyword_locale: set_locale,
            keywords_file: set_keywords_file,
            overconsumption_threshold: set_threshold,
            history_limit: set_history_limit,
            reset,
        }),
    }
}

fn open_logbook(config: &Config) -> Result<Logbook> {
    let vehicles = open_vehicle_repo(config)?;
    let records = open_record_repo(config)?;
    debug!(
        store = %config.store_dir()?.display(),
        vehicles = vehicles.count(),
        records = records.count(),
        "store opened"
    );

    Ok(LogbookService::new(vehicles, records, config.evaluator()?)
        .with_settings(config.dashboard_settings()))
}

/// Default output path from the plate ("AB-123-CD" -> "AB123CD.xlsx")
fn default_output(vehicle: &Vehicle, extension: &str) -> PathBuf {
    PathBuf::from(format!("{}.{}", normalize_plate(&vehicle.plate), extension))
}

// ============================================================================
// Vehicles
// ============================================================================

fn cmd_vehicle(logbook: &Logbook, action: VehicleAction, output_format: OutputFormat) -> Result<()> {
    match action {
        VehicleAction::Add {
            name,
            plate,
            registered,
            fuel,
            kind,
            odometer,
        } => {
            let vehicle = Vehicle::new(name.trim(), plate.trim(), registered, fuel)
                .with_kind(kind)
                .with_initial_odometer(odometer);
            let vehicle = logbook.add_vehicle(vehicle)?;
            if output_format == OutputFormat::Table {
                println!("Registered {} ({})", vehicle.name, vehicle.plate);
            }
            output_vehicle(output_format, &vehicle)
        }

        VehicleAction::List => output_vehicles(output_format, &logbook.list_vehicles()?),

        VehicleAction::Show { vehicle } => {
            output_vehicle(output_format, &logbook.resolve_vehicle(&vehicle)?)
        }

        VehicleAction::Specs { vehicle, specs } => {
            let specs = specs.into_specs();
            if specs == TechnicalSpecs::default() {
                return Err(Error::InvalidInput(
                    "nothing to update (use --tires, --oil, --oil-capacity, --battery, --paint or --wipers)"
                        .to_string(),
                ));
            }
            let vehicle = logbook.update_specs(&vehicle, &specs)?;
            output_vehicle(output_format, &vehicle)
        }

        VehicleAction::Remove { vehicle } => {
            let (vehicle, removed) = logbook.remove_vehicle(&vehicle)?;
            output_removal(output_format, &vehicle, removed)
        }
    }
}

// ============================================================================
// Records
// ============================================================================

fn cmd_record(
    logbook: &Logbook,
    action: RecordAction,
    today: NaiveDate,
    output_format: OutputFormat,
) -> Result<()> {
    match action {
        RecordAction::Add {
            vehicle,
            category,
            title,
            date,
            odometer,
            price,
            volume,
            specs,
        } => {
            let vehicle = logbook.resolve_vehicle(&vehicle)?;
            let date = date.unwrap_or(today);
            let mut record = match category {
                RecordCategory::Fuel => {
                    let volume = volume.ok_or_else(|| {
                        Error::InvalidInput("fuel invoices need --volume".to_string())
                    })?;
                    ServiceRecord::fuel(&vehicle.id, title, date, odometer, price, volume)
                }
                RecordCategory::Maintenance => {
                    if volume.is_some() {
                        warn!("--volume ignored on a maintenance invoice");
                    }
                    ServiceRecord::maintenance(&vehicle.id, title, date, odometer, price)
                }
            };

            let specs = specs.into_specs();
            if !specs.is_empty() {
                record = record.with_detected_specs(specs);
            }

            let record = logbook.add_record(record)?;
            if output_format == OutputFormat::Table {
                println!("Added to {} ({})", vehicle.name, vehicle.plate);
            }
            output_records(output_format, std::slice::from_ref(&record))
        }

        RecordAction::List { vehicle, limit } => {
            let (_, mut records) = logbook.history(&vehicle)?;
            if let Some(limit) = limit {
                records.truncate(limit);
            }
            output_records(output_format, &records)
        }

        RecordAction::Import { vehicle, file } => {
            let imported = logbook.import_csv(&vehicle, &file)?;
            if output_format == OutputFormat::Json {
                return output_records(output_format, &imported);
            }
            println!("Imported {} records from {}", imported.len(), file.display());
            Ok(())
        }
    }
}

// ============================================================================
// Diagnostics
// ============================================================================

fn cmd_inspection(
    logbook: &Logbook,
    key: &str,
    today: NaiveDate,
    output_format: OutputFormat,
) -> Result<()> {
    let (vehicle, records) = logbook.history(key)?;
    let due = logbook
        .evaluator()
        .next_inspection_due(vehicle.first_registration_date, &records, today);
    output_inspection(output_format, &vehicle, due, today)
}

fn cmd_consumption(
    logbook: &Logbook,
    key: &str,
    threshold: f64,
    output_format: OutputFormat,
) -> Result<()> {
    let (vehicle, records) = logbook.history(key)?;
    let summary = summarize_fuel_economy(&records);
    let notice = overconsumption_notice(&vehicle, &summary, threshold);
    output_consumption(output_format, &summary, notice.as_ref())
}

// ============================================================================
// Transfer and export
// ============================================================================

fn cmd_transfer(logbook: &Logbook, action: TransferAction, output_format: OutputFormat) -> Result<()> {
    match action {
        TransferAction::Export { vehicle, output } => {
            let vehicle = logbook.resolve_vehicle(&vehicle)?;
            let output_path = output.unwrap_or_else(|| default_output(&vehicle, "json"));
            let bundle = logbook.export_transfer(&vehicle.id, &output_path, Utc::now())?;
            println!(
                "Exported {} with {} records to: {}",
                bundle.vehicle.plate,
                bundle.records.len(),
                output_path.display()
            );
            Ok(())
        }

        TransferAction::Import { file, dry_run } => {
            let import = logbook.import_transfer(&file, dry_run)?;
            output_transfer_import(output_format, &import)
        }
    }
}

fn cmd_export(logbook: &Logbook, key: &str, output: Option<PathBuf>, today: NaiveDate) -> Result<()> {
    let vehicle = logbook.resolve_vehicle(key)?;
    let output_path = output.unwrap_or_else(|| default_output(&vehicle, "xlsx"));

    logbook.export_excel(&vehicle.id, today, &output_path)?;

    println!("Exported to: {}", output_path.display());
    Ok(())
}

// ============================================================================
// Configuration
// ============================================================================

struct ConfigUpdate {
    show: bool,
    store_dir: Option<PathBuf>,
    output_format: Option<OutputFormat>,
    keyword_locale: Option<String>,
    keywords_file: Option<PathBuf>,
    overconsumption_threshold: Option<f64>,
    history_limit: Option<usize>,
    reset: bool,
}

fn cmd_config(update: ConfigUpdate) -> Result<()> {
    if update.reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut modified = false;

    if let Some(store_dir) = update.store_dir {
        config.store_dir = Some(store_dir);
        modified = true;
    }

    if let Some(output_format) = update.output_format {
        config.output_format = output_format;
        modified = true;
    }

    if let Some(locale) = update.keyword_locale {
        config.keyword_locale = locale;
        modified = true;
    }

    if let Some(path) = update.keywords_file {
        config.keywords_file = Some(path);
        modified = true;
    }

    if let Some(threshold) = update.overconsumption_threshold {
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "threshold must be positive: {}",
                threshold
            )));
        }
        config.overconsumption_threshold = threshold;
        modified = true;
    }

    if let Some(limit) = update.history_limit {
        config.history_limit = limit;
        modified = true;
    }

    if modified {
        // Reject a locale or keywords file that cannot be loaded
        config.keyword_sets()?;
        config.save()?;
        println!("Configuration updated");
    }

    if update.show || !modified {
        println!("{}", config);
    }

    Ok(())
}
