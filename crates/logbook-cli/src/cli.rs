//! CLI definition using clap

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use logbook_domain::model::{FuelType, RecordCategory, TechnicalSpecs, VehicleKind};
use logbook_infra::record_csv::parse_date;
use logbook_types::OutputFormat;

fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    parse_date(s).ok_or_else(|| format!("invalid date '{}' (expected YYYY-MM-DD or DD/MM/YYYY)", s))
}

#[derive(Parser)]
#[command(name = "vehicle-logbook")]
#[command(author = "yuuji")]
#[command(version)]
#[command(about = "Vehicle maintenance logbook with service, timing belt and inspection alerts")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Store directory override. Uses config value if not specified.
    #[arg(long, global = true)]
    pub store_dir: Option<PathBuf>,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Reference date for diagnostics (default: today)
    #[arg(long, global = true, value_parser = parse_date_arg)]
    pub today: Option<NaiveDate>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage registered vehicles
    Vehicle {
        #[command(subcommand)]
        action: VehicleAction,
    },

    /// Manage maintenance and fuel invoices
    Record {
        #[command(subcommand)]
        action: RecordAction,
    },

    /// Show the dashboard of a vehicle (diagnostic, inspection, consumption)
    Diagnose {
        /// Vehicle ID or license plate
        vehicle: String,
    },

    /// Show the next technical inspection date
    Inspection {
        /// Vehicle ID or license plate
        vehicle: String,
    },

    /// Show the average fuel consumption
    Consumption {
        /// Vehicle ID or license plate
        vehicle: String,
    },

    /// Hand a vehicle and its history over to a new owner
    Transfer {
        #[command(subcommand)]
        action: TransferAction,
    },

    /// Export a vehicle's logbook to Excel
    Export {
        /// Vehicle ID or license plate
        vehicle: String,

        /// Output Excel file path
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set store directory
        #[arg(long)]
        set_store_dir: Option<PathBuf>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Set keyword locale (fr, en, all)
        #[arg(long)]
        set_locale: Option<String>,

        /// Set TOML file with extra classification keywords
        #[arg(long)]
        set_keywords_file: Option<PathBuf>,

        /// Set diesel overconsumption threshold (L/100km)
        #[arg(long)]
        set_threshold: Option<f64>,

        /// Set number of records shown on the dashboard
        #[arg(long)]
        set_history_limit: Option<usize>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },
}

#[derive(Subcommand)]
pub enum VehicleAction {
    /// Register a vehicle
    Add {
        /// Display name (e.g., "Peugeot 308")
        name: String,

        /// License plate
        #[arg(long, short = 'p')]
        plate: String,

        /// Date of first registration
        #[arg(long, value_parser = parse_date_arg)]
        registered: NaiveDate,

        /// Fuel type (diesel, gasoline, hybrid, electric)
        #[arg(long)]
        fuel: FuelType,

        /// Vehicle kind (car, motorcycle)
        #[arg(long, default_value = "car")]
        kind: VehicleKind,

        /// Odometer reading at onboarding (km)
        #[arg(long, default_value_t = 0)]
        odometer: u32,
    },

    /// List registered vehicles
    List,

    /// Show a vehicle and its technical sheet
    Show {
        /// Vehicle ID or license plate
        vehicle: String,
    },

    /// Edit the technical sheet (an empty value clears a field)
    Specs {
        /// Vehicle ID or license plate
        vehicle: String,

        #[command(flatten)]
        specs: SpecsArgs,
    },

    /// Remove a vehicle and all its records
    Remove {
        /// Vehicle ID or license plate
        vehicle: String,
    },
}

/// Technical sheet fields
#[derive(Args, Debug, Default)]
pub struct SpecsArgs {
    /// Tyre dimensions (e.g., "205/55 R16")
    #[arg(long)]
    pub tires: Option<String>,

    /// Oil viscosity (e.g., "5W30")
    #[arg(long)]
    pub oil: Option<String>,

    /// Oil capacity (e.g., "4.5L")
    #[arg(long)]
    pub oil_capacity: Option<String>,

    /// Battery reference
    #[arg(long)]
    pub battery: Option<String>,

    /// Paint code
    #[arg(long)]
    pub paint: Option<String>,

    /// Wiper reference
    #[arg(long)]
    pub wipers: Option<String>,
}

impl SpecsArgs {
    pub fn into_specs(self) -> TechnicalSpecs {
        TechnicalSpecs {
            tire_dimensions: self.tires,
            oil_viscosity: self.oil,
            oil_capacity: self.oil_capacity,
            battery_ref: self.battery,
            color_code: self.paint,
            wiper_ref: self.wipers,
        }
    }
}

#[derive(Subcommand)]
pub enum RecordAction {
    /// Add an invoice
    Add {
        /// Vehicle ID or license plate
        vehicle: String,

        /// Category (maintenance, fuel)
        #[arg(long, short = 'c')]
        category: RecordCategory,

        /// Invoice title (e.g., "Vidange + filtres")
        #[arg(long, short = 't')]
        title: String,

        /// Invoice date (default: today)
        #[arg(long, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,

        /// Odometer reading (km)
        #[arg(long)]
        odometer: u32,

        /// Amount paid
        #[arg(long)]
        price: f64,

        /// Litres filled (fuel invoices)
        #[arg(long)]
        volume: Option<f64>,

        #[command(flatten)]
        specs: SpecsArgs,
    },

    /// List invoices, newest first
    List {
        /// Vehicle ID or license plate
        vehicle: String,

        /// Maximum number of records
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },

    /// Import invoices from a CSV file
    Import {
        /// Vehicle ID or license plate
        vehicle: String,

        /// CSV file (date,category,title,odometer,price[,volume])
        file: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum TransferAction {
    /// Write the transfer file of a vehicle (seller)
    Export {
        /// Vehicle ID or license plate
        vehicle: String,

        /// Output JSON file path
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Register a vehicle from a transfer file (buyer)
    Import {
        /// Transfer JSON file
        file: PathBuf,

        /// Validate only, store nothing
        #[arg(long)]
        dry_run: bool,
    },
}
