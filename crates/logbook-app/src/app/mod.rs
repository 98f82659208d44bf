//! Application use cases

pub mod dashboard_service;
pub mod logbook_service;

pub use dashboard_service::{
    overconsumption_notice, Dashboard, DashboardService, DashboardSettings, OverconsumptionNotice,
};
pub use logbook_service::{LogbookService, TransferImport};
