//! Repository adapters for persistence layer

use std::path::Path;

use logbook_infra::persistence::{FileServiceRecordRepository, FileVehicleRepository};
use logbook_types::Result;

use crate::config::Config;

/// Open file-based vehicle repository
pub fn open_vehicle_repo(config: &Config) -> Result<FileVehicleRepository> {
    let store_dir = config.store_dir()?;
    FileVehicleRepository::open(&store_dir)
}

/// Open file-based service record repository
pub fn open_record_repo(config: &Config) -> Result<FileServiceRecordRepository> {
    let store_dir = config.store_dir()?;
    FileServiceRecordRepository::open(&store_dir)
}

/// Open both repositories at a custom directory
pub fn open_repos_at(
    store_dir: &Path,
) -> Result<(FileVehicleRepository, FileServiceRecordRepository)> {
    Ok((
        FileVehicleRepository::open(store_dir)?,
        FileServiceRecordRepository::open(store_dir)?,
    ))
}
