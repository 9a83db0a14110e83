use crate::error::ReportError;
use crate::month::ReportMonth;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

const FILE_PREFIX: &str = "bok_geo_use_";

/// `bok_geo_use_YYYYMM.csv`
pub fn report_file_name(month: ReportMonth) -> String {
    format!("{}{}{:02}.csv", FILE_PREFIX, month.year(), month.month())
}

/// Write one month's payload into `dir`, replacing any earlier download.
pub fn write_report(dir: &Path, month: ReportMonth, data: &str) -> Result<PathBuf, ReportError> {
    let path = dir.join(report_file_name(month));
    let write_err = |source| ReportError::Write {
        path: path.clone(),
        source,
    };
    fs::create_dir_all(dir).map_err(write_err)?;
    fs::write(&path, data).map_err(write_err)?;
    info!("Wrote: {}", path.display());
    Ok(path)
}
