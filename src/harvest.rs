//! Sequential download of a range of monthly reports over one session.

use crate::client::{Client, DEFAULT_BASE_URL, Session};
use crate::config::Credentials;
use crate::error::ReportError;
use crate::month::ReportMonth;
use crate::output::write_report;
use log::info;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "private/config.yaml";
pub const DEFAULT_OUT_DIR: &str = "data";
pub const DEFAULT_FIRST_MONTH: ReportMonth = ReportMonth::new_unchecked(2020, 4);
pub const DEFAULT_LAST_MONTH: ReportMonth = ReportMonth::new_unchecked(2022, 7);

#[derive(Debug, Clone)]
pub struct HarvestOptions {
    pub config_path: PathBuf,
    pub base_url: String,
    pub out_dir: PathBuf,
    pub from: ReportMonth,
    pub to: ReportMonth,
    /// Per-request timeout; `None` waits as long as the site takes.
    pub timeout: Option<Duration>,
}

impl Default for HarvestOptions {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            base_url: DEFAULT_BASE_URL.to_string(),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            from: DEFAULT_FIRST_MONTH,
            to: DEFAULT_LAST_MONTH,
            timeout: None,
        }
    }
}

/// Log in once and download every month of the configured range.
///
/// Nothing is written unless the login succeeds; the first failing month
/// aborts the run.
pub async fn run(options: &HarvestOptions) -> Result<Vec<PathBuf>, ReportError> {
    let months = ReportMonth::range(options.from, options.to)?;
    let credentials = Credentials::from_path(&options.config_path)?;
    let client = match options.timeout {
        Some(timeout) => Client::with_timeout(timeout)?,
        None => Client::new()?,
    };
    let session = client
        .with_base_url(options.base_url.as_str())
        .login(&credentials)
        .await?;
    fetch_months(&session, months, &options.out_dir).await
}

pub async fn fetch_months(
    session: &Session,
    months: impl IntoIterator<Item = ReportMonth>,
    out_dir: &Path,
) -> Result<Vec<PathBuf>, ReportError> {
    let mut written = Vec::new();
    for month in months {
        let data = session.fetch_month(month).await?;
        written.push(write_report(out_dir, month, &data)?);
    }
    info!(
        "Saved {} monthly reports from {} into {}",
        written.len(),
        session.base_url(),
        out_dir.display()
    );
    Ok(written)
}
