//! Downloader for the monthly geo usage CSV exports of a Janeway site.
//! Logs in through the Django login form once and fetches one report per
//! calendar month over the same cookie session.

pub mod client;
pub mod config;
pub mod error;
pub mod harvest;
pub mod month;
pub mod output;
pub mod token;

pub use client::{Client, Session};
pub use config::Credentials;
pub use error::{ReportError, SiteError};
pub use harvest::{HarvestOptions, fetch_months, run};
pub use month::{Months, ReportMonth};
pub use output::{report_file_name, write_report};
pub use token::extract_csrf_token;
