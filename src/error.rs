use crate::month::ReportMonth;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("invalid month {year}-{month}: month must be between 1 and 12")]
    InvalidMonth { year: i32, month: u32 },

    #[error("invalid month value {0:?}: expected YYYY-MM")]
    InvalidMonthFormat(String),

    #[error("invalid month range: start {start} must be before or equal to end {end}")]
    InvalidMonthRange {
        start: ReportMonth,
        end: ReportMonth,
    },

    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),

    #[error("invalid config value for {key}: expected a scalar")]
    InvalidConfigValue { key: String },

    #[error("config has no user_* credentials")]
    MissingCredentials,

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("login rejected: {0}")]
    LoginRejected(&'static str),

    #[error("report for {month} is not valid UTF-8")]
    InvalidEncoding { month: ReportMonth },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("site rejected request: {0}")]
    Site(#[from] SiteError),
}

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("forbidden (403)")]
    Forbidden,

    #[error("not found (404)")]
    NotFound,

    #[error("server error ({0})")]
    Server(reqwest::StatusCode),

    #[error("unexpected status {0}")]
    UnexpectedStatus(reqwest::StatusCode),
}
