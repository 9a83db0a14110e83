use crate::config::Credentials;
use crate::error::{ReportError, SiteError};
use crate::month::ReportMonth;
use crate::token::{CSRF_FIELD, extract_csrf_token};
use log::{debug, error, info, warn};
use reqwest::header::REFERER;
use reqwest::{Client as HttpClient, ClientBuilder, Response, StatusCode};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://bok.idpro.org";

const LOGIN_PATH: &str = "/login/";
const GEO_REPORT_PATH: &str = "/plugins/reporting/geo/";
const DATE_FMT: &str = "%Y-%m-%d";

/// Body markers of a rejected login, paired with the message to report.
const LOGIN_ERRORS: &[(&str, &str)] = &[(
    "Forbidden <span>(403)</span>",
    "CSRF verification failed. Request aborted.",
)];

/// Unauthenticated handle on a Janeway site.
#[derive(Debug, Clone)]
pub struct Client {
    http: HttpClient,
    base_url: String,
}

/// Client whose cookie store carries a logged-in Django session.
#[derive(Debug)]
pub struct Session {
    client: Client,
}

impl Client {
    /// Create a new client with the default base URL and no request timeout.
    pub fn new() -> Result<Self, ReportError> {
        Self::build(HttpClient::builder())
    }

    /// Like [`Client::new`], but every request is cut off after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, ReportError> {
        Self::build(HttpClient::builder().timeout(timeout))
    }

    fn build(builder: ClientBuilder) -> Result<Self, ReportError> {
        let http = builder.cookie_store(true).build()?;

        info!("Initialized report client with default base URL");
        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Override the base URL (useful for tests or staging sites).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        info!("Updated site base URL to {}", self.base_url);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Log in through the site's login form.
    ///
    /// The login page is fetched first so that the session cookie and the
    /// anti-forgery token are in place before the credentials are posted.
    pub async fn login(self, credentials: &Credentials) -> Result<Session, ReportError> {
        let login_url = self.url(LOGIN_PATH);
        debug!("GET request to {}", login_url);
        let page = self.http.get(&login_url).send().await?;
        debug!("Received status {}", page.status());
        self.handle_status(page.status())?;
        let token = extract_csrf_token(&page.text().await?);
        if token.is_none() {
            warn!("Login page carries no {}; posting without it", CSRF_FIELD);
        }

        let form = credentials.login_form(token.as_deref().unwrap_or_default());
        debug!(
            "POST request to {} with fields {:?}",
            login_url,
            form.iter().map(|(key, _)| key.as_str()).collect::<Vec<_>>()
        );
        let response = self
            .http
            .post(&login_url)
            .header(REFERER, login_url.as_str())
            .form(&form)
            .send()
            .await?;
        let status = response.status();
        debug!("Received status {}", status);
        let body = response.text().await?;
        if let Some(message) = login_error(&body) {
            error!("{}", message);
            return Err(ReportError::LoginRejected(message));
        }
        self.handle_status(status)?;

        info!("Login successful");
        Ok(Session { client: self })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn handle_status(&self, status: StatusCode) -> Result<(), ReportError> {
        if status.is_success() {
            return Ok(());
        }
        let site_error = match status {
            StatusCode::FORBIDDEN => SiteError::Forbidden,
            StatusCode::NOT_FOUND => SiteError::NotFound,
            s if s.is_server_error() => SiteError::Server(s),
            _ => SiteError::UnexpectedStatus(status),
        };
        Err(ReportError::Site(site_error))
    }
}

impl Session {
    /// Fetch the geo usage CSV export covering one calendar month.
    pub async fn fetch_month(&self, month: ReportMonth) -> Result<String, ReportError> {
        let client = &self.client;
        let params = [
            ("start_date", month.first_day().format(DATE_FMT).to_string()),
            ("end_date", month.last_day().format(DATE_FMT).to_string()),
        ];
        let report_url = client.url(GEO_REPORT_PATH);
        debug!("GET request to {} for {}", report_url, month);
        let page = client.http.get(&report_url).query(&params).send().await?;
        debug!("Received status {}", page.status());
        client.handle_status(page.status())?;

        // The export form posts back to the page itself, query string included.
        let page_url = page.url().clone();
        let mut form = Vec::new();
        if let Some(token) = extract_csrf_token(&page.text().await?) {
            form.push((CSRF_FIELD, token));
        }

        debug!("POST request to {}", page_url);
        let response = client
            .http
            .post(page_url.clone())
            .header(REFERER, page_url.as_str())
            .form(&form)
            .send()
            .await?;
        debug!("Received status {}", response.status());
        // An error page is never saved as a month's report.
        client.handle_status(response.status())?;

        let data = decode_utf8(response, month).await?;
        info!("Read CSV data for {}", month);
        Ok(data)
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }
}

async fn decode_utf8(response: Response, month: ReportMonth) -> Result<String, ReportError> {
    let bytes = response.bytes().await?;
    String::from_utf8(bytes.to_vec()).map_err(|_| ReportError::InvalidEncoding { month })
}

fn login_error(body: &str) -> Option<&'static str> {
    LOGIN_ERRORS
        .iter()
        .find(|(marker, _)| body.contains(marker))
        .map(|(_, message)| *message)
}
