//! Local stand-in for the Janeway login form and geo reporting plugin.

#![allow(dead_code)]

use axum::Router;
use axum::extract::{Form, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use janeway_geo::ReportMonth;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const LOGIN_TOKEN: &str = "LoginTok123";
const REPORT_TOKEN: &str = "ReportTok456";
const CSRF_COOKIE: &str = "csrftoken=c00kie";
const SESSION_COOKIE: &str = "sessionid=s3ss10n";

/// Month whose report page the site answers with 404.
pub const UNPUBLISHED_START: &str = "2019-12-01";

const CSRF_FAILURE_PAGE: &str =
    "<h1>Forbidden <span>(403)</span></h1><p>CSRF verification failed. Request aborted.</p>";

#[derive(Clone, Default)]
pub struct Site {
    pub reject_login: bool,
    pub login_delay: Option<Duration>,
}

type Params = HashMap<String, String>;

fn has_cookie(headers: &HeaderMap, cookie: &str) -> bool {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.split("; ").any(|c| c == cookie))
}

fn referer(headers: &HeaderMap) -> &str {
    headers
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// CSV body the site serves for a report period.
pub fn export_csv(start: &str, end: &str) -> String {
    format!("start,end,country,hits\n{start},{end},DE,7\n")
}

async fn login_page() -> Response {
    let page = format!(
        "<form method='post'><input type='hidden' name='csrfmiddlewaretoken' value='{LOGIN_TOKEN}'>\
         <input name='user_name'><input name='user_password' type='password'></form>"
    );
    (
        [(header::SET_COOKIE, format!("{CSRF_COOKIE}; Path=/"))],
        Html(page),
    )
        .into_response()
}

async fn login_submit(
    State(site): State<Site>,
    headers: HeaderMap,
    Form(form): Form<Params>,
) -> Response {
    if let Some(delay) = site.login_delay {
        tokio::time::sleep(delay).await;
    }
    let csrf_ok = has_cookie(&headers, CSRF_COOKIE)
        && referer(&headers).ends_with("/login/")
        && form.get("csrfmiddlewaretoken").map(String::as_str) == Some(LOGIN_TOKEN);
    if site.reject_login || !csrf_ok {
        return (StatusCode::FORBIDDEN, Html(CSRF_FAILURE_PAGE)).into_response();
    }
    let creds_ok = form.get("user_name").map(String::as_str) == Some("alice")
        && form.get("user_password").map(String::as_str) == Some("s3cret")
        && form.get("captcha").map(String::as_str) == Some("");
    if !creds_ok {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    (
        [(header::SET_COOKIE, format!("{SESSION_COOKIE}; Path=/"))],
        Html("<h1>Dashboard</h1>"),
    )
        .into_response()
}

async fn report_page(headers: HeaderMap, Query(params): Query<Params>) -> Response {
    if !has_cookie(&headers, SESSION_COOKIE) || !params.contains_key("start_date") {
        return StatusCode::FORBIDDEN.into_response();
    }
    if params["start_date"] == UNPUBLISHED_START {
        return (StatusCode::NOT_FOUND, Html("<h1>Not Found</h1>")).into_response();
    }
    Html(format!(
        "<h1>Geo report</h1><form method='post'>\
         <input type='hidden' name='csrfmiddlewaretoken' value='{REPORT_TOKEN}'>\
         <button>Export CSV</button></form>"
    ))
    .into_response()
}

async fn report_export(
    headers: HeaderMap,
    Query(params): Query<Params>,
    Form(form): Form<Params>,
) -> Response {
    let allowed = has_cookie(&headers, SESSION_COOKIE)
        && referer(&headers).contains("start_date=")
        && form.get("csrfmiddlewaretoken").map(String::as_str) == Some(REPORT_TOKEN);
    if !allowed {
        return (StatusCode::FORBIDDEN, Html(CSRF_FAILURE_PAGE)).into_response();
    }
    export_csv(&params["start_date"], &params["end_date"]).into_response()
}

/// Serve `site` on an ephemeral port and return its base URL.
pub async fn spawn_site(site: Site) -> String {
    let app = Router::new()
        .route("/login/", get(login_page).post(login_submit))
        .route("/plugins/reporting/geo/", get(report_page).post(report_export))
        .with_state(site);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

pub fn write_config(dir: &Path) -> PathBuf {
    let path = dir.join("config.yaml");
    fs::write(&path, "user_name: alice\nuser_password: s3cret\nnote: not posted\n").unwrap();
    path
}

pub fn month(year: i32, month: u32) -> ReportMonth {
    ReportMonth::new(year, month).unwrap()
}
