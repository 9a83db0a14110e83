//! Scraping of the Django `csrfmiddlewaretoken` hidden field.

use log::debug;
use scraper::{Html, Selector};

pub const CSRF_FIELD: &str = "csrfmiddlewaretoken";

const CSRF_SELECTOR: &str = r#"input[name="csrfmiddlewaretoken"]"#;

/// Extract the anti-forgery token from an HTML page.
///
/// Django places the same token on every form of a page, so the last
/// non-empty value is returned. Pages without forms yield `None`.
pub fn extract_csrf_token(html: &str) -> Option<String> {
    let selector = Selector::parse(CSRF_SELECTOR).ok()?;
    let document = Html::parse_document(html);
    let token = document
        .select(&selector)
        .filter_map(|input| input.value().attr("value"))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .last()
        .map(str::to_string);
    debug!(
        "{} {}",
        CSRF_FIELD,
        if token.is_some() { "found" } else { "not found" }
    );
    token
}
