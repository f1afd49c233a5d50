//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Formats a decimal amount as dollars.
///
/// Usage in templates: `{{ line.price|money }}`
#[askama::filter_fn]
pub fn money(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format!("${value}"))
}

/// Percent-encodes a value for use in a URL query string.
///
/// Usage in templates: `/search?q={{ query|query_param }}`
#[askama::filter_fn]
pub fn query_param(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(url::form_urlencoded::byte_serialize(value.to_string().as_bytes()).collect())
}
