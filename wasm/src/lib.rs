//! WebAssembly module for the Gas Certificate Manager
//!
//! Provides client-side computation for:
//! - Expiry date and days-remaining calculations
//! - Certificate status classification
//! - Offline form validation

use chrono::NaiveDate;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::dates::*;
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::debug_1(&JsValue::from_str("gas certificate helpers loaded"));
}

fn parse_date(value: &str) -> Result<NaiveDate, JsValue> {
    // accept full ISO timestamps as well as plain dates
    let date_part = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|e| JsValue::from_str(&format!("Invalid date '{}': {}", value, e)))
}

/// Today's date in the browser's local time zone
fn browser_today() -> NaiveDate {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(
        now.get_full_year() as i32,
        now.get_month() + 1,
        now.get_date(),
    )
    .unwrap_or_else(shared::dates::today)
}

fn today_or(today: Option<String>) -> Result<NaiveDate, JsValue> {
    match today {
        Some(value) => parse_date(&value),
        None => Ok(browser_today()),
    }
}

/// Expiry date (`YYYY-MM-DD`) for a certificate issued on `issue_date`
#[wasm_bindgen]
pub fn calculate_expiry_date(issue_date: &str, validity_years: u32) -> Result<String, JsValue> {
    let issue = parse_date(issue_date)?;
    Ok(expiry_date(issue, validity_years).to_string())
}

/// Whole days until `target`; `today` defaults to the browser's date
#[wasm_bindgen]
pub fn get_days_remaining(target: &str, today: Option<String>) -> Result<i32, JsValue> {
    let target = parse_date(target)?;
    let today = today_or(today)?;
    Ok(days_remaining(target, today) as i32)
}

/// True when `target` falls inside the largest alert threshold
#[wasm_bindgen]
pub fn is_about_to_expire(
    target: &str,
    alert_days: Vec<u32>,
    today: Option<String>,
) -> Result<bool, JsValue> {
    let target = parse_date(target)?;
    let today = today_or(today)?;
    Ok(is_near_expiry(target, &alert_days, today))
}

/// Status name (`current`, `near_expiry`, `expired`) for an expiry date
#[wasm_bindgen]
pub fn certificate_status(
    expiry: &str,
    alert_days: Vec<u32>,
    today: Option<String>,
) -> Result<String, JsValue> {
    let expiry = parse_date(expiry)?;
    let today = today_or(today)?;
    Ok(classify_status(expiry, &alert_days, today).as_str().to_string())
}

/// Spanish label for a status name
#[wasm_bindgen]
pub fn status_label(status: &str) -> Result<String, JsValue> {
    status
        .parse::<CertificateStatus>()
        .map(|s| s.display_name_es().to_string())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// `DD/MM/YYYY` rendering of a date
#[wasm_bindgen]
pub fn format_display_date(date: &str) -> Result<String, JsValue> {
    parse_date(date).map(format_date)
}

/// Spanish month name of a date
#[wasm_bindgen]
pub fn get_month_name(date: &str) -> Result<String, JsValue> {
    parse_date(date).map(|d| month_label(d).to_string())
}

/// Validate a client form; returns a JSON array of field errors (empty when valid)
#[wasm_bindgen]
pub fn validate_client_form(client_json: &str) -> Result<String, JsValue> {
    let input: ClientInput = serde_json::from_str(client_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid client JSON: {}", e)))?;
    errors_json(validate_input(&input.normalized()))
}

/// Validate a certificate form; returns a JSON array of field errors
#[wasm_bindgen]
pub fn validate_certificate_form(certificate_json: &str) -> Result<String, JsValue> {
    let input: CertificateInput = serde_json::from_str(certificate_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid certificate JSON: {}", e)))?;
    errors_json(validate_input(&input))
}

fn errors_json(result: Result<(), Vec<FieldError>>) -> Result<String, JsValue> {
    let errors = result.err().unwrap_or_default();
    serde_json::to_string(&errors).map_err(|e| JsValue::from_str(&e.to_string()))
}
