//! Date arithmetic and certificate status rules
//!
//! Every function takes `today` explicitly so callers (and tests) control the
//! clock. Dates are calendar dates; time of day never takes part.

use std::collections::BTreeMap;

use chrono::{Datelike, Months, NaiveDate, Utc};

use crate::models::CertificateStatus;

/// Spanish month names, January first
pub const MONTH_NAMES_ES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Current UTC calendar date
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Expiry date for a certificate issued on `issue` and valid for `validity_years`.
///
/// Uses calendar month arithmetic, so 29 February lands on 28 February when the
/// target year is not a leap year.
pub fn expiry_date(issue: NaiveDate, validity_years: u32) -> NaiveDate {
    issue
        .checked_add_months(Months::new(validity_years.saturating_mul(12)))
        .unwrap_or(NaiveDate::MAX)
}

/// Whole days from `today` until `target`; negative once `target` has passed
pub fn days_remaining(target: NaiveDate, today: NaiveDate) -> i64 {
    target.signed_duration_since(today).num_days()
}

/// Largest configured alert threshold, 0 when none are configured
pub fn max_alert_days(alert_days: &[u32]) -> i64 {
    alert_days.iter().max().copied().map(i64::from).unwrap_or(0)
}

/// True when `target` is still ahead but within the largest alert threshold
pub fn is_near_expiry(target: NaiveDate, alert_days: &[u32], today: NaiveDate) -> bool {
    let days = days_remaining(target, today);
    days > 0 && days <= max_alert_days(alert_days)
}

/// Derive a certificate status from its expiry date.
///
/// A certificate does not cover its own expiry day: zero days remaining is
/// already `Expired`.
pub fn classify_status(expiry: NaiveDate, alert_days: &[u32], today: NaiveDate) -> CertificateStatus {
    let days = days_remaining(expiry, today);
    if days <= 0 {
        CertificateStatus::Expired
    } else if days <= max_alert_days(alert_days) {
        CertificateStatus::NearExpiry
    } else {
        CertificateStatus::Current
    }
}

/// Spanish month name for `date`
pub fn month_label(date: NaiveDate) -> &'static str {
    MONTH_NAMES_ES[date.month0() as usize]
}

/// Format as `DD/MM/YYYY`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Count dates per `(year, month)`
pub fn group_by_month<I>(dates: I) -> BTreeMap<(i32, u32), usize>
where
    I: IntoIterator<Item = NaiveDate>,
{
    let mut counts = BTreeMap::new();
    for date in dates {
        *counts.entry((date.year(), date.month())).or_insert(0) += 1;
    }
    counts
}

/// First day of each of the last `count` months, oldest first, ending with the
/// month containing `today`
pub fn last_months(today: NaiveDate, count: u32) -> Vec<NaiveDate> {
    let first_of_month = today.with_day(1).unwrap_or(today);
    (0..count)
        .rev()
        .filter_map(|offset| first_of_month.checked_sub_months(Months::new(offset)))
        .collect()
}

/// True when `date` falls in the same calendar month as `today`
pub fn is_same_month(date: NaiveDate, today: NaiveDate) -> bool {
    date.year() == today.year() && date.month() == today.month()
}
