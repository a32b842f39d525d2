//! Lenient parsing helpers for amount and date fields
//!
//! Both parsers are total: any value that cannot be understood yields
//! `None`, never an error, so a bad cell degrades one field of one row
//! instead of aborting the batch.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use std::str::FromStr;

/// Date formats attempted in order; the first successful parse wins
const DATE_FORMATS: [&str; 7] = [
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%m/%d/%Y",
    "%Y/%m/%d",
    "%d-%b-%Y",
    "%d %b %Y",
];

/// Parse an invoice amount from its source string
///
/// Tolerates surrounding whitespace, thousands separators (commas, in both
/// western and Indian grouping), internal spaces, and a leading rupee
/// prefix. Anything else yields `None`.
pub fn parse_amount(value: &str) -> Option<BigDecimal> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    let stripped = trimmed
        .strip_prefix('₹')
        .or_else(|| trimmed.strip_prefix("Rs."))
        .or_else(|| trimmed.strip_prefix("Rs"))
        .unwrap_or(trimmed);

    let cleaned: String = stripped
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    BigDecimal::from_str(&cleaned).ok()
}

/// Parse an invoice date from its source string, trying common formats
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}
