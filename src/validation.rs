//! Input checks shared by the registries.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

use crate::decimal::Money;
use crate::errors::{Result, SchoolError};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

static EMAIL_PATTERN: LazyLock<std::result::Result<Regex, regex::Error>> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9_+&*-]+(?:\.[a-zA-Z0-9_+&*-]+)*@(?:[a-zA-Z0-9-]+\.)+[a-zA-Z]{2,7}$")
});

// 7 or 8 digits, dots only as thousands separators
static DNI_PATTERN: LazyLock<std::result::Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^(?:\d{1,2}\.\d{3}\.\d{3}|\d{7,8})$"));

fn pattern(re: &'static LazyLock<std::result::Result<Regex, regex::Error>>) -> Result<&'static Regex> {
    re.as_ref().map_err(|e| SchoolError::InvalidConfiguration {
        message: e.to_string(),
    })
}

/// trimmed, non-empty text
pub fn require_text(field: &'static str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SchoolError::validation(field, "is required"));
    }
    Ok(trimmed.to_string())
}

/// at least `min` characters
pub fn require_min_length(field: &'static str, value: &str, min: usize) -> Result<()> {
    if value.chars().count() < min {
        return Err(SchoolError::validation(
            field,
            format!("must be at least {} characters", min),
        ));
    }
    Ok(())
}

pub fn parse_integer(field: &'static str, value: &str) -> Result<i64> {
    let text = require_text(field, value)?;
    text.parse::<i64>()
        .map_err(|_| SchoolError::validation(field, format!("'{}' is not a whole number", text)))
}

pub fn parse_amount(field: &'static str, value: &str) -> Result<Money> {
    let text = require_text(field, value)?;
    let amount = Money::from_str_exact(&text)
        .map_err(|_| SchoolError::validation(field, format!("'{}' is not an amount", text)))?;
    if amount.is_negative() {
        return Err(SchoolError::validation(field, "cannot be negative"));
    }
    Ok(amount)
}

/// `YYYY-MM-DD`
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate> {
    let text = require_text(field, value)?;
    NaiveDate::parse_from_str(&text, DATE_FORMAT)
        .map_err(|_| SchoolError::validation(field, format!("'{}' is not a YYYY-MM-DD date", text)))
}

/// blank input means no date
pub fn parse_optional_date(field: &'static str, value: &str) -> Result<Option<NaiveDate>> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    parse_date(field, value).map(Some)
}

pub fn validate_email(email: &str) -> Result<()> {
    if !pattern(&EMAIL_PATTERN)?.is_match(email.trim()) {
        return Err(SchoolError::validation("email", format!("'{}' is not a valid address", email)));
    }
    Ok(())
}

/// DNI with separators and spaces removed
pub fn normalize_dni(dni: &str) -> String {
    dni.chars().filter(|c| !matches!(c, '.' | ' ')).collect()
}

/// checks the DNI format and returns it normalized
pub fn validate_dni(dni: &str) -> Result<String> {
    let trimmed = dni.trim();
    if !pattern(&DNI_PATTERN)?.is_match(trimmed) {
        return Err(SchoolError::validation("dni", format!("'{}' must have 7 or 8 digits", dni)));
    }
    Ok(normalize_dni(trimmed))
}

pub fn require_positive_id(field: &'static str, id: i64) -> Result<()> {
    if id <= 0 {
        return Err(SchoolError::validation(field, "must be a positive id"));
    }
    Ok(())
}

pub fn ensure_not_future(field: &'static str, date: NaiveDate, today: NaiveDate) -> Result<()> {
    if date > today {
        return Err(SchoolError::FutureDate { field, date });
    }
    Ok(())
}
