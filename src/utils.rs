//! Age validation and user-metadata normalization.

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::models::{AuthUser, CustomUser};

/// Minimum age, in whole years, for a marketplace account.
pub const MINIMUM_AGE: i32 = 18;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];
const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// Returns whether someone born on `date_of_birth` is at least 18 today.
///
/// Empty or absent input is `false`. Strings that do not parse as a date are
/// also `false`; they are not reported as errors.
pub fn validate_age(date_of_birth: Option<&str>) -> bool {
    validate_age_on(date_of_birth, Local::now().date_naive())
}

/// [`validate_age`] against an explicit reference date.
pub fn validate_age_on(date_of_birth: Option<&str>, today: NaiveDate) -> bool {
    let Some(raw) = date_of_birth.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return false;
    };
    match parse_birth_date(raw) {
        Some(birth) => age_on(birth, today) >= MINIMUM_AGE,
        None => false,
    }
}

/// Whole years between `birth` and `today`.
///
/// Compares (month, day) rather than day-of-year so leap years don't shift
/// the birthday.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

fn parse_birth_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(date_time) = DateTime::parse_from_rfc3339(raw) {
        return Some(date_time.date_naive());
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .or_else(|| {
            DATE_TIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
                .map(|date_time| date_time.date())
        })
}

/// Lifts `name` and `experience` out of `user_metadata`.
///
/// Missing or unusable values fall back to `""` and `0`. Negative or
/// non-finite experience is stored as `0`.
pub fn format_user_with_metadata(user: AuthUser) -> CustomUser {
    let name = user
        .user_metadata
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let experience = user
        .user_metadata
        .get("experience")
        .and_then(experience_from_value)
        .unwrap_or(0.0);

    CustomUser {
        user,
        name,
        experience,
    }
}

fn experience_from_value(value: &Value) -> Option<f64> {
    let hours = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    hours.is_finite().then(|| hours.max(0.0))
}
