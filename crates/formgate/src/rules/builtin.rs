// File: src/rules/builtin.rs
// Purpose: Checks behind the built-in rules (no state, no allocation where avoidable)

use super::SizeKind;
use crate::value::Value;
use once_cell::sync::Lazy;
use regex::Regex;

// Email validation regex
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9-]+(\.[a-zA-Z0-9-]+)*\.[a-zA-Z]{2,}$").unwrap()
});

/// Validate email format
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, _)) = email.split_once('@') else {
        return false;
    };
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }
    EMAIL_REGEX.is_match(email)
}

/// Present means not absent, not null, not blank and not an empty collection
pub fn is_present(value: Option<&Value>) -> bool {
    match value {
        None => false,
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
        Some(v) => !v.is_blank(),
    }
}

/// A number, or a string holding one
pub fn is_numeric(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.is_finite(),
        Value::String(s) => parse_number(s).is_some(),
        _ => false,
    }
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Measure a value for `min` / `max`.
///
/// Strings count characters unless the field is declared numeric and the
/// string holds a number.
pub fn size_of(value: &Value, numeric: bool) -> (f64, SizeKind) {
    match value {
        Value::Number(n) => (*n, SizeKind::Numeric),
        Value::String(s) => match parse_number(s) {
            Some(n) if numeric => (n, SizeKind::Numeric),
            _ => (s.chars().count() as f64, SizeKind::String),
        },
        Value::Array(items) => (items.len() as f64, SizeKind::Array),
        Value::Object(map) => (map.len() as f64, SizeKind::Array),
        other => (other.to_string().chars().count() as f64, SizeKind::String),
    }
}

/// Every value (or array element) must appear in `allowed`
pub fn is_in(value: &Value, allowed: &[String]) -> bool {
    match value {
        Value::Array(items) => items.iter().all(|item| is_in(item, allowed)),
        Value::Object(_) => false,
        scalar => {
            let display = scalar.to_string();
            allowed.iter().any(|a| *a == display)
        }
    }
}

pub fn has_letter(s: &str) -> bool {
    s.chars().any(char::is_alphabetic)
}

pub fn has_mixed_case(s: &str) -> bool {
    s.chars().any(char::is_uppercase) && s.chars().any(char::is_lowercase)
}

pub fn has_number(s: &str) -> bool {
    s.chars().any(char::is_numeric)
}

pub fn has_symbol(s: &str) -> bool {
    s.chars().any(|c| !c.is_alphanumeric())
}
