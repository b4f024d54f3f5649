//! Resource quantity parsing
//!
//! Converts control-plane resource strings into base units:
//! - CPU: `500m` (millicores) or `2` / `1.5` (cores) into cores
//! - Memory: binary (`Ki`, `Mi`, `Gi`, `Ti`) and decimal (`K`, `M`, `G`, `T`)
//!   suffixes into bytes
//!
//! [`parse_quantity`] reports why a value could not be read.
//! [`parse_resource_value`] keeps the zero-coalescing behavior that callers
//! rendering best-effort tables rely on.

use thiserror::Error;

/// Unit suffixes and their multipliers, two-character suffixes first so that
/// `Ki` is never read as `K` followed by a stray `i`.
const UNIT_SUFFIXES: &[(&str, f64)] = &[
    ("Ki", 1024.0),
    ("Mi", 1_048_576.0),
    ("Gi", 1_073_741_824.0),
    ("Ti", 1_099_511_627_776.0),
    ("K", 1_000.0),
    ("M", 1_000_000.0),
    ("G", 1_000_000_000.0),
    ("T", 1_000_000_000_000.0),
];

const MILLI_SUFFIX: char = 'm';

const BYTES_PER_GIB: f64 = 1_073_741_824.0;

/// Reasons a resource quantity could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantityError {
    #[error("empty resource quantity")]
    Empty,
    #[error("invalid numeric part in resource quantity {0:?}")]
    InvalidNumber(String),
    #[error("unknown unit suffix in resource quantity {0:?}")]
    UnknownSuffix(String),
}

/// Parse a resource quantity into cores (CPU) or bytes (memory).
pub fn parse_quantity(raw: &str) -> Result<f64, QuantityError> {
    if raw.is_empty() {
        return Err(QuantityError::Empty);
    }

    if let Some(millis) = raw.strip_suffix(MILLI_SUFFIX) {
        return parse_number(millis, raw).map(|v| v / 1000.0);
    }

    if is_plain_decimal(raw) {
        return parse_number(raw, raw);
    }

    for (suffix, multiplier) in UNIT_SUFFIXES {
        if let Some(number) = raw.strip_suffix(suffix) {
            return parse_number(number, raw).and_then(|v| scaled(v, *multiplier, raw));
        }
    }

    Err(QuantityError::UnknownSuffix(raw.to_string()))
}

/// Parse a resource quantity, degrading anything unreadable to `0.0`.
pub fn parse_resource_value(raw: Option<&str>) -> f64 {
    raw.map(|v| parse_quantity(v).unwrap_or(0.0)).unwrap_or(0.0)
}

/// Convert bytes to GiB rounded to two decimals
pub fn to_gib(bytes: f64) -> f64 {
    (bytes / BYTES_PER_GIB * 100.0).round() / 100.0
}

/// Digits with at most one decimal point, e.g. `4` or `0.25`
fn is_plain_decimal(value: &str) -> bool {
    let mut dots = 0;
    let mut digits = 0;
    for c in value.chars() {
        match c {
            '.' => dots += 1,
            c if c.is_ascii_digit() => digits += 1,
            _ => return false,
        }
    }
    dots <= 1 && digits > 0
}

fn parse_number(number: &str, raw: &str) -> Result<f64, QuantityError> {
    match number.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => Err(QuantityError::InvalidNumber(raw.to_string())),
    }
}

/// Apply a unit multiplier, rejecting products that overflow to infinity
fn scaled(value: f64, multiplier: f64, raw: &str) -> Result<f64, QuantityError> {
    let scaled = value * multiplier;
    if scaled.is_finite() {
        Ok(scaled)
    } else {
        Err(QuantityError::InvalidNumber(raw.to_string()))
    }
}
