//! Point ingestion from either transport encoding.
//!
//! A request with an empty body carries its point in the query string and is
//! parsed leniently: anything that does not read as a number counts as `0`.
//! A request with a body must carry a complete JSON point; a decode failure is
//! reported to the caller and nothing is stored.

use std::collections::HashMap;

use crate::db::PointRepository;
use crate::models::Point;

/// Acknowledgement body for a stored point.
pub const ADDED: &str = "ADDED\n";

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The request body is not a valid point document.
    #[error("{0}")]
    MalformedBody(#[from] serde_json::Error),
}

/// Which encoding the point arrived in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Query,
    Body,
}

/// Parse the leading decimal number of `raw`, the way `strtod` would.
///
/// Surrounding whitespace is ignored. Trailing garbage is dropped, and input
/// with no numeric prefix, or one that is not finite, yields `0.0`.
pub fn lenient_f64(raw: &str) -> f64 {
    let trimmed = raw.trim();
    let prefix = numeric_prefix(trimmed, true);
    match prefix.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Parse the leading integer of `raw`, the way `strtol` would. Defaults to `0`.
///
/// Out-of-range values saturate at `i64::MIN` / `i64::MAX`, so a nonzero
/// prefix never reads as zero.
pub fn lenient_i64(raw: &str) -> i64 {
    let prefix = numeric_prefix(raw.trim(), false);
    match prefix.parse::<i64>() {
        Ok(value) => value,
        Err(_) if prefix.bytes().any(|b| (b'1'..=b'9').contains(&b)) => {
            if prefix.starts_with('-') {
                i64::MIN
            } else {
                i64::MAX
            }
        }
        Err(_) => 0,
    }
}

/// Longest prefix of `s` shaped like `[+-]digits[.digits][e[+-]digits]`.
fn numeric_prefix(s: &str, allow_fraction: bool) -> &str {
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if !allow_fraction {
        return &s[..end];
    }

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return "";
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    &s[..end]
}

/// Build a point from query parameters; missing or malformed values become `0`.
pub fn point_from_query(params: &HashMap<String, String>) -> Point {
    let number = |key: &str| params.get(key).map(|v| lenient_f64(v)).unwrap_or(0.0);
    let label = params.get("label").map(|v| lenient_i64(v)).unwrap_or(0) != 0;
    Point::new(number("x"), number("y"), label)
}

/// Decode a JSON point document.
pub fn decode_point(body: &[u8]) -> Result<Point, IngestError> {
    Ok(serde_json::from_slice(body)?)
}

/// Parse one point from whichever encoding the request used.
pub fn parse_point(
    params: &HashMap<String, String>,
    body: &[u8],
) -> Result<(Point, Encoding), IngestError> {
    if body.is_empty() {
        Ok((point_from_query(params), Encoding::Query))
    } else {
        decode_point(body).map(|p| (p, Encoding::Body))
    }
}

/// Parse one point and append it to `repository`. Nothing is stored on error.
pub fn ingest(
    repository: &dyn PointRepository,
    params: &HashMap<String, String>,
    body: &[u8],
) -> Result<(Point, Encoding), IngestError> {
    let (point, encoding) = parse_point(params, body)?;
    repository.append(point);
    Ok((point, encoding))
}
