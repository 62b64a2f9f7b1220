//! Cell value coercion
//!
//! Every helper is total: a value that cannot be interpreted comes back
//! as `None` (or an empty string for text) instead of an error.

use chrono::NaiveDate;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Normalize a book identifier
///
/// Spreadsheet exports sometimes write integer-like ISBNs as floats, so a
/// trailing `.0` is removed: `"9780143127741.0"` becomes `"9780143127741"`.
pub fn normalize_identifier(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed.strip_suffix(".0").unwrap_or(trimmed).to_string()
}

/// Trim surrounding whitespace from a text cell
pub fn clean_text(raw: Option<&str>) -> String {
    raw.map(|s| s.trim().to_string()).unwrap_or_default()
}

/// Parse a calendar date
///
/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD`, and datetimes that start with a
/// `YYYY-MM-DD` date (the time part is ignored).
pub fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    let s = raw?.trim();
    if s.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date);
        }
    }

    let prefix = s.get(..10)?;
    let rest = &s[10..];
    if rest.starts_with([' ', 'T']) {
        return NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok();
    }
    None
}

/// Parse a numeric cell; NaN and infinities count as missing
pub fn parse_number(raw: Option<&str>) -> Option<f64> {
    let s = raw?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a count of pages or days; zero and negatives count as unknown
pub fn parse_positive_count(raw: Option<&str>) -> Option<u32> {
    let value = parse_number(raw)?.round();
    if value >= 1.0 && value <= u32::MAX as f64 {
        Some(value as u32)
    } else {
        None
    }
}
