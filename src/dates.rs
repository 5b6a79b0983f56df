use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

static LONG_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4})년\s*(\d{1,2})월\s*(\d{1,2})일").expect("valid regex"));

/// Parses the collaborator's localized long-date format, e.g. "2024년 12월 10일".
///
/// Returns `None` for anything that does not match the format or names an
/// impossible calendar date. Time-of-day is never part of the input; the
/// result is a plain calendar date.
pub fn parse_long_date(raw: &str) -> Option<NaiveDate> {
    let captures = match LONG_DATE.captures(raw) {
        Some(captures) => captures,
        None => {
            warn!(raw, "upload date does not match the expected format");
            return None;
        }
    };

    // The regex bounds each field, so these parses cannot fail; the range
    // check happens in from_ymd_opt.
    let year: i32 = captures[1].parse().ok()?;
    let month: u32 = captures[2].parse().ok()?;
    let day: u32 = captures[3].parse().ok()?;

    let date = NaiveDate::from_ymd_opt(year, month, day);
    if date.is_none() {
        warn!(raw, "upload date names an impossible calendar date");
    }
    date
}

/// Whole days elapsed between publication and the analysis date, clamped at
/// zero so future-dated samples count as published today.
pub fn elapsed_days(as_of: NaiveDate, published: NaiveDate) -> i64 {
    (as_of - published).num_days().max(0)
}
