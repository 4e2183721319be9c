use std::sync::LazyLock;

use regex::Regex;
use time::format_description::well_known::Rfc3339;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, Month, OffsetDateTime, PrimitiveDateTime};

static MDY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2})[/-](\d{1,2})[/-](\d{4}|\d{2})\b").expect("valid M/D/Y pattern")
});

/// Two-digit years at or above this value are read as 19xx, below as 20xx.
pub const TWO_DIGIT_YEAR_PIVOT: i32 = 70;

fn parse_iso(raw: &str) -> Option<OffsetDateTime> {
    if let Ok(dt) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(dt);
    }

    // ISO-like without timezone: assume UTC.
    let primitive_formats: [&[BorrowedFormatItem<'static>]; 4] = [
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        format_description!("[year]-[month]-[day]T[hour]:[minute]"),
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
        format_description!("[year]-[month]-[day] [hour]:[minute]"),
    ];
    for fmt in primitive_formats {
        if let Ok(pdt) = PrimitiveDateTime::parse(raw, fmt) {
            return Some(pdt.assume_utc());
        }
    }

    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|d| d.midnight().assume_utc())
}

fn parse_month_day_year(raw: &str) -> Option<OffsetDateTime> {
    let caps = MDY_RE.captures(raw)?;
    let month: u8 = caps.get(1)?.as_str().parse().ok()?;
    let day: u8 = caps.get(2)?.as_str().parse().ok()?;
    let year_raw = caps.get(3)?.as_str();
    let mut year: i32 = year_raw.parse().ok()?;
    if year_raw.len() == 2 {
        year += if year >= TWO_DIGIT_YEAR_PIVOT { 1900 } else { 2000 };
    }

    let month = Month::try_from(month).ok()?;
    let date = Date::from_calendar_date(year, month, day).ok()?;
    Some(date.midnight().assume_utc())
}

/// Parse a clinical episode date.
///
/// Order: RFC 3339, ISO date/date-time (UTC assumed), then the first `M/D/Y` or `M-D-Y`
/// occurrence anywhere in the string. Anything else is `None`; callers treat that as
/// "no date" rather than an error.
pub fn parse_episode_date(raw: &str) -> Option<OffsetDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let parsed = parse_iso(trimmed).or_else(|| parse_month_day_year(trimmed));
    if parsed.is_none() {
        tracing::debug!(value = trimmed, "unparseable episode date");
    }
    parsed
}

/// Unix seconds for a parseable episode date.
pub fn episode_timestamp(raw: &str) -> Option<i64> {
    parse_episode_date(raw).map(|dt| dt.unix_timestamp())
}
