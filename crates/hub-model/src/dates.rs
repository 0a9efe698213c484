use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Calendar date of an ISO 8601 date or datetime string.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS[.fff][Z]` and the same with a
/// space separator; the time part is discarded.
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    parse_iso_datetime(raw).map(|datetime| datetime.date())
}

/// Date and time of an ISO 8601 date or datetime string.
///
/// A bare date reads as midnight. Offsets are dropped, keeping the local
/// wall-clock time.
pub fn parse_iso_datetime(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN));
    }
    let normalized = trimmed.trim_end_matches('Z').replace(' ', "T");
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(&normalized, format) {
            return Some(datetime);
        }
    }
    chrono::DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|datetime| datetime.naive_local())
}

/// `YYYY-MM-DD` at midnight, `YYYY-MM-DDTHH:MM:SS[.fff]` otherwise.
pub fn format_iso_datetime(datetime: NaiveDateTime) -> String {
    if datetime.time() == NaiveTime::MIN {
        format_iso_date(datetime.date())
    } else {
        datetime.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
    }
}

/// ISO `YYYY-MM-DD` rendering used for every stored date column.
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
