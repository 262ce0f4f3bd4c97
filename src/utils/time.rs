use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Utc, Weekday};

/// This is the standard way of converting a calendar day to a string in meaningful-tracker.
pub fn date_to_entry_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parses a stored entry date into a comparable instant. Accepts RFC 3339, naive date-time
/// (taken as UTC) and plain `YYYY-MM-DD` (midnight UTC). Anything else is `None`.
pub fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(v) = DateTime::parse_from_rfc3339(value) {
        return Some(v.to_utc());
    }
    if let Ok(v) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(v.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|v| v.and_time(NaiveTime::MIN).and_utc())
}

/// Calendar day an entry happened on, as written. For offset timestamps this is the day in
/// that offset rather than the UTC day, so an evening entry doesn't move to the next day.
pub fn parse_calendar_day(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(v) = DateTime::parse_from_rfc3339(value) {
        return Some(v.date_naive());
    }
    if let Ok(v) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(v.date());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

pub fn is_weekend(day: NaiveDate) -> bool {
    matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use super::{is_weekend, parse_calendar_day, parse_instant};

    #[test]
    fn parses_supported_formats() {
        let midnight = Utc.with_ymd_and_hms(2024, 4, 5, 0, 0, 0).unwrap();
        assert_eq!(parse_instant("2024-04-05"), Some(midnight));
        assert_eq!(parse_instant("2024-04-05T00:00:00"), Some(midnight));
        assert_eq!(parse_instant("2024-04-05T00:00:00.000Z"), Some(midnight));
        assert_eq!(
            parse_instant("2024-04-05T02:00:00+02:00"),
            Some(midnight)
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_instant("yesterday-ish"), None);
        assert_eq!(parse_instant(""), None);
        assert_eq!(parse_calendar_day("05/04/2024"), None);
    }

    #[test]
    fn calendar_day_keeps_written_offset() {
        assert_eq!(
            parse_calendar_day("2024-04-06T23:30:00-05:00"),
            NaiveDate::from_ymd_opt(2024, 4, 6)
        );
    }

    #[test]
    fn weekend_detection() {
        // 2024-04-06 is a Saturday
        assert!(is_weekend(NaiveDate::from_ymd_opt(2024, 4, 6).unwrap()));
        assert!(is_weekend(NaiveDate::from_ymd_opt(2024, 4, 7).unwrap()));
        assert!(!is_weekend(NaiveDate::from_ymd_opt(2024, 4, 8).unwrap()));
    }
}
