/// Timestamp parsing and UTC date/time decomposition
///
/// Readings are stored as a calendar date plus a whole-second time of day,
/// both in UTC. The combined instant is rebuilt from those two parts.
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Timelike, Utc};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// UTC calendar date and time of day of an instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateParts {
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl DateParts {
    /// Split an instant, truncating sub-second precision
    pub fn from_instant(instant: DateTime<Utc>) -> Self {
        let naive = instant.naive_utc();
        let time = NaiveTime::from_hms_opt(naive.hour(), naive.minute(), naive.second())
            .unwrap_or(NaiveTime::MIN);
        Self {
            date: naive.date(),
            time,
        }
    }

    pub fn to_instant(&self) -> DateTime<Utc> {
        NaiveDateTime::new(self.date, self.time).and_utc()
    }

    /// `YYYY-MM-DD`
    pub fn date_string(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    /// `HH:MM:SS`
    pub fn time_string(&self) -> String {
        self.time.format(TIME_FORMAT).to_string()
    }
}

/// Parse a submitted timestamp.
///
/// Accepts RFC 3339 (`2024-03-01T10:15:00Z`, `...+02:00`), naive date-times
/// with `T` or space separators (read as UTC) and bare dates (UTC midnight).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// ISO-8601 with millisecond precision and a `Z` suffix
pub fn to_iso_millis(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_decomposition_truncates_subseconds() {
        let instant = Utc
            .with_ymd_and_hms(2024, 3, 1, 10, 15, 42)
            .unwrap()
            .with_nanosecond(987_000_000)
            .unwrap();
        let parts = DateParts::from_instant(instant);
        assert_eq!(parts.date_string(), "2024-03-01");
        assert_eq!(parts.time_string(), "10:15:42");
        assert_eq!(to_iso_millis(parts.to_instant()), "2024-03-01T10:15:42.000Z");
    }

    #[test]
    fn test_offsets_are_normalized_to_utc() {
        let instant = parse_timestamp("2024-03-01T01:30:00+03:00").unwrap();
        let parts = DateParts::from_instant(instant);
        assert_eq!(parts.date_string(), "2024-02-29");
        assert_eq!(parts.time_string(), "22:30:00");
    }

    #[test]
    fn test_accepted_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 10, 15, 0).unwrap();
        assert_eq!(parse_timestamp("2024-03-01T10:15:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01T10:15:00.000Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01T10:15:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01 10:15:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01T10:15"), Some(expected));
        assert_eq!(
            parse_timestamp("2024-03-01"),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_rejected_formats() {
        for raw in ["", "   ", "yesterday", "2024-13-01T00:00:00Z", "2024-02-30", "10:15:00"] {
            assert_eq!(parse_timestamp(raw), None, "accepted {:?}", raw);
        }
    }
}
