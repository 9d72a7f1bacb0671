//! Timestamp and date-label utilities

use chrono::{DateTime, NaiveDate, Utc};

/// Label shown when a lesson has no date
pub const MISSING_DATE_LABEL: &str = "Data não informada";

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Format a lesson date for chart axes and lists.
///
/// Values starting with an ISO `YYYY-MM-DD` date are rendered as `DD/MM/YYYY`.
/// Any other non-empty value (the older `DD/MM` free text, for instance) is
/// returned unchanged.
pub fn format_short_date(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return MISSING_DATE_LABEL.to_string();
    }

    match value.get(..10).filter(|prefix| looks_like_iso_date(prefix)) {
        Some(prefix) => match NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
            Ok(date) => date.format("%d/%m/%Y").to_string(),
            Err(_) => value.to_string(),
        },
        None => value.to_string(),
    }
}

/// Format a creation timestamp the way the lesson screen shows it
pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.format("%d/%m/%Y %H:%M").to_string()
}

fn looks_like_iso_date(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_now_returns_valid_timestamp() {
        let timestamp = now();
        assert!(timestamp.timestamp() > 946_684_800); // 2000-01-01 00:00:00 UTC
    }

    #[test]
    fn test_iso_date_formatted_as_brazilian() {
        assert_eq!(format_short_date("2024-03-07"), "07/03/2024");
    }

    #[test]
    fn test_iso_datetime_uses_date_part() {
        assert_eq!(format_short_date("2024-03-07T10:00:00Z"), "07/03/2024");
    }

    #[test]
    fn test_empty_date_uses_placeholder() {
        assert_eq!(format_short_date(""), MISSING_DATE_LABEL);
        assert_eq!(format_short_date("   "), MISSING_DATE_LABEL);
    }

    #[test]
    fn test_free_text_date_unchanged() {
        assert_eq!(format_short_date("12/05"), "12/05");
        assert_eq!(format_short_date("amanhã"), "amanhã");
    }

    #[test]
    fn test_invalid_iso_date_unchanged() {
        assert_eq!(format_short_date("2024-13-45"), "2024-13-45");
    }

    #[test]
    fn test_format_timestamp() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 7, 14, 5, 0).unwrap();
        assert_eq!(format_timestamp(&ts), "07/03/2024 14:05");
    }
}
