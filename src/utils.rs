use crate::constants::DATE_FORMAT;
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, FixedOffset, Local, NaiveDate, SecondsFormat};

/// Renders a Unix timestamp as RFC 3339.
///
/// Uses `offset` when given, otherwise the local time zone of the process.
/// Timestamps outside chrono's range render as an empty string.
pub fn format_timestamp(secs: i64, offset: Option<FixedOffset>) -> String {
    let Some(utc) = DateTime::from_timestamp(secs, 0) else {
        return String::new();
    };
    match offset {
        Some(offset) => utc
            .with_timezone(&offset)
            .to_rfc3339_opts(SecondsFormat::Secs, true),
        None => utc
            .with_timezone(&Local)
            .to_rfc3339_opts(SecondsFormat::Secs, true),
    }
}

pub fn format_request_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(s: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| AppError::InvalidInput(format!("Invalid date '{s}', expected YYYY-MM-DD")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_timestamp_with_fixed_offset() {
        let moscow = FixedOffset::east_opt(3 * 3600);
        assert_eq!(
            format_timestamp(1_700_000_000, moscow),
            "2023-11-15T01:13:20+03:00"
        );
    }

    #[test]
    fn format_timestamp_utc_uses_z_suffix() {
        let utc = FixedOffset::east_opt(0);
        assert_eq!(format_timestamp(1_700_000_000, utc), "2023-11-14T22:13:20Z");
    }

    #[test]
    fn format_timestamp_local_denotes_same_instant() {
        let rendered = format_timestamp(1_700_000_000, None);
        let parsed = DateTime::parse_from_rfc3339(&rendered).unwrap();
        assert_eq!(parsed.timestamp(), 1_700_000_000);
    }

    #[test]
    fn format_timestamp_out_of_range_is_empty() {
        assert_eq!(format_timestamp(i64::MAX, None), "");
    }

    #[test]
    fn request_date_is_iso_calendar_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(format_request_date(date), "2024-03-01");
    }

    #[test]
    fn parse_date_accepts_iso_and_rejects_garbage() {
        assert_eq!(
            parse_date("2024-03-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
        assert!(matches!(
            parse_date("01.03.2024"),
            Err(AppError::InvalidInput(_))
        ));
    }
}
