//! Parsing of request values that arrive as free-form strings.

use chrono::{DateTime, NaiveDateTime, Utc};
use worklog_core::error::{WorklogError, WorklogResult};
use worklog_core::models::user::AddUser;

/// Layout of `start_time` / `end_time` query values, e.g. `01:03:2024-09:30`.
pub const WINDOW_TIME_FORMAT: &str = "%d:%m:%Y-%H:%M";

const SERIE_DIGITS: usize = 4;
const NUMBER_DIGITS: usize = 6;

/// Parse `"SSSS NNNNNN"` into passport serie and number.
pub fn parse_passport(raw: &str) -> WorklogResult<AddUser> {
    let mut parts = raw.split(' ');
    let (Some(serie), Some(number), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid("malformed passport string, expected \"SSSS NNNNNN\""));
    };

    if !is_digits(serie, SERIE_DIGITS) {
        return Err(invalid("passport serie must be 4 digits"));
    }
    if !is_digits(number, NUMBER_DIGITS) {
        return Err(invalid("passport number must be 6 digits"));
    }

    Ok(AddUser {
        passport_serie: serie.parse().map_err(|_| invalid("passport serie out of range"))?,
        passport_number: number
            .parse()
            .map_err(|_| invalid("passport number out of range"))?,
    })
}

/// Parse a window bound, interpreted as UTC.
pub fn parse_window_time(field: &str, raw: &str) -> WorklogResult<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw.trim(), WINDOW_TIME_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| WorklogError::Validation {
            message: format!("{field} must look like dd:mm:YYYY-HH:MM, got {raw:?}"),
        })
}

fn is_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_digit())
}

fn invalid(message: &str) -> WorklogError {
    WorklogError::Validation {
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Timelike};

    use super::*;

    #[test]
    fn passport_with_leading_zeros() {
        let parsed = parse_passport("0042 000777").unwrap();
        assert_eq!(parsed.passport_serie, 42);
        assert_eq!(parsed.passport_number, 777);
    }

    #[test]
    fn passport_shape_is_strict() {
        for raw in [
            "",
            "1234",
            "1234567890",
            "1234  567890",
            "1234 567890 1",
            "123 567890",
            "12345 567890",
            "1234 56789",
            "12a4 567890",
            "1234 5678-0",
            "١٢٣٤ 567890",
        ] {
            let err = parse_passport(raw).unwrap_err();
            assert!(
                matches!(err, WorklogError::Validation { .. }),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn window_time_is_day_first_utc() {
        let parsed = parse_window_time("start_time", "01:03:2024-09:30").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap());
        assert_eq!(parsed.second(), 0);
    }

    #[test]
    fn window_time_rejects_other_layouts() {
        for raw in ["2024-03-01T09:30:00Z", "01.03.2024 09:30", "32:01:2024-00:00", "x"] {
            let err = parse_window_time("end_time", raw).unwrap_err();
            match err {
                WorklogError::Validation { message } => assert!(message.contains("end_time")),
                other => panic!("unexpected error for {raw:?}: {other:?}"),
            }
        }
    }
}
