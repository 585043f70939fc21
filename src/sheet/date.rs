//! Date and time utilities
//!
//! Excel stores dates as serial day numbers counted from one of two epochs:
//! - **1900 system**: serial 1 is 1900-01-01. Excel treats 1900 as a leap
//!   year, so serial 60 is the nonexistent 1900-02-29 and serials below 61
//!   are shifted by one day relative to the real calendar.
//! - **1904 system**: serial 0 is 1904-01-01.
//!
//! The fractional part is the time of day.

use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Days between 1899-12-30 and 1904-01-01
const EPOCH_1904_OFFSET: f64 = 1462.0;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Convert a serial number to a date/time.
///
/// Returns `None` for negative serials and values chrono cannot represent.
pub fn serial_to_datetime(serial: f64, is_1904: bool) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }

    let mut value = if is_1904 {
        serial + EPOCH_1904_OFFSET
    } else {
        serial
    };
    if !is_1904 && (1.0..61.0).contains(&value) {
        value += 1.0;
    }

    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (value * MILLIS_PER_DAY).round();
    if millis > i64::MAX as f64 {
        return None;
    }
    base.checked_add_signed(Duration::try_milliseconds(millis as i64)?)
}

/// Built-in number format ids that display dates or times.
pub fn is_builtin_date_format(id: u32) -> bool {
    matches!(id, 14..=22 | 27..=36 | 45..=47 | 50..=58)
}

/// Whether a number format code renders its value as a date or time.
///
/// Quoted literals, escaped characters, and bracketed sections (colors,
/// conditions, locales) are skipped. Elapsed-time brackets such as `[h]`
/// count as time tokens. Only the first section of the code is examined.
pub fn is_date_format_string(format: &str) -> bool {
    let mut chars = format.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => {
                for q in chars.by_ref() {
                    if q == '"' {
                        break;
                    }
                }
            },
            '\\' | '_' | '*' => {
                chars.next();
            },
            '[' => {
                let mut inner = String::new();
                for b in chars.by_ref() {
                    if b == ']' {
                        break;
                    }
                    inner.push(b);
                }
                let lower = inner.to_ascii_lowercase();
                if !lower.is_empty() && lower.chars().all(|ch| matches!(ch, 'h' | 'm' | 's')) {
                    return true;
                }
            },
            ';' | '@' => return false,
            'y' | 'Y' | 'd' | 'D' | 'h' | 'H' | 's' | 'S' | 'm' | 'M' => return true,
            _ => {},
        }
    }
    false
}
