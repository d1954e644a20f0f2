//! Date handling for deadline and event tasks.
//!
//! Only one input grammar is accepted: `d/M/yyyy HHmm` with a 24-hour clock,
//! e.g. `2/12/2019 1800`. Display and storage use their own fixed formats.

use chrono::NaiveDateTime;

use crate::error::{DanError, Result};

/// Grammar accepted from users and from stored records.
const INPUT_FORMAT: &str = "%d/%m/%Y %H%M";
/// `Dec 2 2019, 6:00pm`
const DISPLAY_FORMAT: &str = "%b %-d %Y, %-I:%M%P";
/// `2/12/2019 1800`
const STORAGE_FORMAT: &str = "%-d/%-m/%Y %H%M";

/// Parse a user-supplied date-time such as `2/12/2019 1800`.
pub fn parse_date_time(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    if !has_input_shape(s) {
        return Err(DanError::DateFormat(s.to_string()));
    }
    NaiveDateTime::parse_from_str(s, INPUT_FORMAT).map_err(|_| DanError::DateFormat(s.to_string()))
}

/// Digits-only `d/M/yyyy HHmm` check. chrono's numeric fields also take
/// short years, signs and padding, so the layout is enforced here first.
fn has_input_shape(s: &str) -> bool {
    let digits = |part: &str, min: usize, max: usize| {
        (min..=max).contains(&part.len()) && part.bytes().all(|b| b.is_ascii_digit())
    };
    let Some((date, time)) = s.split_once(' ') else {
        return false;
    };
    let mut fields = date.split('/');
    match (fields.next(), fields.next(), fields.next(), fields.next()) {
        (Some(day), Some(month), Some(year), None) => {
            digits(day, 1, 2) && digits(month, 1, 2) && digits(year, 4, 4) && digits(time, 4, 4)
        }
        _ => false,
    }
}

/// Format a date-time for task rendering.
pub fn format_display(dt: &NaiveDateTime) -> String {
    dt.format(DISPLAY_FORMAT).to_string()
}

/// Format a date-time for the record file; always re-parseable by `parse_date_time`.
pub fn format_storage(dt: &NaiveDateTime) -> String {
    dt.format(STORAGE_FORMAT).to_string()
}
