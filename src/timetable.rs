//! Timetable representation and minute-token helpers.

use std::collections::BTreeMap;

use crate::error::ScheduleError;

/// A stop timetable: hour label ("05".."23", "00") mapped to a single
/// space-delimited string of two-digit minute tokens, e.g. "05 20 35".
///
/// A `BTreeMap` keeps hour labels in ascending order since they are always
/// zero-padded to two digits.
pub type Timetable = BTreeMap<String, String>;

/// Formats a minute value as a two-digit zero-padded token.
pub fn pad2(minute: i64) -> String {
    format!("{:02}", minute)
}

/// Parses one minute token as a base-10 integer.
pub fn parse_minute(token: &str) -> Option<i64> {
    token.parse::<i64>().ok()
}

/// Checks every minute token in `timetable` parses and lies in 0..60.
///
/// The shifting functions skip malformed tokens with a warning; callers that
/// read timetables from untrusted files can run this first to get a
/// structured error instead.
pub fn validate(timetable: &Timetable) -> Result<(), ScheduleError> {
    for (hour, minutes) in timetable {
        for token in minutes.split_whitespace() {
            match parse_minute(token) {
                Some(m) if (0..60).contains(&m) => {}
                _ => {
                    return Err(ScheduleError::InvalidMinuteToken {
                        hour: hour.clone(),
                        token: token.to_string(),
                    });
                }
            }
        }
    }
    Ok(())
}
