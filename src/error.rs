//! Error types for schedule recalculation.

use thiserror::Error;

/// Errors surfaced for malformed input.
///
/// An unresolvable stop pair (missing id, direction mismatch) is not an
/// error: [`crate::resolver::resolve_stop_schedule`] returns `Ok(None)` for
/// that case so callers can distinguish "bad data" from "no answer".
#[derive(Error, Debug)]
pub enum ScheduleError {
    /// A coefficient or time offset was NaN or infinite.
    #[error("error coefficient or offset is not finite: {0}")]
    InvalidCoefficient(f64),

    /// A minute token failed base-10 parsing or lies outside 0..60.
    #[error("invalid minute token `{token}` in hour {hour}")]
    InvalidMinuteToken { hour: String, token: String },

    /// An hour label could not be read as a number in 0..=23.
    #[error("invalid hour label `{0}`")]
    InvalidHourLabel(String),
}
