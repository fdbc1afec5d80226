//! Stop-pair schedule resolution.
//!
//! Looks up two stops in the catalog, derives a travel-time offset from
//! their ordinal distance within the shared direction, and shifts the
//! weekday and weekend timetables by it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ScheduleError;
use crate::shift::shift_schedule;
use crate::stops::{StopsData, deserialize_stop_id};
use crate::timetable::Timetable;

/// Fixed-rate approximation of the travel time between two adjacent stops.
pub const STOP_INTERVAL_MINUTES: u64 = 2;

/// One schedule recalculation request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftRequest {
    pub original_weekdays: Timetable,
    pub original_weekends: Timetable,
    #[serde(deserialize_with = "deserialize_stop_id")]
    pub current_stop_id: String,
    #[serde(deserialize_with = "deserialize_stop_id")]
    pub new_stop_id: String,
    /// Caller metadata; not an input to the offset computation.
    #[serde(default)]
    pub transport_type: Option<String>,
    /// Caller metadata; not an input to the offset computation.
    #[serde(default)]
    pub transport_number: Option<String>,
    pub weekday_error_coeff: f64,
    pub weekend_error_coeff: f64,
    pub stops_data: StopsData,
}

/// The recalculated weekday and weekend timetables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleBundle {
    #[serde(rename = "weekdays")]
    pub weekday_schedule: Timetable,
    #[serde(rename = "weekends")]
    pub weekend_schedule: Timetable,
}

/// Recalculates both timetables for a move from the current stop to a new
/// stop on the same route.
///
/// The travel offset is the absolute ordinal distance between the two stops
/// within their direction, times [`STOP_INTERVAL_MINUTES`]. The sign of the
/// move is discarded: shifting to an earlier or a later stop both push the
/// timetable forward.
///
/// Returns `Ok(None)` when the pair cannot be resolved — either id missing
/// from the catalog, or the stops lie on different directions. Both
/// timetables are shifted or neither is; a shift failure on either one fails
/// the whole call.
///
/// # Errors
///
/// Returns [`ScheduleError::InvalidCoefficient`] if either error coefficient
/// is NaN or infinite.
pub fn resolve_stop_schedule(
    request: &ShiftRequest,
) -> Result<Option<ScheduleBundle>, ScheduleError> {
    let stops = &request.stops_data.stops;

    let current = stops.iter().find(|s| s.id == request.current_stop_id);
    let new = stops.iter().find(|s| s.id == request.new_stop_id);

    let (Some(current), Some(new)) = (current, new) else {
        debug!(
            current_stop_id = %request.current_stop_id,
            new_stop_id = %request.new_stop_id,
            "Stop id not found in catalog"
        );
        return Ok(None);
    };

    if current.direction != new.direction {
        debug!(
            current_direction = %current.direction,
            new_direction = %new.direction,
            "Stops lie on different directions"
        );
        return Ok(None);
    }

    let direction = &current.direction;
    let in_direction: Vec<_> = stops.iter().filter(|s| &s.direction == direction).collect();

    let current_index = in_direction.iter().position(|s| s.id == request.current_stop_id);
    let new_index = in_direction.iter().position(|s| s.id == request.new_stop_id);

    // Both were found above, but re-check after filtering
    let (Some(current_index), Some(new_index)) = (current_index, new_index) else {
        return Ok(None);
    };

    let travel_offset =
        (new_index as i64 - current_index as i64).unsigned_abs() * STOP_INTERVAL_MINUTES;

    debug!(
        direction = %direction,
        current_index,
        new_index,
        travel_offset,
        "Resolved stop pair"
    );

    let weekday_schedule = shift_schedule(
        &request.original_weekdays,
        travel_offset as f64,
        request.weekday_error_coeff,
    )?;
    let weekend_schedule = shift_schedule(
        &request.original_weekends,
        travel_offset as f64,
        request.weekend_error_coeff,
    )?;

    Ok(Some(ScheduleBundle {
        weekday_schedule,
        weekend_schedule,
    }))
}
