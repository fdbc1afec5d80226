//! Timetable shifting.
//!
//! Two modes share the same offset adjustment but differ on what happens to
//! minutes that leave their hour:
//!
//! * [`shift_schedule`] drops them (a departure shifted past the hour
//!   boundary vanishes from the timetable);
//! * [`shift_with_carryover`] moves them into the adjacent hour, using
//!   per-hour coefficient tables.

use std::collections::BTreeMap;

use tracing::warn;

use crate::error::ScheduleError;
use crate::settings::{DEFAULT_ERROR_COEFF, HourlyCoeffs};
use crate::timetable::{Timetable, pad2, parse_minute};

/// Shifts every minute in `timetable` by `offset_minutes`, scaled by an
/// error coefficient, pruning minutes that leave their hour.
///
/// The applied delta is `round(offset_minutes * (1 + error_coeff))`, rounded
/// half away from zero. A shifted minute is kept only while it stays in
/// `0..60`; there is no rollover into adjacent hours, so out-of-range minutes
/// disappear and an hour whose minutes all disappear is omitted from the
/// result entirely. Relative minute order within an hour is preserved.
///
/// Minute tokens that fail to parse are skipped with a warning rather than
/// failing the call; run [`crate::timetable::validate`] upstream to reject
/// them instead.
///
/// # Errors
///
/// Returns [`ScheduleError::InvalidCoefficient`] if the offset or the
/// coefficient is NaN or infinite.
pub fn shift_schedule(
    timetable: &Timetable,
    offset_minutes: f64,
    error_coeff: f64,
) -> Result<Timetable, ScheduleError> {
    if !offset_minutes.is_finite() {
        return Err(ScheduleError::InvalidCoefficient(offset_minutes));
    }
    if !error_coeff.is_finite() {
        return Err(ScheduleError::InvalidCoefficient(error_coeff));
    }

    let delta = (offset_minutes * (1.0 + error_coeff)).round() as i64;

    let mut shifted = Timetable::new();

    for (hour, minutes) in timetable {
        let mut kept: Vec<String> = Vec::new();

        for token in minutes.split_whitespace() {
            let Some(m) = parse_minute(token) else {
                warn!(hour = %hour, token, "Skipping unparseable minute token");
                continue;
            };

            let m = m + delta;
            if (0..60).contains(&m) {
                kept.push(pad2(m));
            }
        }

        if !kept.is_empty() {
            shifted.insert(hour.clone(), kept.join(" "));
        }
    }

    Ok(shifted)
}

/// Shifts `timetable` like [`shift_schedule`] but carries out-of-range
/// minutes into the adjacent hour instead of dropping them.
///
/// The coefficient is looked up per source hour in `coeffs`, falling back to
/// [`DEFAULT_ERROR_COEFF`] for unlisted hours, and the adjusted offset is
/// truncated toward zero. Hours wrap modulo 24, so a 23:57 departure shifted
/// forward lands in hour "00". Minutes merged into one hour are sorted
/// ascending and deduplicated.
///
/// # Errors
///
/// Returns [`ScheduleError::InvalidHourLabel`] if an hour label is not a
/// number in `0..=23`, or [`ScheduleError::InvalidCoefficient`] if a table
/// entry is not finite.
pub fn shift_with_carryover(
    timetable: &Timetable,
    offset_minutes: i64,
    coeffs: &HourlyCoeffs,
) -> Result<Timetable, ScheduleError> {
    let mut by_hour: BTreeMap<i64, Vec<i64>> = BTreeMap::new();

    for (hour_label, minutes) in timetable {
        let hour = hour_label
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|h| (0..24).contains(h))
            .ok_or_else(|| ScheduleError::InvalidHourLabel(hour_label.clone()))?;

        let coeff = coeffs
            .get(&(hour as u8))
            .copied()
            .unwrap_or(DEFAULT_ERROR_COEFF);
        if !coeff.is_finite() {
            return Err(ScheduleError::InvalidCoefficient(coeff));
        }

        let adjusted = (offset_minutes as f64 * (1.0 + coeff)).trunc() as i64;

        for token in minutes.split_whitespace() {
            let Some(m) = parse_minute(token) else {
                warn!(hour = %hour_label, token, "Skipping unparseable minute token");
                continue;
            };

            let total = m + adjusted;
            let new_hour = (hour + total.div_euclid(60)).rem_euclid(24);
            by_hour.entry(new_hour).or_default().push(total.rem_euclid(60));
        }
    }

    let mut shifted = Timetable::new();
    for (hour, mut mins) in by_hour {
        mins.sort_unstable();
        mins.dedup();
        let joined = mins.iter().map(|&m| pad2(m)).collect::<Vec<_>>().join(" ");
        shifted.insert(pad2(hour), joined);
    }

    Ok(shifted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timetable(entries: &[(&str, &str)]) -> Timetable {
        entries
            .iter()
            .map(|(h, m)| (h.to_string(), m.to_string()))
            .collect()
    }

    #[test]
    fn test_shift_basic_offset() {
        let t = timetable(&[("08", "10 40")]);
        let shifted = shift_schedule(&t, 4.0, 0.0).unwrap();
        assert_eq!(shifted["08"], "14 44");
    }

    #[test]
    fn test_shift_prunes_out_of_hour_minute() {
        let t = timetable(&[("08", "57")]);
        let shifted = shift_schedule(&t, 4.0, 0.0).unwrap();
        // 57+4 = 61 leaves the hour; the hour had no other minutes so the
        // key itself is dropped
        assert!(shifted.is_empty());
    }

    #[test]
    fn test_shift_drops_hour_but_keeps_others() {
        let t = timetable(&[("08", "58 59"), ("09", "10")]);
        let shifted = shift_schedule(&t, 5.0, 0.0).unwrap();
        assert!(!shifted.contains_key("08"));
        assert_eq!(shifted["09"], "15");
    }

    #[test]
    fn test_shift_negative_offset_prunes_below_zero() {
        let t = timetable(&[("08", "02 30")]);
        let shifted = shift_schedule(&t, -5.0, 0.0).unwrap();
        assert_eq!(shifted["08"], "25");
    }

    #[test]
    fn test_shift_zero_offset_is_identity() {
        let t = timetable(&[("08", "05 20 35"), ("09", "00 59")]);
        let shifted = shift_schedule(&t, 0.0, 0.0).unwrap();
        assert_eq!(shifted, t);
    }

    #[test]
    fn test_shift_error_coeff_scales_delta() {
        // round(4 * 1.5) = 6
        let t = timetable(&[("08", "10")]);
        let shifted = shift_schedule(&t, 4.0, 0.5).unwrap();
        assert_eq!(shifted["08"], "16");
    }

    #[test]
    fn test_shift_rounds_half_away_from_zero() {
        let t = timetable(&[("08", "10")]);
        // 5 * 0.5 = 2.5 rounds to 3, not 2
        assert_eq!(shift_schedule(&t, 5.0, -0.5).unwrap()["08"], "13");
        // -5 * 0.5 = -2.5 rounds to -3
        assert_eq!(shift_schedule(&t, -5.0, -0.5).unwrap()["08"], "07");
    }

    #[test]
    fn test_shift_preserves_input_order() {
        let t = timetable(&[("08", "40 10")]);
        let shifted = shift_schedule(&t, 2.0, 0.0).unwrap();
        assert_eq!(shifted["08"], "42 12");
    }

    #[test]
    fn test_shift_skips_malformed_token() {
        let t = timetable(&[("08", "10 xx 40")]);
        let shifted = shift_schedule(&t, 1.0, 0.0).unwrap();
        assert_eq!(shifted["08"], "11 41");
    }

    #[test]
    fn test_shift_rejects_non_finite_inputs() {
        let t = timetable(&[("08", "10")]);
        assert!(shift_schedule(&t, f64::NAN, 0.0).is_err());
        assert!(shift_schedule(&t, 4.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_shift_does_not_mutate_input() {
        let t = timetable(&[("08", "57")]);
        let _ = shift_schedule(&t, 4.0, 0.0).unwrap();
        assert_eq!(t["08"], "57");
    }

    #[test]
    fn test_carryover_moves_minute_to_next_hour() {
        let t = timetable(&[("08", "57")]);
        let shifted = shift_with_carryover(&t, 4, &HourlyCoeffs::new()).unwrap();
        // coeff fallback 0.01: trunc(4 * 1.01) = 4; 57+4 = 61 -> 09:01
        assert!(!shifted.contains_key("08"));
        assert_eq!(shifted["09"], "01");
    }

    #[test]
    fn test_carryover_merges_sorts_and_dedupes() {
        let t = timetable(&[("08", "58 59"), ("09", "02 02")]);
        let shifted = shift_with_carryover(&t, 3, &HourlyCoeffs::new()).unwrap();
        // 58,59 -> 09:01, 09:02; 02,02 -> 09:05 once
        assert_eq!(shifted["09"], "01 02 05");
    }

    #[test]
    fn test_carryover_wraps_past_midnight() {
        let t = timetable(&[("23", "58")]);
        let shifted = shift_with_carryover(&t, 4, &HourlyCoeffs::new()).unwrap();
        assert_eq!(shifted["00"], "02");
    }

    #[test]
    fn test_carryover_uses_per_hour_coefficient() {
        let mut coeffs = HourlyCoeffs::new();
        coeffs.insert(8, 0.5);
        let t = timetable(&[("08", "10")]);
        // trunc(10 * 1.5) = 15
        let shifted = shift_with_carryover(&t, 10, &coeffs).unwrap();
        assert_eq!(shifted["08"], "25");
    }

    #[test]
    fn test_carryover_negative_offset_borrows_previous_hour() {
        let t = timetable(&[("09", "02")]);
        let shifted = shift_with_carryover(&t, -4, &HourlyCoeffs::new()).unwrap();
        // trunc(-4 * 1.01) = -4; 2-4 = -2 -> 08:58
        assert_eq!(shifted["08"], "58");
    }

    #[test]
    fn test_carryover_rejects_bad_hour_label() {
        let t = timetable(&[("25", "10")]);
        let err = shift_with_carryover(&t, 1, &HourlyCoeffs::new()).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidHourLabel(_)));
    }
}
