//! Per-hour error-coefficient settings.
//!
//! Calibration drift varies by time of day: rush hours accumulate more error
//! than off-peak hours. These tables feed the carryover shifting mode and can
//! be overridden from a local JSON settings file.

use anyhow::Result;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::info;

/// Coefficient table keyed by hour of day (0..=23).
pub type HourlyCoeffs = HashMap<u8, f64>;

/// Fallback coefficient for hours missing from a table.
pub const DEFAULT_ERROR_COEFF: f64 = 0.01;

/// Weekday and weekend per-hour error-coefficient tables.
///
/// Stored on disk as a plain JSON object:
/// ```json
/// {
///   "weekday_error_coeffs": { "7": 0.015, "8": 0.015 },
///   "weekend_error_coeffs": { "10": 0.02 }
/// }
/// ```
/// Either table may be omitted; the built-in defaults are used instead.
#[derive(Debug, Clone, Deserialize)]
pub struct CoeffSettings {
    #[serde(default = "default_weekday_coeffs")]
    pub weekday_error_coeffs: HourlyCoeffs,
    #[serde(default = "default_weekend_coeffs")]
    pub weekend_error_coeffs: HourlyCoeffs,
}

impl Default for CoeffSettings {
    fn default() -> Self {
        CoeffSettings {
            weekday_error_coeffs: default_weekday_coeffs(),
            weekend_error_coeffs: default_weekend_coeffs(),
        }
    }
}

impl CoeffSettings {
    /// Loads settings from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: CoeffSettings = serde_json::from_str(&content)?;
        info!(path, "Coefficient settings loaded");
        Ok(settings)
    }
}

/// Service hours are 5:00-23:00 plus the after-midnight 0:00 slot.
const SERVICE_HOURS: [u8; 20] = [
    5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 0,
];

fn default_weekday_coeffs() -> HourlyCoeffs {
    // Rush hours carry a higher drift coefficient.
    SERVICE_HOURS
        .iter()
        .map(|&h| {
            let coeff = if matches!(h, 7 | 8 | 16 | 17) {
                0.015
            } else {
                0.01
            };
            (h, coeff)
        })
        .collect()
}

fn default_weekend_coeffs() -> HourlyCoeffs {
    SERVICE_HOURS.iter().map(|&h| (h, 0.015)).collect()
}
