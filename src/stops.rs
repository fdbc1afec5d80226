//! Stop catalog types and stop-id normalization.
//!
//! Catalog feeds carry stop ids inconsistently as JSON numbers or strings
//! ("5", 5, "05" all naming the same stop). Instead of comparing loosely at
//! every lookup site, ids collapse to one canonical `String` at the
//! deserialization boundary: integer-shaped ids render as their shortest
//! decimal form, everything else is kept verbatim after trimming. Lookups are
//! then plain string equality.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};

/// One stop on a route, read-only. Catalog order is significant: the
/// resolver derives travel offsets from ordinal positions within a
/// direction.
#[derive(Debug, Clone, Deserialize)]
pub struct Stop {
    #[serde(deserialize_with = "deserialize_stop_id")]
    pub id: String,
    /// Tag naming one of the route's two travel directions.
    pub direction: String,
    /// Display name, passed through untouched.
    #[serde(default)]
    pub name: Option<String>,
}

/// The external stop catalog; the resolver only reads it.
#[derive(Debug, Clone, Deserialize)]
pub struct StopsData {
    pub stops: Vec<Stop>,
}

/// Canonicalizes a raw stop id: integer forms (including leading zeros)
/// become their shortest decimal rendering, other ids are trimmed and kept
/// as-is.
pub fn normalize_id(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.parse::<i64>() {
        Ok(n) => n.to_string(),
        Err(_) => trimmed.to_string(),
    }
}

/// Deserializes a stop id given as either a JSON string or a JSON number
/// into its normalized form.
pub fn deserialize_stop_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct IdVisitor;

    impl<'de> Visitor<'de> for IdVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a stop id as a string or number")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(normalize_id(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            // Whole-number floats come from feeds that quote ids as 5.0
            if v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
                Ok((v as i64).to_string())
            } else {
                Ok(v.to_string())
            }
        }
    }

    deserializer.deserialize_any(IdVisitor)
}
