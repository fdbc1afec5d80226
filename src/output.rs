//! Output formatting and persistence for recalculation results.
//!
//! Supports pretty-printing, JSON logging, and writing timestamped JSON
//! record files.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

/// A recalculation result stamped with its generation time and the
/// pass-through transport metadata.
#[derive(Debug, Serialize)]
pub struct ResultRecord {
    pub generated_at: DateTime<Utc>,
    pub transport_type: Option<String>,
    pub transport_number: Option<String>,
    pub result: Value,
}

impl ResultRecord {
    /// Wraps any serializable result in a timestamped record.
    pub fn new<T: Serialize>(result: &T) -> Result<Self> {
        Ok(ResultRecord {
            generated_at: Utc::now(),
            transport_type: None,
            transport_number: None,
            result: serde_json::to_value(result)?,
        })
    }

    /// Attaches the request's transport metadata.
    pub fn with_transport(
        mut self,
        transport_type: Option<String>,
        transport_number: Option<String>,
    ) -> Self {
        self.transport_type = transport_type;
        self.transport_number = transport_number;
        self
    }
}

/// Logs a record using Rust's debug pretty-print format.
pub fn print_pretty(record: &ResultRecord) {
    debug!("{:#?}", record);
}

/// Prints a record as pretty JSON to stdout.
pub fn print_json(record: &ResultRecord) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(record)?);
    Ok(())
}

/// Writes a record as a pretty-printed JSON file at `path`, replacing any
/// existing file.
pub fn write_record(path: &str, record: &ResultRecord) -> Result<()> {
    debug!(path, "Writing result record");
    std::fs::write(path, serde_json::to_string_pretty(record)?)?;
    info!(path, "Result record written");
    Ok(())
}
