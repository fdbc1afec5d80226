//! CLI entry point for the stop reschedule tool.
//!
//! Provides subcommands for shifting a single timetable by a fixed offset
//! and for resolving a full stop-pair schedule recalculation from a request
//! file.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::ffi::OsStr;
use std::path::Path;
use stop_reschedule::{
    output::{ResultRecord, print_json, write_record},
    resolver::{ShiftRequest, resolve_stop_schedule},
    settings::CoeffSettings,
    shift::{shift_schedule, shift_with_carryover},
    timetable::{self, Timetable},
};
use tracing::{debug, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "stop_reschedule")]
#[command(about = "A tool to recalculate stop timetables", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Shift one timetable by a fixed offset
    Shift {
        /// Path to a timetable JSON file (hour label -> minute string)
        #[arg(value_name = "TIMETABLE")]
        timetable: String,

        /// Travel offset in minutes
        #[arg(short = 'm', long, allow_hyphen_values = true)]
        offset: f64,

        /// Error coefficient applied to the offset (ignored with --carryover)
        #[arg(short, long, default_value_t = 0.0, allow_hyphen_values = true)]
        coeff: f64,

        /// Carry out-of-hour minutes into the adjacent hour instead of
        /// dropping them, using the per-hour coefficient tables
        #[arg(long, default_value_t = false)]
        carryover: bool,

        /// Use the weekend coefficient table in carryover mode
        #[arg(long, default_value_t = false)]
        weekend: bool,

        /// Optional: JSON file overriding the coefficient tables
        #[arg(short, long)]
        settings: Option<String>,

        /// Optional: file to write the result record to
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Resolve a stop-pair recalculation from a request file
    Resolve {
        /// Path to a request JSON file
        #[arg(value_name = "REQUEST")]
        request: String,

        /// Optional: file to write the result record to
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/stop_reschedule.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("stop_reschedule.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Shift {
            timetable,
            offset,
            coeff,
            carryover,
            weekend,
            settings,
            output,
        } => {
            let source = read_timetable(&timetable)?;

            let shifted = if carryover {
                let settings = match settings {
                    Some(path) => CoeffSettings::load(&path)?,
                    None => CoeffSettings::default(),
                };
                let coeffs = if weekend {
                    &settings.weekend_error_coeffs
                } else {
                    &settings.weekday_error_coeffs
                };

                if offset.fract() != 0.0 {
                    bail!("carryover mode requires a whole-minute offset, got {offset}");
                }
                shift_with_carryover(&source, offset as i64, coeffs)?
            } else {
                shift_schedule(&source, offset, coeff)?
            };

            debug!(
                hours_in = source.len(),
                hours_out = shifted.len(),
                "Timetable shifted"
            );

            let record = ResultRecord::new(&shifted)?;
            emit(&record, output.as_deref())?;
        }
        Commands::Resolve { request, output } => {
            let content = std::fs::read_to_string(&request)
                .with_context(|| format!("failed to read request file {request}"))?;
            let request: ShiftRequest = serde_json::from_str(&content)?;

            timetable::validate(&request.original_weekdays)?;
            timetable::validate(&request.original_weekends)?;

            let record = match resolve_stop_schedule(&request)? {
                Some(bundle) => {
                    info!(
                        current_stop_id = %request.current_stop_id,
                        new_stop_id = %request.new_stop_id,
                        "Schedule resolved"
                    );
                    ResultRecord::new(&bundle)?
                }
                None => {
                    warn!(
                        current_stop_id = %request.current_stop_id,
                        new_stop_id = %request.new_stop_id,
                        "Stop pair not resolvable"
                    );
                    ResultRecord::new(&Value::Null)?
                }
            };

            let record = record.with_transport(request.transport_type, request.transport_number);
            emit(&record, output.as_deref())?;
        }
    }

    Ok(())
}

/// Reads and validates a timetable JSON file.
fn read_timetable(path: &str) -> Result<Timetable> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read timetable file {path}"))?;
    let parsed: Timetable = serde_json::from_str(&content)?;
    timetable::validate(&parsed)?;
    Ok(parsed)
}

/// Prints a record to stdout and optionally persists it.
fn emit(record: &ResultRecord, output: Option<&str>) -> Result<()> {
    print_json(record)?;
    if let Some(path) = output {
        write_record(path, record)?;
    }
    Ok(())
}
