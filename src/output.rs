//! Output formatters for map markers.
//!
//! Supports human-readable (with colors), JSON, and NDJSON formats.

use std::io::{self, Write};

use crate::encoding::MagnitudeScale;
use crate::markers::MapMarker;
use crate::models::NULL_MAGNITUDE;

// ANSI color codes
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

// Terminal colors per default bucket, lowest first
const BUCKET_COLORS: [&str; 6] = [
    "\x1b[32m",       // green
    "\x1b[92m",       // light green
    "\x1b[93m",       // yellow
    "\x1b[33m",       // amber
    "\x1b[38;5;214m", // orange
    "\x1b[91m",       // red
];

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Human-readable terminal output (default)
    #[default]
    Human,
    /// JSON array
    Json,
    /// Newline-delimited JSON (one object per line)
    Ndjson,
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            "ndjson" => Ok(Self::Ndjson),
            _ => Err(format!("unknown format: {s} (expected: human, json, ndjson)")),
        }
    }
}

/// Terminal color for a marker, picked by its bucket position.
fn terminal_color(scale: &MagnitudeScale, magnitude: f64) -> &'static str {
    let bucket = scale.bucket_for(magnitude);
    let index = scale
        .buckets()
        .iter()
        .position(|b| b == bucket)
        .unwrap_or(0);
    BUCKET_COLORS[index.min(BUCKET_COLORS.len() - 1)]
}

/// Write markers in human-readable format.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_human<W: Write>(
    writer: &mut W,
    markers: &[MapMarker],
    scale: &MagnitudeScale,
) -> io::Result<()> {
    for marker in markers {
        let encoded = marker.magnitude.unwrap_or(NULL_MAGNITUDE);
        let color = terminal_color(scale, encoded);
        let label = &scale.bucket_for(encoded).label;
        let mag = marker
            .magnitude
            .map_or_else(|| "?".to_string(), |m| m.to_string());
        let (lat, lon) = marker.position;

        writeln!(
            writer,
            "{color}{BOLD}M{mag:<5}{RESET} │ \
             {color}{label:4}{RESET} │ \
             {DIM}{lat:>8.3}, {lon:>9.3}{RESET} │ \
             {DIM}r={radius:<8.0}{RESET} │ \
             {place}",
            radius = marker.radius,
            place = marker.place,
        )?;
    }
    Ok(())
}

/// Write markers as a JSON array.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json<W: Write>(writer: &mut W, markers: &[MapMarker]) -> io::Result<()> {
    let json = serde_json::to_string_pretty(markers)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{json}")
}

/// Write markers as newline-delimited JSON.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_ndjson<W: Write>(writer: &mut W, markers: &[MapMarker]) -> io::Result<()> {
    for marker in markers {
        let json = serde_json::to_string(marker)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        writeln!(writer, "{json}")?;
    }
    Ok(())
}

/// Write markers in the specified format.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_markers<W: Write>(
    writer: &mut W,
    markers: &[MapMarker],
    scale: &MagnitudeScale,
    format: Format,
) -> io::Result<()> {
    match format {
        Format::Human => write_human(writer, markers, scale),
        Format::Json => write_json(writer, markers),
        Format::Ndjson => write_ndjson(writer, markers),
    }
}
