//! Curve export to CSV and JSON.
//!
//! CSV rows carry the raw timeline hour, the wrapped clock time and the total
//! in mg. JSON is the serialized [`CurveResult`].

use crate::{ConcentrationSample, CurveResult, Error, Result};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;

/// Output format for an exported curve
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// Infer the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(Error::Validation(format!(
                "unknown export format '{}' (expected csv or json)",
                other
            ))),
        }
    }
}

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    time_hrs: f64,
    clock: String,
    total_mg: f64,
}

impl From<&ConcentrationSample> for CsvRow {
    fn from(sample: &ConcentrationSample) -> Self {
        CsvRow {
            time_hrs: sample.time.hours(),
            clock: sample.time.to_clock(true).to_string(),
            total_mg: sample.total_mg,
        }
    }
}

/// Write the curve samples as CSV with a header row
pub fn write_csv<W: Write>(curve: &CurveResult, writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    if curve.samples.is_empty() {
        writer.write_record(["time_hrs", "clock", "total_mg"])?;
    }
    for sample in &curve.samples {
        writer.serialize(CsvRow::from(sample))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the full curve (samples and safe time) as pretty JSON
pub fn write_json<W: Write>(curve: &CurveResult, mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, curve)?;
    writer.write_all(b"\n")?;
    Ok(())
}

pub fn write_curve<W: Write>(curve: &CurveResult, format: ExportFormat, writer: W) -> Result<()> {
    match format {
        ExportFormat::Csv => write_csv(curve, writer),
        ExportFormat::Json => write_json(curve, writer),
    }
}

/// Export the curve to a file, creating parent directories as needed
pub fn export_to_path(curve: &CurveResult, format: ExportFormat, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let mut writer = io::BufWriter::new(file);
    write_curve(curve, format, &mut writer)?;
    writer.flush()?;

    tracing::info!(
        "Exported {} samples as {:?} to {:?}",
        curve.samples.len(),
        format,
        path
    );
    Ok(())
}
