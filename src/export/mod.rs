//! Activity export
//!
//! Activities are written either as CSV, one row per activity, or as a
//! pretty-printed JSON array.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use thiserror::Error;

use crate::activity::Activity;
use crate::error::FitTrackError;

pub mod csv;
pub mod json;

/// Export format types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// Format implied by a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Export errors
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] ::csv::Error),
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<ExportError> for FitTrackError {
    fn from(error: ExportError) -> Self {
        match error {
            ExportError::IoError(e) => FitTrackError::Io(e),
            other => FitTrackError::Export(other.to_string()),
        }
    }
}

/// Write activities to `output_path` in the given format, returning the row count
pub fn export_activities<P: AsRef<Path>>(
    activities: &[Activity],
    format: ExportFormat,
    output_path: P,
) -> Result<usize, ExportError> {
    let output_path = output_path.as_ref();
    let file = BufWriter::new(File::create(output_path)?);

    match format {
        ExportFormat::Csv => csv::write_activities(activities, file)?,
        ExportFormat::Json => json::write_activities(activities, file)?,
    }

    tracing::info!(
        count = activities.len(),
        format = ?format,
        path = %output_path.display(),
        "Exported activities"
    );
    Ok(activities.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercise::create_exercise;
    use tempfile::tempdir;

    #[test]
    fn test_format_parsing() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert!(matches!(
            "pdf".parse::<ExportFormat>(),
            Err(ExportError::UnsupportedFormat(_))
        ));
        assert_eq!(
            ExportFormat::from_path(Path::new("out/log.json")),
            Some(ExportFormat::Json)
        );
        assert_eq!(ExportFormat::from_path(Path::new("log")), None);
    }

    #[test]
    fn test_export_errors_fold_into_domain_error() {
        let err = FitTrackError::from(ExportError::UnsupportedFormat("pdf".to_string()));
        assert!(matches!(err, FitTrackError::Export(ref msg) if msg.contains("pdf")));

        let dir = tempdir().unwrap();
        let missing = dir.path().join("no-such-dir").join("out.csv");
        let err = export_activities(&[], ExportFormat::Csv, &missing).unwrap_err();
        assert!(matches!(FitTrackError::from(err), FitTrackError::Io(_)));
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("activities.csv");
        let exercise = create_exercise("CARDIO", "Run", 30, None).unwrap();

        let count = export_activities(&[Activity::new(&exercise)], ExportFormat::Csv, &path).unwrap();
        assert_eq!(count, 1);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_export_error_conversion() {
        let err: FitTrackError = ExportError::UnsupportedFormat("pdf".to_string()).into();
        assert!(matches!(err, FitTrackError::Export(_)));
    }
}
