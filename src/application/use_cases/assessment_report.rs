// ============================================================
// ASSESSMENT REPORT USE CASE
// ============================================================
// Orchestrate one upload end to end: validate, parse, aggregate

use crate::application::use_cases::area_aggregator::aggregate;
use crate::domain::assessment::AssessmentReport;
use crate::domain::error::{AppError, Result};
use crate::infrastructure::csv::ReportParser;
use chrono::Utc;
use std::path::Path;
use tracing::info;

/// Uploads over this size are rejected before parsing
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

pub struct AssessmentReportUseCase {
    parser: ReportParser,
}

impl AssessmentReportUseCase {
    pub fn new() -> Self {
        Self {
            parser: ReportParser::new(),
        }
    }

    /// Run the full pipeline on uploaded CSV text.
    ///
    /// Structural problems fail with a parse error; an upload that
    /// parses but yields zero valid rows fails with a validation
    /// error, since the parser itself treats that as a valid result.
    pub fn execute(&self, csv_text: &str) -> Result<AssessmentReport> {
        if csv_text.len() > MAX_UPLOAD_BYTES {
            return Err(AppError::ValidationError(
                "File size exceeds 5MB. Please upload a smaller file.".to_string(),
            ));
        }
        if csv_text.trim().is_empty() {
            return Err(AppError::ValidationError(
                "File content is empty or could not be read.".to_string(),
            ));
        }

        let items = self.parser.parse_content(csv_text)?;
        if items.is_empty() {
            return Err(AppError::ValidationError(
                "No valid data found in the CSV. Please check the file format and content."
                    .to_string(),
            ));
        }

        let areas = aggregate(&items);
        info!(
            records = items.len(),
            areas = areas.len(),
            "Assessment complete"
        );

        Ok(AssessmentReport {
            items,
            areas,
            generated_at: Utc::now(),
        })
    }

    /// Read a CSV file from disk and run the pipeline on it
    pub fn execute_file(&self, path: &Path) -> Result<AssessmentReport> {
        let is_csv = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if !is_csv {
            return Err(AppError::ValidationError(
                "Invalid file type. Please upload a .csv file.".to_string(),
            ));
        }

        let bytes = std::fs::read(path)
            .map_err(|e| AppError::IoError(format!("Failed to read file: {}", e)))?;
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(AppError::ValidationError(
                "File size exceeds 5MB. Please upload a smaller file.".to_string(),
            ));
        }

        self.execute(&String::from_utf8_lossy(&bytes))
    }
}

impl Default for AssessmentReportUseCase {
    fn default() -> Self {
        Self::new()
    }
}
