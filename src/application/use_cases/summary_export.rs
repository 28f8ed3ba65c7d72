// ============================================================
// SUMMARY EXPORT
// ============================================================
// Render the aggregated summaries as a downloadable CSV report

use crate::domain::assessment::AreaSummary;
use crate::domain::error::{AppError, Result};

pub const SUMMARY_EXPORT_FILENAME: &str = "assessment_summary_report.csv";

const SUMMARY_EXPORT_HEADER: &str = "Assessment Area,Total Score,Average Score,Question Count";

/// Render one CSV row per summary. The area is double-quoted, the
/// average printed with exactly 2 decimal places, the total with the
/// shortest representation that round-trips.
pub fn export_summary_csv(areas: &[AreaSummary]) -> Result<String> {
    if areas.is_empty() {
        return Err(AppError::ValidationError(
            "No processed data to export.".to_string(),
        ));
    }

    let rows: Vec<String> = areas
        .iter()
        .map(|area| {
            format!(
                "\"{}\",{},{:.2},{}",
                area.area, area.total_score, area.average_score, area.question_count
            )
        })
        .collect();

    Ok(format!("{}\n{}", SUMMARY_EXPORT_HEADER, rows.join("\n")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::assessment::ParsedItem;

    fn summary(area: &str, total: f64, average: f64, count: usize) -> AreaSummary {
        AreaSummary {
            area: area.to_string(),
            total_score: total,
            average_score: average,
            question_count: count,
            questions: Vec::new(),
        }
    }

    #[test]
    fn test_export_format() {
        let areas = vec![summary("Algebra", 13.0, 6.5, 2), summary("Geometry", 3.0, 3.0, 1)];
        let csv = export_summary_csv(&areas).unwrap();

        assert_eq!(
            csv,
            "Assessment Area,Total Score,Average Score,Question Count\n\
             \"Algebra\",13,6.50,2\n\
             \"Geometry\",3,3.00,1"
        );
    }

    #[test]
    fn test_fractional_total_keeps_full_precision() {
        let csv = export_summary_csv(&[summary("A", 13.25, 4.42, 3)]).unwrap();
        assert!(csv.ends_with("\"A\",13.25,4.42,3"));
    }

    #[test]
    fn test_empty_summaries_fail() {
        let err = export_summary_csv(&[]).unwrap_err();
        assert!(err.to_string().contains("No processed data to export."));
    }

    #[test]
    fn test_export_matches_pipeline_output() {
        let items = vec![ParsedItem {
            assessment_area: "Algebra".to_string(),
            question: "Q1".to_string(),
            score: 5.0,
            recommendation: None,
        }];
        let areas = crate::application::use_cases::area_aggregator::aggregate(&items);
        let csv = export_summary_csv(&areas).unwrap();
        assert!(csv.contains("\"Algebra\",5,5.00,1"));
    }
}
