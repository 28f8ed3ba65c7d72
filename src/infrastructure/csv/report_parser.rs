// ============================================================
// REPORT PARSER
// ============================================================
// Parse assessment CSV text into validated per-question records

use crate::domain::assessment::ParsedItem;
use crate::domain::error::{AppError, Result};
use tracing::warn;

/// Header keywords resolved by case-insensitive substring match
const AREA_KEYWORD: &str = "assessment area";
const QUESTION_KEYWORD: &str = "question";
const SCORE_KEYWORD: &str = "score";
const RECOMMENDATION_KEYWORD: &str = "recommendation";

/// CSV row parser for assessment files.
///
/// Fields are split on plain commas; quoted fields and escaped commas
/// are not supported. Files that need them are out of scope.
pub struct ReportParser;

impl Default for ReportParser {
    fn default() -> Self {
        Self
    }
}

impl ReportParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse CSV content into the flat item sequence, in row order.
    ///
    /// Fails when the file shape is unusable (no data rows, required
    /// columns missing). Rows whose score cell is not numeric are
    /// skipped with a warning and do not abort the parse; an output
    /// of zero items is therefore not an error here.
    pub fn parse_content(&self, content: &str) -> Result<Vec<ParsedItem>> {
        let lines: Vec<&str> = content.trim().split('\n').collect();
        if lines.len() < 2 {
            return Err(AppError::ParseError(
                "CSV must have a header row and at least one data row.".to_string(),
            ));
        }

        let headers: Vec<String> = lines[0]
            .trim()
            .split(',')
            .map(|h| h.trim().to_string())
            .collect();

        let area_col = find_column(&headers, AREA_KEYWORD);
        let question_col = find_column(&headers, QUESTION_KEYWORD);
        let score_col = find_column(&headers, SCORE_KEYWORD);
        let recommendation_col = find_column(&headers, RECOMMENDATION_KEYWORD);

        let (area_col, question_col, score_col) = match (area_col, question_col, score_col) {
            (Some(a), Some(q), Some(s)) => (a, q, s),
            _ => {
                return Err(AppError::ParseError(
                    "CSV must contain 'Assessment Area', 'Question', and 'Score' columns."
                        .to_string(),
                ))
            }
        };

        let mut items = Vec::new();

        for (index, line) in lines[1..].iter().enumerate() {
            let values: Vec<&str> = line.trim().split(',').map(|v| v.trim()).collect();
            // Short rows pad with empty fields; extras beyond the header are ignored
            let field = |col: usize| values.get(col).copied().unwrap_or("");

            let raw_score = field(score_col);
            let score = match parse_leading_float(raw_score) {
                Some(score) => score,
                None => {
                    warn!(
                        row = index + 1,
                        value = %raw_score,
                        "Invalid score, skipping row"
                    );
                    continue;
                }
            };

            let recommendation = match recommendation_col {
                Some(col) => {
                    let value = field(col);
                    if value.is_empty() {
                        None
                    } else {
                        Some(value.to_string())
                    }
                }
                None => None,
            };

            items.push(ParsedItem {
                assessment_area: field(area_col).to_string(),
                question: field(question_col).to_string(),
                score,
                recommendation,
            });
        }

        Ok(items)
    }
}

/// First header containing the keyword, case-insensitively
fn find_column(headers: &[String], keyword: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.to_lowercase().contains(keyword))
}

/// Parse the leading numeral of a string as f64, ignoring trailing
/// non-numeric content ("8.5 pts" -> 8.5). Returns None when no finite
/// number can be read.
fn parse_leading_float(value: &str) -> Option<f64> {
    let bytes = value.trim().as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }

    let mut mantissa_digits = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        mantissa_digits += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            mantissa_digits += 1;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }

    // Optional exponent; only consumed when it has at least one digit
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut cursor = end + 1;
        if cursor < bytes.len() && (bytes[cursor] == b'+' || bytes[cursor] == b'-') {
            cursor += 1;
        }
        let exponent_start = cursor;
        while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
            cursor += 1;
        }
        if cursor > exponent_start {
            end = cursor;
        }
    }

    value.trim()[..end]
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_CSV: &str = "\
Assessment Area,Question,Score
Algebra,Solve for x,8
Algebra,Factorize,5
Geometry,Area of circle,3";

    #[test]
    fn test_parse_valid_csv() {
        let items = ReportParser::new().parse_content(VALID_CSV).unwrap();

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].assessment_area, "Algebra");
        assert_eq!(items[0].question, "Solve for x");
        assert_eq!(items[0].score, 8.0);
        assert_eq!(items[2].assessment_area, "Geometry");
        assert_eq!(items[2].score, 3.0);
    }

    #[test]
    fn test_header_only_fails() {
        let err = ReportParser::new()
            .parse_content("Assessment Area,Question,Score")
            .unwrap_err();
        assert!(err.to_string().contains("header row and at least one data row"));
    }

    #[test]
    fn test_empty_input_fails() {
        assert!(ReportParser::new().parse_content("").is_err());
        assert!(ReportParser::new().parse_content("   \n  ").is_err());
    }

    #[test]
    fn test_missing_score_column_fails() {
        let csv = "Assessment Area,Question,Points\nAlgebra,Solve for x,8";
        let err = ReportParser::new().parse_content(csv).unwrap_err();
        assert!(err.to_string().contains("'Assessment Area', 'Question', and 'Score'"));
    }

    #[test]
    fn test_column_resolution_is_substring_and_case_insensitive() {
        let csv = "My ASSESSMENT AREA name,The Question Text,Final SCORE (out of 10)\nAlgebra,Q1,7";
        let items = ReportParser::new().parse_content(csv).unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].assessment_area, "Algebra");
        assert_eq!(items[0].question, "Q1");
        assert_eq!(items[0].score, 7.0);
    }

    #[test]
    fn test_first_matching_header_wins() {
        // Both trailing columns match "score"; the first one is used
        let csv = "Assessment Area,Question,Score,Max Score\nAlgebra,Q1,6,10";
        let items = ReportParser::new().parse_content(csv).unwrap();
        assert_eq!(items[0].score, 6.0);
    }

    #[test]
    fn test_non_numeric_score_row_is_skipped() {
        let csv = "Assessment Area,Question,Score\nA,Q1,10\nB,Q2,3\nA,Q3,xyz";
        let items = ReportParser::new().parse_content(csv).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].assessment_area, "A");
        assert_eq!(items[1].assessment_area, "B");
    }

    #[test]
    fn test_all_rows_skipped_is_not_an_error() {
        let csv = "Assessment Area,Question,Score\nA,Q1,abc\nB,Q2,-";
        let items = ReportParser::new().parse_content(csv).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_short_rows_pad_with_empty_fields() {
        let csv = "Assessment Area,Question,Score\nAlgebra,Q1,5\nGeometry";
        let items = ReportParser::new().parse_content(csv).unwrap();

        // The short row has an empty score cell, so it is skipped
        assert_eq!(items.len(), 1);

        let csv = "Question,Score,Assessment Area\nQ1,5";
        let items = ReportParser::new().parse_content(csv).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].assessment_area, "");
        assert_eq!(items[0].question, "Q1");
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let csv = "Assessment Area,Question,Score\nAlgebra,Q1,5,extra,fields";
        let items = ReportParser::new().parse_content(csv).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].score, 5.0);
    }

    #[test]
    fn test_values_are_trimmed() {
        let csv = "Assessment Area , Question , Score \n  Algebra ,  Solve for x ,  8  ";
        let items = ReportParser::new().parse_content(csv).unwrap();
        assert_eq!(items[0].assessment_area, "Algebra");
        assert_eq!(items[0].question, "Solve for x");
        assert_eq!(items[0].score, 8.0);
    }

    #[test]
    fn test_recommendation_column_absent_yields_none() {
        let items = ReportParser::new().parse_content(VALID_CSV).unwrap();
        assert!(items.iter().all(|i| i.recommendation.is_none()));
    }

    #[test]
    fn test_recommendation_column_present() {
        let csv = "\
Assessment Area,Question,Score,Recommendation
Algebra,Q1,3,Revise the basics
Algebra,Q2,9,";
        let items = ReportParser::new().parse_content(csv).unwrap();

        assert_eq!(items[0].recommendation.as_deref(), Some("Revise the basics"));
        // Empty cell maps to None even when the column exists
        assert_eq!(items[1].recommendation, None);
    }

    #[test]
    fn test_parse_leading_float_semantics() {
        assert_eq!(parse_leading_float("8"), Some(8.0));
        assert_eq!(parse_leading_float("8.5"), Some(8.5));
        assert_eq!(parse_leading_float("-2.25"), Some(-2.25));
        assert_eq!(parse_leading_float("8.5 pts"), Some(8.5));
        assert_eq!(parse_leading_float("7abc"), Some(7.0));
        assert_eq!(parse_leading_float(".5"), Some(0.5));
        assert_eq!(parse_leading_float("1e2"), Some(100.0));
        assert_eq!(parse_leading_float("1e"), Some(1.0));
        assert_eq!(parse_leading_float("xyz"), None);
        assert_eq!(parse_leading_float(""), None);
        assert_eq!(parse_leading_float("-"), None);
        assert_eq!(parse_leading_float("."), None);
        assert_eq!(parse_leading_float("e5"), None);
    }

    #[test]
    fn test_crlf_line_endings() {
        let csv = "Assessment Area,Question,Score\r\nAlgebra,Q1,5\r\nGeometry,Q2,7";
        let items = ReportParser::new().parse_content(csv).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].assessment_area, "Algebra");
        assert_eq!(items[1].score, 7.0);
    }
}
