// ============================================================
// ASSESSMENT DOMAIN TYPES
// ============================================================
// Data structures for parsed CSV rows, per-area aggregates and
// AI-generated recommendations. No I/O, no async.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One validated question/score record extracted from a CSV data row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedItem {
    /// Grouping key (trimmed, as it appeared in the file)
    pub assessment_area: String,

    /// Question text; may be empty
    pub question: String,

    /// Parsed numeric score; rows without one never become items
    pub score: f64,

    /// Value of the optional recommendation column, None when the
    /// column is absent or the cell is empty
    pub recommendation: Option<String>,
}

/// A question retained inside an area summary, in original file order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaQuestion {
    pub question: String,
    pub score: f64,
    pub recommendation: Option<String>,
}

/// Aggregated statistics for one assessment area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaSummary {
    /// Unique across the output sequence
    pub area: String,

    /// Exact sum of member scores, never rounded
    pub total_score: f64,

    /// total_score / question_count, rounded to 2 decimal places
    pub average_score: f64,

    pub question_count: usize,

    /// Member questions, preserving original row order within the area
    pub questions: Vec<AreaQuestion>,
}

/// Combined output of one parse + aggregate invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentReport {
    pub items: Vec<ParsedItem>,
    pub areas: Vec<AreaSummary>,
    pub generated_at: DateTime<Utc>,
}

/// A question/score pair sent to the recommendation collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionScore {
    pub question: String,
    pub score: f64,
}

/// One per-question recommendation returned by the collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationItem {
    pub question: String,
    pub score: f64,
    pub recommendation_text: String,
}

/// Collaborator output for one assessment area
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaRecommendations {
    pub overall_comment: String,
    pub recommendations: Vec<RecommendationItem>,
}

/// Three-way score classification used for presentation and for the
/// satisfactory-area short-circuit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    NeedsImprovement,
    ReviewSuggested,
    Good,
}

impl ScoreBand {
    /// Scores below 4 need improvement, below 7 suggest review,
    /// 7 and above are good
    pub fn for_score(score: f64) -> Self {
        if score < 4.0 {
            ScoreBand::NeedsImprovement
        } else if score < 7.0 {
            ScoreBand::ReviewSuggested
        } else {
            ScoreBand::Good
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::NeedsImprovement => "Needs Improvement",
            ScoreBand::ReviewSuggested => "Review Suggested",
            ScoreBand::Good => "Good",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_band_thresholds() {
        assert_eq!(ScoreBand::for_score(0.0), ScoreBand::NeedsImprovement);
        assert_eq!(ScoreBand::for_score(3.99), ScoreBand::NeedsImprovement);
        assert_eq!(ScoreBand::for_score(4.0), ScoreBand::ReviewSuggested);
        assert_eq!(ScoreBand::for_score(6.99), ScoreBand::ReviewSuggested);
        assert_eq!(ScoreBand::for_score(7.0), ScoreBand::Good);
        assert_eq!(ScoreBand::for_score(10.0), ScoreBand::Good);
    }

    #[test]
    fn test_parsed_item_serializes_camel_case() {
        let item = ParsedItem {
            assessment_area: "Algebra".to_string(),
            question: "Solve for x".to_string(),
            score: 8.0,
            recommendation: None,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["assessmentArea"], "Algebra");
        assert!(json["recommendation"].is_null());
    }
}
