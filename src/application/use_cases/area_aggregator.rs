// ============================================================
// AREA AGGREGATOR
// ============================================================
// Group parsed items by assessment area and compute per-area stats

use crate::domain::assessment::{AreaQuestion, AreaSummary, ParsedItem};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

#[derive(Default)]
struct AreaAccumulator {
    total_score: f64,
    questions: Vec<AreaQuestion>,
}

/// Group items by area and produce one summary per distinct area,
/// sorted by area name ascending (case-insensitive, ties broken by the
/// raw string). Question order inside each summary follows file order;
/// the final sort is the only reordering step.
pub fn aggregate(items: &[ParsedItem]) -> Vec<AreaSummary> {
    let mut groups: HashMap<String, AreaAccumulator> = HashMap::new();
    let mut first_seen: Vec<String> = Vec::new();

    for item in items {
        let accumulator = match groups.entry(item.assessment_area.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                first_seen.push(item.assessment_area.clone());
                entry.insert(AreaAccumulator::default())
            }
        };
        accumulator.total_score += item.score;
        accumulator.questions.push(AreaQuestion {
            question: item.question.clone(),
            score: item.score,
            recommendation: item.recommendation.clone(),
        });
    }

    let mut summaries: Vec<AreaSummary> = first_seen
        .into_iter()
        .map(|area| {
            let accumulator = groups.remove(&area).unwrap_or_default();
            let question_count = accumulator.questions.len();
            let average_score = if question_count > 0 {
                round2(accumulator.total_score / question_count as f64)
            } else {
                0.0
            };
            AreaSummary {
                area,
                total_score: accumulator.total_score,
                average_score,
                question_count,
                questions: accumulator.questions,
            }
        })
        .collect();

    summaries.sort_by(|a, b| {
        a.area
            .to_lowercase()
            .cmp(&b.area.to_lowercase())
            .then_with(|| a.area.cmp(&b.area))
    });

    summaries
}

/// Round to 2 decimal places; only the average is ever rounded
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
