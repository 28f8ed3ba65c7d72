// ============================================================
// RECOMMENDATION SERVICE
// ============================================================
// Per-area AI recommendation requests with a keyed state cache.
// Each area is fetched independently; a failure stays scoped to
// its own area and can be retried.

use crate::domain::assessment::{
    AreaRecommendations, QuestionScore, RecommendationItem, ScoreBand,
};
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;
use crate::infrastructure::llm_clients::LLMClient;
use crate::infrastructure::response::extract_json_payload;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::warn;

const SATISFACTORY_AREA_COMMENT: &str =
    "Performance in this area is satisfactory. Focus on maintaining this level of understanding.";

const SATISFACTORY_QUESTION_TEXT: &str =
    "Performance is satisfactory for this question. Focus on maintaining this understanding.";

const FALLBACK_RECOMMENDATION: &str = "No specific recommendation generated.";

/// One area's worth of context sent to the collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    pub area: String,
    pub average_score: f64,
    pub questions: Vec<QuestionScore>,
}

/// Lifecycle of one area's recommendation fetch
#[derive(Debug, Clone)]
pub enum AreaRecommendationState {
    NotRequested,
    Pending,
    Succeeded(AreaRecommendations),
    Failed(String),
}

pub struct RecommendationService {
    llm_client: Arc<dyn LLMClient + Send + Sync>,
    config: LLMConfig,
    states: Mutex<HashMap<String, AreaRecommendationState>>,
}

impl RecommendationService {
    pub fn new(llm_client: Arc<dyn LLMClient + Send + Sync>, config: LLMConfig) -> Self {
        Self {
            llm_client,
            config,
            states: Mutex::new(HashMap::new()),
        }
    }

    /// Fetch recommendations for one area.
    ///
    /// A previously succeeded area returns the cached result without a
    /// new model call; a concurrent in-flight fetch for the same area
    /// is rejected; a failed area is fetched again.
    pub async fn fetch_for_area(
        &self,
        request: &RecommendationRequest,
    ) -> Result<AreaRecommendations> {
        if request.questions.is_empty() {
            return Err(AppError::ValidationError(
                "No questions provided for this area.".to_string(),
            ));
        }

        {
            let mut states = self.states.lock().unwrap();
            match states.get(&request.area) {
                Some(AreaRecommendationState::Succeeded(data)) => return Ok(data.clone()),
                Some(AreaRecommendationState::Pending) => {
                    return Err(AppError::ValidationError(format!(
                        "Recommendations for '{}' are already being generated.",
                        request.area
                    )));
                }
                _ => {}
            }
            states.insert(request.area.clone(), AreaRecommendationState::Pending);
        }

        // Good areas get a static satisfactory response without a model call
        let result = if ScoreBand::for_score(request.average_score) == ScoreBand::Good {
            Ok(satisfactory_recommendations(request))
        } else {
            self.generate(request).await
        };

        let mut states = self.states.lock().unwrap();
        match &result {
            Ok(data) => {
                states.insert(
                    request.area.clone(),
                    AreaRecommendationState::Succeeded(data.clone()),
                );
            }
            Err(err) => {
                warn!(area = %request.area, error = %err, "Recommendation fetch failed");
                states.insert(
                    request.area.clone(),
                    AreaRecommendationState::Failed(err.to_string()),
                );
            }
        }

        result
    }

    pub fn state_for_area(&self, area: &str) -> AreaRecommendationState {
        self.states
            .lock()
            .unwrap()
            .get(area)
            .cloned()
            .unwrap_or(AreaRecommendationState::NotRequested)
    }

    /// Drop all cached outcomes. Called when a new file is uploaded,
    /// since the cache is scoped to one report's lifetime.
    pub fn clear(&self) {
        self.states.lock().unwrap().clear();
    }

    async fn generate(&self, request: &RecommendationRequest) -> Result<AreaRecommendations> {
        let raw = self
            .llm_client
            .generate(&self.config, SYSTEM_PROMPT, &build_prompt(request))
            .await?;
        parse_recommendations(&raw, request.questions.len())
    }
}

const SYSTEM_PROMPT: &str = "You are an expert educational consultant. Your task is to provide feedback and actionable recommendations for an assessment area based on individual question scores and the overall average score for that area.\n\nRespond with ONLY a JSON object of the shape {\"overallComment\": string, \"recommendations\": [{\"question\": string, \"score\": number, \"recommendationText\": string}]}. Do not include any explanations or markdown fences around the output.";

fn build_prompt(request: &RecommendationRequest) -> String {
    let mut question_lines = String::new();
    for pair in &request.questions {
        question_lines.push_str(&format!(
            "- Question: \"{}\"\n  Score: {} / 10\n",
            pair.question, pair.score
        ));
    }

    format!(
        "Assessment Area: {area}\n\
         Average Score for this Area: {average} / 10\n\n\
         Questions and Scores:\n\
         {questions}\n\
         Instructions:\n\
         1. First, provide an 'overallComment' based on the average score for the '{area}' area.\n\
            - If the average score is less than 4: indicate that this area needs significant attention and improvement. Be empathetic but clear.\n\
            - If the average score is between 4 (inclusive) and 7 (exclusive): suggest that while there's a basic understanding, there are clear areas for growth and consolidation.\n\
            - If the average score is 7 or above: acknowledge good performance and suggest maintaining this level or exploring advanced topics if applicable.\n\
         2. Then, for each question, provide a 'recommendationText' entry in the 'recommendations' array.\n\
            - For questions with a score less than 4: provide a specific, actionable recommendation to improve understanding or performance related to that question. Focus on foundational concepts, suggest resources, or identify common pitfalls.\n\
            - For questions with a score between 4 (inclusive) and 7 (exclusive): provide a suggestion for reinforcement, targeted practice, or deeper exploration of the topic.\n\
            - For questions with a score of 7 or above: state \"{satisfactory}\" or a similar positive remark. The recommendationText must not be empty.\n\
         3. Keep recommendations constructive, concise, and directly related to the question content where possible.\n\
         4. You MUST generate a recommendationText for EVERY question provided in the input.\n",
        area = request.area,
        average = request.average_score,
        questions = question_lines,
        satisfactory = SATISFACTORY_QUESTION_TEXT,
    )
}

fn satisfactory_recommendations(request: &RecommendationRequest) -> AreaRecommendations {
    AreaRecommendations {
        overall_comment: SATISFACTORY_AREA_COMMENT.to_string(),
        recommendations: request
            .questions
            .iter()
            .map(|pair| RecommendationItem {
                question: pair.question.clone(),
                score: pair.score,
                recommendation_text: SATISFACTORY_QUESTION_TEXT.to_string(),
            })
            .collect(),
    }
}

/// Validate and repair the collaborator's raw reply: the output must be
/// a JSON object with exactly one recommendation per input question;
/// blank recommendation texts are replaced with a fixed fallback.
fn parse_recommendations(raw: &str, question_count: usize) -> Result<AreaRecommendations> {
    let payload = extract_json_payload(raw);
    if payload.is_empty() {
        return Err(AppError::LLMError(
            "The AI model did not return a valid output.".to_string(),
        ));
    }

    let mut output: AreaRecommendations = serde_json::from_str(&payload).map_err(|_| {
        AppError::LLMError("The AI model did not return a valid output.".to_string())
    })?;

    if output.recommendations.len() != question_count {
        return Err(AppError::LLMError(
            "Mismatch between input questions and output recommendations count.".to_string(),
        ));
    }

    for item in &mut output.recommendations {
        if item.recommendation_text.trim().is_empty() {
            item.recommendation_text = FALLBACK_RECOMMENDATION.to_string();
        }
    }

    Ok(output)
}
