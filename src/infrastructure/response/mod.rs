use once_cell::sync::Lazy;
use regex::Regex;

static THINK_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<think>[\s\S]*?</think>|<think\s*/>").unwrap());

static REASONING_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<reasoning>[\s\S]*?</reasoning>").unwrap());

/// Removes reasoning artifacts some models wrap around their answer
pub fn clean_llm_response(response: &str) -> String {
    let cleaned = THINK_TAG_PATTERN.replace_all(response, "");
    let cleaned = REASONING_TAG_PATTERN.replace_all(&cleaned, "");
    cleaned.trim().to_string()
}

/// Extract the JSON object from a model reply: strips reasoning tags
/// and code fences, then slices from the first '{' to the last '}'.
/// Returns an empty string when no object is present.
pub fn extract_json_payload(output: &str) -> String {
    let cleaned = clean_llm_response(output);
    let unfenced = strip_code_fence(&cleaned);

    match (unfenced.find('{'), unfenced.rfind('}')) {
        (Some(start), Some(end)) if start < end => unfenced[start..=end].to_string(),
        _ => String::new(),
    }
}

fn strip_code_fence(value: &str) -> String {
    let trimmed = value.trim();
    if let Some(stripped) = trimmed.strip_prefix("```json") {
        return stripped.trim().trim_end_matches("```").trim().to_string();
    }
    if let Some(stripped) = trimmed.strip_prefix("```") {
        return stripped.trim().trim_end_matches("```").trim().to_string();
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_think_tags() {
        let input = "<think>Some reasoning here</think>The actual response";
        assert_eq!(clean_llm_response(input), "The actual response");
    }

    #[test]
    fn test_clean_reasoning_tags() {
        let input = "<reasoning>Internal reasoning</reasoning>Final answer";
        assert_eq!(clean_llm_response(input), "Final answer");
    }

    #[test]
    fn test_clean_preserves_normal_text() {
        let input = "A normal response without any special tags.";
        assert_eq!(clean_llm_response(input), input);
    }

    #[test]
    fn test_extract_plain_json() {
        assert_eq!(extract_json_payload(r#"{"a": 1}"#), r#"{"a": 1}"#);
    }

    #[test]
    fn test_extract_fenced_json() {
        let input = "```json\n{\"a\": 1}\n```";
        assert_eq!(extract_json_payload(input), "{\"a\": 1}");
    }

    #[test]
    fn test_extract_json_with_surrounding_prose() {
        let input = "Here is the result:\n{\"a\": 1}\nHope that helps!";
        assert_eq!(extract_json_payload(input), "{\"a\": 1}");
    }

    #[test]
    fn test_extract_json_after_think_tag() {
        let input = "<think>hmm</think>```json\n{\"a\": 1}\n```";
        assert_eq!(extract_json_payload(input), "{\"a\": 1}");
    }

    #[test]
    fn test_extract_without_json_is_empty() {
        assert_eq!(extract_json_payload("no object here"), "");
        assert_eq!(extract_json_payload(""), "");
    }
}
