use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;

/// Bounds on counsel-request text, in characters (the text is Korean, so
/// bytes would be the wrong unit).
pub const MIN_TEXT_CHARS: usize = 10;
pub const MAX_TEXT_CHARS: usize = 5_000;

/// A validated counseling request. Construction is the only validation point
/// in the pipeline; no collaborator is called before it succeeds.
#[derive(Debug, Clone)]
pub struct CounselRequest {
    text: String,
}

impl CounselRequest {
    pub fn new(raw: &str) -> Result<Self, AppError> {
        let text = raw.trim();
        let chars = text.chars().count();

        if chars < MIN_TEXT_CHARS {
            return Err(AppError::Validation(format!(
                "counsel_request_text must be at least {MIN_TEXT_CHARS} characters"
            )));
        }
        if chars > MAX_TEXT_CHARS {
            return Err(AppError::Validation(format!(
                "counsel_request_text must not exceed {MAX_TEXT_CHARS} characters"
            )));
        }

        Ok(Self {
            text: text.to_string(),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Urgency read from the counsel request. Drives the capacity signal in
/// scoring: urgent cases weight toward institutions with larger rosters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    #[default]
    Moderate,
    High,
}

/// Structured output of the LLM semantic analysis. Request-scoped, immutable,
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticProfile {
    pub topic_tags: Vec<String>,
    pub urgency: Urgency,
    pub target_demographic: String,
    pub summary: String,
}

/// One ranked institution with its composite score and justification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredRecommendation {
    pub institution_id: Uuid,
    pub center_name: String,
    /// Composite score in [0.0, 1.0], rounded to 4 decimal places.
    pub score: f64,
    pub reasoning: String,
    pub address: String,
    pub average_rating: f64,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationRequestDto {
    pub counsel_request_text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationResponse {
    /// Sorted descending by score; ties broken by rating then id.
    pub recommendations: Vec<ScoredRecommendation>,
    /// Size of the candidate pool considered, not of `recommendations`.
    pub total_institutions: usize,
    pub request_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_text_is_trimmed() {
        let request = CounselRequest::new("  7세 아들이 ADHD 진단을 받았습니다.  ").unwrap();
        assert_eq!(request.text(), "7세 아들이 ADHD 진단을 받았습니다.");
    }

    #[test]
    fn test_text_below_minimum_rejected() {
        let result = CounselRequest::new("너무 짧음");
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_whitespace_only_rejected() {
        assert!(CounselRequest::new("          \n\t ").is_err());
    }

    #[test]
    fn test_text_at_maximum_accepted() {
        let text = "가".repeat(MAX_TEXT_CHARS);
        assert!(CounselRequest::new(&text).is_ok());
    }

    #[test]
    fn test_text_over_maximum_rejected() {
        let text = "가".repeat(MAX_TEXT_CHARS + 1);
        assert!(matches!(
            CounselRequest::new(&text),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_bounds_count_chars_not_bytes() {
        // 10 Korean chars = 30 UTF-8 bytes; must pass the 10-char minimum.
        let text = "가".repeat(MIN_TEXT_CHARS);
        assert!(CounselRequest::new(&text).is_ok());
    }

    #[test]
    fn test_urgency_deserializes_lowercase() {
        let urgency: Urgency = serde_json::from_str("\"high\"").unwrap();
        assert_eq!(urgency, Urgency::High);
    }

    #[test]
    fn test_semantic_profile_deserializes_from_llm_shape() {
        let json = r#"{
            "topic_tags": ["ADHD", "집중력"],
            "urgency": "moderate",
            "target_demographic": "초등 저학년 남아",
            "summary": "ADHD 진단을 받은 7세 아동의 상담 의뢰"
        }"#;
        let profile: SemanticProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.topic_tags.len(), 2);
        assert_eq!(profile.urgency, Urgency::Moderate);
    }
}
