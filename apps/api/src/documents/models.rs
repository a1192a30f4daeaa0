use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of document being processed; steers the summarization prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    #[default]
    KprcReport,
    CounselRequest,
    CounselReport,
    Other,
}

impl DocumentType {
    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::KprcReport => "KPRC 심리검사 보고서",
            DocumentType::CounselRequest => "상담 의뢰지",
            DocumentType::CounselReport => "상담 보고서",
            DocumentType::Other => "기타 문서",
        }
    }
}

fn default_include_recommendations() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummarizeRequest {
    pub text_content: String,
    #[serde(default)]
    pub document_type: DocumentType,
    /// When present, occurrences are anonymized before the text reaches the LLM.
    #[serde(default)]
    pub child_name: Option<String>,
    #[serde(default = "default_include_recommendations")]
    pub include_recommendations: bool,
}

/// Expert-opinion style summary produced by the LLM.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentSummary {
    pub document_type: DocumentType,
    pub summary_lines: Vec<String>,
    pub expert_opinion: String,
    pub key_findings: Vec<String>,
    pub recommendations: Vec<String>,
    pub confidence_score: f64,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub text: String,
    pub char_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_type_deserializes_snake_case() {
        let parsed: DocumentType = serde_json::from_str("\"kprc_report\"").unwrap();
        assert_eq!(parsed, DocumentType::KprcReport);
    }

    #[test]
    fn test_summarize_request_defaults() {
        let req: SummarizeRequest =
            serde_json::from_str(r#"{"text_content": "검사 결과 요약 대상 텍스트"}"#).unwrap();
        assert_eq!(req.document_type, DocumentType::KprcReport);
        assert!(req.include_recommendations);
        assert!(req.child_name.is_none());
    }
}
