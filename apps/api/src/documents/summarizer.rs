//! LLM document summarization — expert-opinion style three-line summaries of
//! psychological reports and counsel documents.

use chrono::Utc;
use serde::Deserialize;
use tracing::warn;

use crate::documents::models::{DocumentSummary, SummarizeRequest};
use crate::errors::AppError;
use crate::llm_client::{LlmClient, LlmError};

const SUMMARIZE_SYSTEM: &str = "당신은 아동·청소년 심리평가 전문가입니다. \
    심리검사 보고서와 상담 문서를 전문가 소견 형태로 요약합니다. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

const SUMMARIZE_PROMPT_TEMPLATE: &str = r#"다음 {document_type} 내용을 분석하고 요약해주세요.

## 문서 내용:
{text}

Return a JSON object with this EXACT schema (no extra fields):
{
  "summary_lines": ["핵심 요약 1", "핵심 요약 2", "핵심 요약 3"],
  "expert_opinion": "전문가 소견 (2-3문장)",
  "key_findings": ["핵심 발견 사항"],
  "recommendations": ["권장 사항"],
  "confidence_score": 0.9
}

Rules:
- summary_lines: 정확히 3줄, 각 줄은 한 문장.
- expert_opinion: 임상적 관점의 종합 소견.
- key_findings: 문서에 실제로 근거가 있는 사항만.
- confidence_score: 문서의 정보량에 따른 요약 신뢰도 (0.0-1.0)."#;

/// Fields the LLM fills in; the rest of `DocumentSummary` is assembled here.
#[derive(Debug, Deserialize)]
struct SummaryPayload {
    summary_lines: Vec<String>,
    expert_opinion: String,
    key_findings: Vec<String>,
    #[serde(default)]
    recommendations: Vec<String>,
    confidence_score: f64,
}

pub async fn summarize(llm: &LlmClient, req: &SummarizeRequest) -> Result<DocumentSummary, AppError> {
    let text = match req.child_name.as_deref() {
        Some(name) if !name.trim().is_empty() => anonymize(&req.text_content, name),
        _ => req.text_content.clone(),
    };

    let prompt = SUMMARIZE_PROMPT_TEMPLATE
        .replace("{document_type}", req.document_type.label())
        .replace("{text}", &text);

    let payload: SummaryPayload =
        llm.call_json(&prompt, SUMMARIZE_SYSTEM)
            .await
            .map_err(|e| match e {
                LlmError::Parse(e) => {
                    warn!("summary payload failed schema parse: {e}");
                    AppError::MalformedAnalysis(e.to_string())
                }
                LlmError::EmptyContent => {
                    AppError::MalformedAnalysis("empty LLM response".to_string())
                }
                other => AppError::Llm(other.to_string()),
            })?;

    Ok(DocumentSummary {
        document_type: req.document_type,
        summary_lines: payload.summary_lines,
        expert_opinion: payload.expert_opinion,
        key_findings: payload.key_findings,
        recommendations: if req.include_recommendations {
            payload.recommendations
        } else {
            vec![]
        },
        confidence_score: payload.confidence_score.clamp(0.0, 1.0),
        generated_at: Utc::now(),
    })
}

/// Replaces the child's name with a neutral token before the text leaves the
/// service. Names shorter than 2 chars are left alone to avoid mangling text.
fn anonymize(text: &str, child_name: &str) -> String {
    let name = child_name.trim();
    if name.chars().count() < 2 {
        return text.to_string();
    }
    text.replace(name, "아동")
}
