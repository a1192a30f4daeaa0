// LLM prompt constants for the semantic analyzer.

/// System prompt for counsel-request analysis — enforces JSON-only output.
pub const ANALYZE_SYSTEM: &str = "당신은 아동·청소년 상담 전문가입니다. \
    상담 의뢰 내용을 분석하여 핵심 주제, 긴급도, 대상군을 추출해야 합니다. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Analysis prompt template. Replace `{counsel_text}` before sending.
pub const ANALYZE_PROMPT_TEMPLATE: &str = r#"다음 상담 의뢰 내용을 분석해주세요.

## 상담 의뢰 내용:
{counsel_text}

Return a JSON object with this EXACT schema (no extra fields):
{
  "topic_tags": ["ADHD", "집중력 부족"],
  "urgency": "moderate",
  "target_demographic": "초등 저학년 남아",
  "summary": "의뢰 내용의 핵심을 2-3문장으로 요약"
}

Rules:

TOPIC_TAGS: 상담이 필요한 핵심 문제 영역 (진단명, 증상, 치료 요구).
2-6개의 짧은 한국어 또는 영문 태그. 기관의 전문 분야와 대조되므로
일반적인 용어를 사용하세요 (예: "ADHD", "우울", "언어치료", "놀이치료").

URGENCY (pick exactly one):
- "low": 예방적·발달적 관심, 시급하지 않음
- "moderate": 일상 기능에 지장, 수 주 내 개입 권장
- "high": 자해·타해 위험, 급성 위기, 즉시 개입 필요

TARGET_DEMOGRAPHIC: 연령대와 역할을 담은 짧은 설명 (예: "7세 남아", "중학생 여아").

SUMMARY: 의뢰의 핵심 문제와 니즈를 전문가 시점에서 요약."#;
