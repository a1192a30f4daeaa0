//! Semantic analyzer — one LLM round trip turning raw counsel text into a
//! structured `SemanticProfile`.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::errors::AppError;
use crate::llm_client::{LlmClient, LlmError};
use crate::recommendation::models::SemanticProfile;
use crate::recommendation::prompts::{ANALYZE_PROMPT_TEMPLATE, ANALYZE_SYSTEM};

/// Retries after the first timeout or unparseable response, then surfaces.
const MAX_ANALYSIS_ATTEMPTS: u32 = 2;

/// The analyzer seam. The production impl calls the LLM; tests substitute
/// stubs to verify orchestration without network access.
#[async_trait]
pub trait SemanticAnalyzer: Send + Sync {
    async fn analyze(&self, counsel_text: &str) -> Result<SemanticProfile, AppError>;
}

pub struct LlmSemanticAnalyzer {
    llm: LlmClient,
    timeout: Duration,
}

impl LlmSemanticAnalyzer {
    pub fn new(llm: LlmClient, timeout: Duration) -> Self {
        Self { llm, timeout }
    }
}

#[async_trait]
impl SemanticAnalyzer for LlmSemanticAnalyzer {
    async fn analyze(&self, counsel_text: &str) -> Result<SemanticProfile, AppError> {
        let prompt = ANALYZE_PROMPT_TEMPLATE.replace("{counsel_text}", counsel_text);

        analyze_with_retry(self.timeout, || {
            self.llm.call_json::<SemanticProfile>(&prompt, ANALYZE_SYSTEM)
        })
        .await
    }
}

/// The retry loop, factored out of the client so the policy is testable:
/// timeouts and unparseable responses get one retry, everything else
/// surfaces immediately (transport and API failures already went through the
/// LLM client's own backoff).
async fn analyze_with_retry<F, Fut>(timeout: Duration, mut call: F) -> Result<SemanticProfile, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<SemanticProfile, LlmError>>,
{
    let mut last_error: Option<AppError> = None;

    for attempt in 1..=MAX_ANALYSIS_ATTEMPTS {
        match tokio::time::timeout(timeout, call()).await {
            Ok(Ok(profile)) => return Ok(profile),
            Ok(Err(LlmError::Parse(e))) => {
                warn!("analysis attempt {attempt}: unparseable profile: {e}");
                last_error = Some(AppError::MalformedAnalysis(e.to_string()));
            }
            Ok(Err(LlmError::EmptyContent)) => {
                warn!("analysis attempt {attempt}: empty content");
                last_error = Some(AppError::MalformedAnalysis("empty LLM response".to_string()));
            }
            Ok(Err(e)) => return Err(AppError::Llm(e.to_string())),
            Err(_) => {
                warn!(
                    "analysis attempt {attempt}: timed out after {}s",
                    timeout.as_secs()
                );
                last_error = Some(AppError::AnalysisTimeout(timeout.as_secs()));
            }
        }
    }

    Err(last_error
        .unwrap_or_else(|| AppError::MalformedAnalysis("analysis produced no result".into())))
}
