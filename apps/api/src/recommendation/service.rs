//! Recommendation Service — orchestrates the pipeline in strict sequence:
//! validate → analyze → retrieve → score → truncate → package.
//!
//! Stateless: nothing is held between requests, so concurrent independent
//! requests are safe by construction.

use tracing::info;

use crate::config::Config;
use crate::errors::AppError;
use crate::recommendation::analyzer::SemanticAnalyzer;
use crate::recommendation::models::{CounselRequest, RecommendationResponse};
use crate::recommendation::repository::InstitutionSource;
use crate::recommendation::scoring::{score_institutions, ScoringWeights};

/// Runs the full pipeline for one counsel request.
///
/// Validation happens before either collaborator is touched. When
/// `narrow_retrieval_by_tags` is off (the default) the LLM call and the
/// candidate fetch have no data dependency and run joined; when it is on,
/// the analyzer's topic tags narrow the query, which forces the sequential
/// order. A collaborator failure propagates as its classified error; a
/// legitimate zero-match result is an empty list with a populated pool count.
pub async fn recommend(
    analyzer: &dyn SemanticAnalyzer,
    institutions: &dyn InstitutionSource,
    config: &Config,
    raw_text: &str,
) -> Result<RecommendationResponse, AppError> {
    let request = CounselRequest::new(raw_text)?;

    let (profile, pool) = if config.narrow_retrieval_by_tags {
        let profile = analyzer.analyze(request.text()).await?;
        let pool = institutions.fetch(Some(&profile.topic_tags)).await?;
        (profile, pool)
    } else {
        tokio::try_join!(analyzer.analyze(request.text()), institutions.fetch(None))?
    };

    info!(
        candidates = pool.len(),
        tags = ?profile.topic_tags,
        urgency = ?profile.urgency,
        "scoring candidate pool"
    );

    let recommendations = score_institutions(
        &profile,
        &pool,
        &ScoringWeights::from_config(config),
        config.min_score_threshold,
        config.max_recommendations,
    );

    Ok(RecommendationResponse {
        recommendations,
        total_institutions: pool.len(),
        request_text: request.text().to_string(),
    })
}
