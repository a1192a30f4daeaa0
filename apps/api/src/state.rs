use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::recommendation::analyzer::SemanticAnalyzer;
use crate::recommendation::repository::InstitutionSource;

/// Shared application state injected into all route handlers via Axum extractors.
/// The connection pool lives inside the institution source; handlers never
/// touch the database directly.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    /// Plain client for the Gotenberg conversion proxy.
    pub http: reqwest::Client,
    pub config: Config,
    /// Analyzer seam: LLM-backed in production, stubbed in tests.
    pub analyzer: Arc<dyn SemanticAnalyzer>,
    /// Candidate-pool seam: Postgres-backed in production, stubbed in tests.
    pub institutions: Arc<dyn InstitutionSource>,
}
