use anyhow::{bail, Context, Result};

/// Application configuration loaded from environment variables.
/// Required variables fail startup; everything else has a default.
#[derive(Debug, Clone)]
pub struct Config {
    /// Connection string for the shared backend database. The credentials
    /// provisioned for this service are read-only; no code path writes.
    pub database_url: String,
    pub openai_api_key: String,
    pub openai_model: String,
    /// Shared secret checked on every non-health endpoint (x-internal-secret).
    pub internal_api_secret: String,
    pub gotenberg_url: String,
    pub port: u16,
    /// Upper bound on one semantic-analysis round trip, in seconds.
    pub analysis_timeout_secs: u64,
    pub max_recommendations: usize,
    pub weight_specialty: f64,
    pub weight_rating: f64,
    pub weight_urgency: f64,
    /// Institutions with no specialty overlap below this composite score
    /// are dropped from the result instead of padding the tail.
    pub min_score_threshold: f64,
    /// When set, the candidate query is narrowed by the analyzer's topic
    /// tags and the two upstream calls run sequentially instead of joined.
    pub narrow_retrieval_by_tags: bool,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let config = Config {
            database_url: require_env("DATABASE_URL")?,
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_model: env_or("OPENAI_MODEL", "gpt-4o-mini"),
            internal_api_secret: require_env("INTERNAL_API_SECRET")?,
            gotenberg_url: env_or("GOTENBERG_URL", "http://localhost:3000")
                .trim_end_matches('/')
                .to_string(),
            port: parse_env("PORT", 8080)?,
            analysis_timeout_secs: parse_env("ANALYSIS_TIMEOUT_SECS", 20)?,
            max_recommendations: parse_env("MAX_RECOMMENDATIONS", 5)?,
            weight_specialty: parse_env("WEIGHT_SPECIALTY", 0.55)?,
            weight_rating: parse_env("WEIGHT_RATING", 0.25)?,
            weight_urgency: parse_env("WEIGHT_URGENCY", 0.20)?,
            min_score_threshold: parse_env("MIN_SCORE_THRESHOLD", 0.35)?,
            narrow_retrieval_by_tags: parse_env("NARROW_RETRIEVAL_BY_TAGS", false)?,
            rust_log: env_or("RUST_LOG", "info"),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.max_recommendations == 0 || self.max_recommendations > 10 {
            bail!("MAX_RECOMMENDATIONS must be between 1 and 10");
        }
        let weight_sum = self.weight_specialty + self.weight_rating + self.weight_urgency;
        if weight_sum <= 0.0 {
            bail!("scoring weights must sum to a positive value");
        }
        if !(0.0..=1.0).contains(&self.min_score_threshold) {
            bail!("MIN_SCORE_THRESHOLD must be within 0.0..=1.0");
        }
        Ok(())
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("'{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

/// Config fixture for unit tests across the crate.
#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/unused".to_string(),
        openai_api_key: "test-key".to_string(),
        openai_model: "gpt-4o-mini".to_string(),
        internal_api_secret: "secret".to_string(),
        gotenberg_url: "http://localhost:3000".to_string(),
        port: 8080,
        analysis_timeout_secs: 20,
        max_recommendations: 5,
        weight_specialty: 0.55,
        weight_rating: 0.25,
        weight_urgency: 0.20,
        min_score_threshold: 0.35,
        narrow_retrieval_by_tags: false,
        rust_log: "info".to_string(),
    }
}
