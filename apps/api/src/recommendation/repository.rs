//! Institution repository — read-only candidate retrieval from the shared
//! backend database. Fetched fresh per request; deliberately uncached.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::error;

use crate::errors::AppError;
use crate::models::institution::InstitutionRow;

/// Candidate-pool seam. The production impl reads Postgres; tests substitute
/// in-memory pools.
#[async_trait]
pub trait InstitutionSource: Send + Sync {
    /// Returns the candidate pool, optionally narrowed by specialty tags.
    /// `None` (the default mode) fetches every visible institution.
    async fn fetch(
        &self,
        specialty_filter: Option<&[String]>,
    ) -> Result<Vec<InstitutionRow>, AppError>;
}

const SELECT_INSTITUTIONS: &str = r#"
SELECT
    vi.id,
    vi."centerName" AS center_name,
    vi.address,
    vi.introduction,
    vi."primaryTargetGroup" AS primary_target_group,
    vi."secondaryTargetGroup" AS secondary_target_group,
    vi."providedServices"::text[] AS provided_services,
    vi."specialTreatments"::text[] AS special_treatments,
    vi."counselorCount" AS counselor_count,
    vi."averageRating"::float8 AS average_rating,
    vi."reviewCount" AS review_count,
    vi."canProvideComprehensiveTest" AS can_provide_comprehensive_test,
    vi."canProvideParentCounseling" AS can_provide_parent_counseling
FROM voucher_institutions vi
"#;

pub struct PgInstitutionSource {
    pool: PgPool,
}

impl PgInstitutionSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InstitutionSource for PgInstitutionSource {
    async fn fetch(
        &self,
        specialty_filter: Option<&[String]>,
    ) -> Result<Vec<InstitutionRow>, AppError> {
        let result = match specialty_filter.filter(|tags| !tags.is_empty()) {
            Some(tags) => {
                // ILIKE ANY over target groups: narrowing is best-effort and
                // the scorer re-checks overlap, so loose matching is fine.
                let patterns: Vec<String> =
                    tags.iter().map(|t| format!("%{}%", t.trim())).collect();
                sqlx::query_as::<_, InstitutionRow>(&format!(
                    "{SELECT_INSTITUTIONS} WHERE vi.\"primaryTargetGroup\" ILIKE ANY($1) \
                     OR vi.\"secondaryTargetGroup\" ILIKE ANY($1) ORDER BY vi.id"
                ))
                .bind(&patterns)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, InstitutionRow>(&format!(
                    "{SELECT_INSTITUTIONS} ORDER BY vi.id"
                ))
                .fetch_all(&self.pool)
                .await
            }
        };

        result.map_err(|e| {
            error!("institution query failed: {e}");
            AppError::DataUnavailable(e.to_string())
        })
    }
}
