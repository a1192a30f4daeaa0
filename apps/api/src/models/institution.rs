use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Read-only view of a voucher institution, joined with its review summary.
/// Columns are camelCase in the shared backend schema; the query aliases them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InstitutionRow {
    pub id: Uuid,
    pub center_name: String,
    pub address: String,
    pub introduction: String,
    pub primary_target_group: String,
    pub secondary_target_group: Option<String>,
    pub provided_services: Vec<String>,
    pub special_treatments: Vec<String>,
    pub counselor_count: i32,
    pub average_rating: f64,
    pub review_count: i32,
    pub can_provide_comprehensive_test: bool,
    pub can_provide_parent_counseling: bool,
}

impl InstitutionRow {
    /// All specialty-like descriptors of this institution, in a stable order.
    /// Target groups first, then services and special treatments.
    pub fn specialty_tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = vec![self.primary_target_group.as_str()];
        if let Some(secondary) = self.secondary_target_group.as_deref() {
            tags.push(secondary);
        }
        tags.extend(self.provided_services.iter().map(String::as_str));
        tags.extend(self.special_treatments.iter().map(String::as_str));
        tags
    }
}
