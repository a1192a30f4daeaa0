//! Scoring Engine — pure, deterministic ranking of the candidate pool
//! against a semantic profile.
//!
//! No LLM call and no I/O: identical (profile, pool) inputs always produce
//! byte-identical output, which keeps golden-output tests possible.

use std::cmp::Ordering;

use crate::config::Config;
use crate::models::institution::InstitutionRow;
use crate::recommendation::models::{ScoredRecommendation, SemanticProfile, Urgency};

// ────────────────────────────────────────────────────────────────────────────
// Weights
// ────────────────────────────────────────────────────────────────────────────

/// Relative weights of the three composite-score signals. Tunable via env,
/// normalized by their sum so they need not add up to 1.0.
#[derive(Debug, Clone, Copy)]
pub struct ScoringWeights {
    pub specialty: f64,
    pub rating: f64,
    pub urgency: f64,
}

impl ScoringWeights {
    pub fn from_config(config: &Config) -> Self {
        Self {
            specialty: config.weight_specialty,
            rating: config.weight_rating,
            urgency: config.weight_urgency,
        }
    }

    fn sum(&self) -> f64 {
        self.specialty + self.rating + self.urgency
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Match strengths (mirrors the tag/text two-tier matching used elsewhere)
// ────────────────────────────────────────────────────────────────────────────

const TAG_MATCH_STRENGTH: f64 = 1.0;
const TEXT_MATCH_STRENGTH: f64 = 0.6;

/// Rosters at or above this size count as full capacity for urgent intake.
const FULL_CAPACITY_COUNSELORS: f64 = 10.0;

// ────────────────────────────────────────────────────────────────────────────
// Entry point
// ────────────────────────────────────────────────────────────────────────────

/// Ranks `pool` against `profile`: composite score per institution, zero-
/// overlap low scorers excluded, sorted descending with deterministic
/// tie-breaking (rating desc, then id asc), capped at `max_results`.
///
/// An empty pool yields an empty list, not an error.
pub fn score_institutions(
    profile: &SemanticProfile,
    pool: &[InstitutionRow],
    weights: &ScoringWeights,
    min_score: f64,
    max_results: usize,
) -> Vec<ScoredRecommendation> {
    let mut scored: Vec<ScoredRecommendation> = pool
        .iter()
        .filter_map(|row| score_one(profile, row, weights, min_score))
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then(
                b.average_rating
                    .partial_cmp(&a.average_rating)
                    .unwrap_or(Ordering::Equal),
            )
            .then(a.institution_id.cmp(&b.institution_id))
    });

    scored.truncate(max_results);
    scored
}

fn score_one(
    profile: &SemanticProfile,
    row: &InstitutionRow,
    weights: &ScoringWeights,
    min_score: f64,
) -> Option<ScoredRecommendation> {
    let (specialty_signal, matched_tags) = specialty_overlap(profile, row);
    let rating_signal = (row.average_rating / 5.0).clamp(0.0, 1.0);
    let urgency_signal = urgency_match(profile.urgency, row.counselor_count);

    let composite = (weights.specialty * specialty_signal
        + weights.rating * rating_signal
        + weights.urgency * urgency_signal)
        / weights.sum();
    let score = round_score(composite.clamp(0.0, 1.0));

    // Zero-overlap institutions below the floor are dropped entirely rather
    // than padded in with a near-zero score.
    if matched_tags.is_empty() && score < min_score {
        return None;
    }

    Some(ScoredRecommendation {
        institution_id: row.id,
        center_name: row.center_name.clone(),
        score,
        reasoning: build_reasoning(profile, row, &matched_tags),
        address: row.address.clone(),
        average_rating: row.average_rating,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Signals
// ────────────────────────────────────────────────────────────────────────────

/// Tag overlap between the profile's topic tags and the institution.
/// Per profile tag: specialty-tag containment match counts 1.0, an
/// introduction substring match 0.6, otherwise 0. The signal is the mean
/// over all profile tags; the matched tags are kept for the reasoning text.
fn specialty_overlap(profile: &SemanticProfile, row: &InstitutionRow) -> (f64, Vec<String>) {
    if profile.topic_tags.is_empty() {
        return (0.0, vec![]);
    }

    let introduction_lower = row.introduction.to_lowercase();
    let specialty_tags: Vec<String> = row
        .specialty_tags()
        .iter()
        .map(|t| t.to_lowercase())
        .collect();

    let mut total = 0.0;
    let mut matched = Vec::new();

    for tag in &profile.topic_tags {
        let tag_lower = tag.trim().to_lowercase();
        if tag_lower.is_empty() {
            continue;
        }

        let tag_hit = specialty_tags
            .iter()
            .any(|s| s == &tag_lower || s.contains(&tag_lower) || tag_lower.contains(s.as_str()));
        let text_hit = introduction_lower.contains(&tag_lower);

        let strength = if tag_hit {
            TAG_MATCH_STRENGTH
        } else if text_hit {
            TEXT_MATCH_STRENGTH
        } else {
            0.0
        };

        if strength > 0.0 {
            matched.push(tag.trim().to_string());
        }
        total += strength;
    }

    (total / profile.topic_tags.len() as f64, matched)
}

/// Capacity signal: urgent cases weight toward institutions with more
/// counselors; for non-urgent cases roster size matters less or not at all.
fn urgency_match(urgency: Urgency, counselor_count: i32) -> f64 {
    let capacity = (counselor_count.max(0) as f64 / FULL_CAPACITY_COUNSELORS).min(1.0);
    match urgency {
        Urgency::Low => 1.0,
        Urgency::Moderate => 0.5 + capacity / 2.0,
        Urgency::High => capacity,
    }
}

fn round_score(score: f64) -> f64 {
    (score * 10_000.0).round() / 10_000.0
}

// ────────────────────────────────────────────────────────────────────────────
// Reasoning text (deterministic function of the same inputs)
// ────────────────────────────────────────────────────────────────────────────

fn build_reasoning(profile: &SemanticProfile, row: &InstitutionRow, matched: &[String]) -> String {
    let mut parts: Vec<String> = Vec::new();

    if matched.is_empty() {
        parts.push("직접 일치하는 전문 분야는 없으나 전반적인 평가가 우수합니다.".to_string());
    } else {
        parts.push(format!(
            "의뢰 내용의 {} 영역과 기관의 전문 분야가 일치합니다.",
            matched.join(", ")
        ));
    }

    parts.push(format!(
        "평균 별점 {:.1}/5.0 (리뷰 {}개).",
        row.average_rating, row.review_count
    ));

    if profile.urgency == Urgency::High {
        parts.push(format!(
            "상담사 {}명이 근무하여 긴급 개입 여력이 있습니다.",
            row.counselor_count
        ));
    }

    if row.can_provide_comprehensive_test {
        parts.push("종합심리검사를 제공합니다.".to_string());
    }

    parts.join(" ")
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn weights() -> ScoringWeights {
        ScoringWeights {
            specialty: 0.55,
            rating: 0.25,
            urgency: 0.20,
        }
    }

    fn uuid_n(n: u8) -> Uuid {
        Uuid::from_bytes([n; 16])
    }

    fn make_profile(tags: &[&str], urgency: Urgency) -> SemanticProfile {
        SemanticProfile {
            topic_tags: tags.iter().map(|t| t.to_string()).collect(),
            urgency,
            target_demographic: "7세 남아".to_string(),
            summary: "ADHD 진단을 받은 아동의 상담 의뢰".to_string(),
        }
    }

    fn make_row(
        id: Uuid,
        center_name: &str,
        primary_target: &str,
        rating: f64,
        counselors: i32,
    ) -> InstitutionRow {
        InstitutionRow {
            id,
            center_name: center_name.to_string(),
            address: "서울시 강남구".to_string(),
            introduction: format!("{primary_target} 전문 상담 센터"),
            primary_target_group: primary_target.to_string(),
            secondary_target_group: None,
            provided_services: vec!["COUNSELING".to_string()],
            special_treatments: vec![],
            counselor_count: counselors,
            average_rating: rating,
            review_count: 80,
            can_provide_comprehensive_test: false,
            can_provide_parent_counseling: true,
        }
    }

    #[test]
    fn test_empty_pool_returns_empty_list() {
        let profile = make_profile(&["ADHD"], Urgency::Moderate);
        let result = score_institutions(&profile, &[], &weights(), 0.35, 5);
        assert!(result.is_empty());
    }

    #[test]
    fn test_scores_sorted_descending() {
        let profile = make_profile(&["ADHD"], Urgency::Moderate);
        let pool = vec![
            make_row(uuid_n(1), "무관 센터", "우울증", 4.9, 5),
            make_row(uuid_n(2), "ADHD 센터", "ADHD", 4.2, 5),
        ];
        let result = score_institutions(&profile, &pool, &weights(), 0.0, 5);
        assert!(result.len() >= 2);
        for pair in result.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        assert_eq!(result[0].center_name, "ADHD 센터");
    }

    #[test]
    fn test_deterministic_byte_identical_output() {
        let profile = make_profile(&["ADHD", "놀이치료"], Urgency::High);
        let pool = vec![
            make_row(uuid_n(3), "가 센터", "ADHD", 4.8, 5),
            make_row(uuid_n(1), "나 센터", "우울증", 4.5, 3),
            make_row(uuid_n(2), "다 센터", "놀이치료", 4.5, 8),
        ];
        let first = score_institutions(&profile, &pool, &weights(), 0.2, 5);
        let second = score_institutions(&profile, &pool, &weights(), 0.2, 5);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_tie_break_by_rating_then_id() {
        // No topic tags: every institution gets the same specialty signal,
        // so identical rating/counselor rows produce equal scores.
        let profile = make_profile(&[], Urgency::Low);
        let pool = vec![
            make_row(uuid_n(9), "나중 id", "우울증", 4.5, 5),
            make_row(uuid_n(1), "먼저 id", "불안", 4.5, 5),
            make_row(uuid_n(5), "높은 별점", "틱장애", 4.9, 5),
        ];
        let result = score_institutions(&profile, &pool, &weights(), 0.0, 5);
        assert_eq!(result[0].center_name, "높은 별점");
        assert_eq!(result[1].institution_id, uuid_n(1));
        assert_eq!(result[2].institution_id, uuid_n(9));
    }

    #[test]
    fn test_tie_break_stable_under_input_shuffle() {
        let profile = make_profile(&[], Urgency::Low);
        let a = make_row(uuid_n(1), "A", "우울증", 4.5, 5);
        let b = make_row(uuid_n(2), "B", "불안", 4.5, 5);
        let c = make_row(uuid_n(3), "C", "틱장애", 4.5, 5);

        let orderings: [Vec<InstitutionRow>; 3] = [
            vec![a.clone(), b.clone(), c.clone()],
            vec![c.clone(), a.clone(), b.clone()],
            vec![b, c, a],
        ];

        let mut outputs = orderings
            .iter()
            .map(|pool| {
                serde_json::to_string(&score_institutions(&profile, pool, &weights(), 0.0, 5))
                    .unwrap()
            })
            .collect::<Vec<_>>();
        outputs.dedup();
        assert_eq!(outputs.len(), 1, "output must not depend on input order");
    }

    #[test]
    fn test_zero_overlap_below_threshold_excluded() {
        let profile = make_profile(&["ADHD"], Urgency::High);
        let pool = vec![make_row(uuid_n(1), "무관 센터", "우울증", 3.5, 2)];
        let result = score_institutions(&profile, &pool, &weights(), 0.35, 5);
        assert!(result.is_empty());
    }

    #[test]
    fn test_zero_overlap_above_threshold_kept() {
        // High rating and low urgency can clear the floor without overlap.
        let profile = make_profile(&["ADHD"], Urgency::Low);
        let pool = vec![make_row(uuid_n(1), "무관 센터", "우울증", 5.0, 5)];
        let result = score_institutions(&profile, &pool, &weights(), 0.35, 5);
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_result_capped_at_max() {
        let profile = make_profile(&[], Urgency::Low);
        let pool: Vec<InstitutionRow> = (1..=8)
            .map(|n| make_row(uuid_n(n), "센터", "우울증", 4.5, 5))
            .collect();
        let result = score_institutions(&profile, &pool, &weights(), 0.0, 5);
        assert_eq!(result.len(), 5);
    }

    #[test]
    fn test_scores_bounded_zero_to_one() {
        let profile = make_profile(&["ADHD"], Urgency::Low);
        let pool = vec![make_row(uuid_n(1), "만점 센터", "ADHD", 5.0, 20)];
        let result = score_institutions(&profile, &pool, &weights(), 0.0, 5);
        assert!(result[0].score <= 1.0);
        assert!(result[0].score >= 0.0);
    }

    #[test]
    fn test_specialty_match_is_case_insensitive() {
        let profile = make_profile(&["adhd"], Urgency::Moderate);
        let row = make_row(uuid_n(1), "센터", "ADHD", 4.0, 5);
        let (signal, matched) = specialty_overlap(&profile, &row);
        assert_eq!(signal, 1.0);
        assert_eq!(matched, vec!["adhd"]);
    }

    #[test]
    fn test_introduction_match_counts_partial() {
        let profile = make_profile(&["놀이치료"], Urgency::Moderate);
        let mut row = make_row(uuid_n(1), "센터", "우울증", 4.0, 5);
        row.introduction = "놀이치료 중심의 아동 상담을 제공합니다".to_string();
        let (signal, matched) = specialty_overlap(&profile, &row);
        assert_eq!(signal, TEXT_MATCH_STRENGTH);
        assert_eq!(matched.len(), 1);
    }

    #[test]
    fn test_urgency_high_prefers_larger_roster() {
        let profile = make_profile(&["ADHD"], Urgency::High);
        let pool = vec![
            make_row(uuid_n(1), "소규모", "ADHD", 4.5, 1),
            make_row(uuid_n(2), "대규모", "ADHD", 4.5, 10),
        ];
        let result = score_institutions(&profile, &pool, &weights(), 0.0, 5);
        assert_eq!(result[0].center_name, "대규모");
        assert!(result[0].score > result[1].score);
    }

    #[test]
    fn test_urgency_low_ignores_roster_size() {
        assert_eq!(urgency_match(Urgency::Low, 1), urgency_match(Urgency::Low, 50));
    }

    #[test]
    fn test_negative_counselor_count_treated_as_zero() {
        assert_eq!(urgency_match(Urgency::High, -3), 0.0);
    }

    #[test]
    fn test_reasoning_names_matched_specialties() {
        let profile = make_profile(&["ADHD"], Urgency::High);
        let row = make_row(uuid_n(1), "센터", "ADHD", 4.8, 5);
        let reasoning = build_reasoning(&profile, &row, &["ADHD".to_string()]);
        assert!(reasoning.contains("ADHD"));
        assert!(reasoning.contains("4.8"));
        assert!(reasoning.contains("5명"));
    }

    #[test]
    fn test_adhd_request_matches_only_adhd_institution() {
        // Seeded pool: one ADHD institution at 4.8 and three unrelated ones.
        let profile = make_profile(&["ADHD"], Urgency::Moderate);
        let pool = vec![
            make_row(uuid_n(1), "서울아동심리상담센터", "ADHD", 4.8, 5),
            make_row(uuid_n(2), "우울증 센터", "우울증", 4.0, 3),
            make_row(uuid_n(3), "불안 센터", "불안", 3.8, 2),
            make_row(uuid_n(4), "틱장애 센터", "틱장애", 3.5, 2),
        ];
        let result = score_institutions(&profile, &pool, &weights(), 0.35, 5);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].center_name, "서울아동심리상담센터");
        assert!(result[0].score > 0.35);
    }
}
