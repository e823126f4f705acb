//! Preference-based ranking of filtered candidates

pub mod weights;

pub use weights::{ScoringWeights, Tier};

use crate::catalog::vocabulary::{contains_any, interest_keywords, ICONIC_NAME_FRAGMENTS};
use crate::catalog::DEFAULT_RESULT_LIMIT;
use crate::types::{
    candidate::{CatalogCandidate, RankedRecommendation},
    profile::{TravelStyle, UserPreferenceProfile},
};
use tracing::debug;

/// Scores candidates against a preference profile and keeps the best few.
#[derive(Debug, Clone)]
pub struct PersonalizationRanker {
    weights: ScoringWeights,
    limit: usize,
}

impl Default for PersonalizationRanker {
    fn default() -> Self {
        Self::new(ScoringWeights::default())
    }
}

impl PersonalizationRanker {
    pub fn new(weights: ScoringWeights) -> Self {
        Self {
            weights,
            limit: DEFAULT_RESULT_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Rank by score, then rating, keeping input order for full ties.
    ///
    /// Without a profile (or with an empty one) nothing is scored: the first
    /// candidates are returned in their existing order with a zero score.
    pub fn rank(
        &self,
        candidates: Vec<CatalogCandidate>,
        profile: Option<&UserPreferenceProfile>,
    ) -> Vec<RankedRecommendation> {
        let Some(profile) = profile.filter(|profile| !profile.is_empty()) else {
            debug!(
                target: "travel_extract::ranking",
                candidates = candidates.len(),
                "no preferences, keeping filtered order"
            );
            return candidates
                .into_iter()
                .take(self.limit)
                .map(|candidate| RankedRecommendation::new(candidate, 0.0))
                .collect();
        };

        let mut ranked: Vec<RankedRecommendation> = candidates
            .into_iter()
            .map(|candidate| {
                let score = self.score(&candidate, profile);
                RankedRecommendation::new(candidate, score)
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.personalization_score
                .total_cmp(&a.personalization_score)
                .then_with(|| {
                    b.candidate
                        .rating_or_zero()
                        .total_cmp(&a.candidate.rating_or_zero())
                })
        });
        ranked.truncate(self.limit);

        debug!(
            target: "travel_extract::ranking",
            top = ?ranked.iter().map(|r| (r.name(), r.personalization_score)).collect::<Vec<_>>(),
            "ranked candidates"
        );
        ranked
    }

    /// Personalization score for one candidate, clamped to `[0, 1]`.
    pub fn score(&self, candidate: &CatalogCandidate, profile: &UserPreferenceProfile) -> f64 {
        let w = &self.weights;
        let category = candidate.category.to_lowercase();
        let description = candidate.description_text().to_lowercase();
        let name = candidate.name.to_lowercase();

        let mut total = 0.0;

        for interest in &profile.interests {
            let interest = interest.trim().to_lowercase();
            if interest.is_empty() {
                continue;
            }
            let keywords = interest_keywords(&interest);
            if contains_any(&category, keywords) || contains_any(&description, keywords) {
                total += w.interest_match;
            }
            if description.contains(&interest) {
                total += w.description_interest;
            }
        }

        if let Some(style) = profile.travel_style {
            if style_affinity(style, &category, &description) {
                total += w.style_affinity;
            }
        }

        if let Some(accommodation) = profile
            .accommodation_type
            .as_deref()
            .map(|value| value.trim().to_lowercase())
            .filter(|value| !value.is_empty())
        {
            if category.contains(&accommodation) {
                total += w.accommodation_match;
            }
        }

        if let Some(rating) = candidate.rating {
            total += ScoringWeights::tier_bonus(&w.rating_tiers, rating);
        }
        if let Some(reviews) = candidate.review_count {
            total += ScoringWeights::tier_bonus(&w.review_tiers, reviews as f64);
        }
        if is_iconic(&name) {
            total += w.iconic_name;
        }

        total.clamp(0.0, 1.0)
    }
}

fn style_affinity(style: TravelStyle, category: &str, description: &str) -> bool {
    match style {
        TravelStyle::Luxury => {
            contains_any(category, &["resort", "hotel"]) || description.contains("luxury")
        }
        TravelStyle::Budget => {
            category.contains("hostel") || contains_any(description, &["budget", "affordable"])
        }
        TravelStyle::MidRange => contains_any(category, &["hotel", "restaurant"]),
    }
}

// "park" alone is too common; only Central Park-style names count.
fn is_iconic(name: &str) -> bool {
    contains_any(name, ICONIC_NAME_FRAGMENTS) || (name.contains("central") && name.contains("park"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fallback_attractions;

    fn candidate(name: &str, category: &str, rating: f64) -> CatalogCandidate {
        CatalogCandidate::new(name, name, category, "Somewhere")
            .with_rating(rating)
            .with_review_count(50)
    }

    #[test]
    fn test_empty_profile_keeps_input_order() {
        let candidates = vec![
            candidate("Quiet Square", "Square", 3.0),
            candidate("Grand Museum", "Museum", 4.9),
            candidate("Old Bridge", "Bridge", 4.8),
            candidate("Small Garden", "Garden", 4.0),
        ];
        let ranker = PersonalizationRanker::default();

        for profile in [None, Some(&UserPreferenceProfile::new())] {
            let ranked = ranker.rank(candidates.clone(), profile);
            let names: Vec<&str> = ranked.iter().map(|r| r.name()).collect();
            assert_eq!(names, vec!["Quiet Square", "Grand Museum", "Old Bridge"]);
            assert!(ranked.iter().all(|r| r.personalization_score == 0.0));
        }
    }

    #[test]
    fn test_interest_moves_matching_candidate_up() {
        let candidates = vec![
            candidate("Harbour Walk", "Waterfront", 4.0),
            candidate("City History Exhibit", "Museum", 4.0)
                .with_description("Local history through the ages"),
        ];
        let profile = UserPreferenceProfile::new().with_interest("history");
        let ranked = PersonalizationRanker::default().rank(candidates, Some(&profile));
        assert_eq!(ranked[0].name(), "City History Exhibit");
        // interest 0.3 + description 0.2 + rating 0.2
        assert!((ranked[0].personalization_score - 0.7).abs() < 1e-9);
        assert!((ranked[1].personalization_score - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_ties_break_on_rating_then_input_order() {
        let candidates = vec![
            candidate("Plain A", "Viewpoint", 3.0),
            candidate("Plain B", "Viewpoint", 3.2),
            candidate("Plain C", "Viewpoint", 3.2),
        ];
        let profile = UserPreferenceProfile::new().with_interest("nightlife");
        let ranked = PersonalizationRanker::default().rank(candidates, Some(&profile));
        let names: Vec<&str> = ranked.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["Plain B", "Plain C", "Plain A"]);
    }

    #[test]
    fn test_scores_stay_within_unit_interval() {
        let loaded = CatalogCandidate::new("x", "Central Park Palace Tower", "Luxury Resort Museum Park", "NYC")
            .with_rating(5.0)
            .with_review_count(1_000_000)
            .with_description("luxury history art nature culture budget affordable");
        let profile = UserPreferenceProfile::new()
            .with_interest("history")
            .with_interest("art")
            .with_interest("nature")
            .with_interest("culture")
            .with_travel_style(TravelStyle::Luxury)
            .with_accommodation_type("resort");
        let ranker = PersonalizationRanker::default();
        assert_eq!(ranker.score(&loaded, &profile), 1.0);

        let bare = CatalogCandidate::new("y", "", "", "");
        assert_eq!(ranker.score(&bare, &profile), 0.0);
    }

    #[test]
    fn test_central_park_counts_as_iconic_but_plain_park_does_not() {
        assert!(is_iconic("central park"));
        assert!(!is_iconic("riverside park"));
        assert!(is_iconic("tower of london"));
    }

    #[test]
    fn test_fallback_table_ranked_to_three() {
        let table = fallback_attractions("New York").unwrap();
        let profile = UserPreferenceProfile::new().with_interest("art");
        let ranked = PersonalizationRanker::default().rank(table, Some(&profile));
        // Several entries saturate at 1.0, so rating and table order decide.
        let names: Vec<&str> = ranked.iter().map(|r| r.name()).collect();
        assert_eq!(
            names,
            vec!["Central Park", "The Metropolitan Museum of Art", "Brooklyn Bridge"]
        );
    }

    #[test]
    fn test_custom_weights() {
        let weights = ScoringWeights {
            iconic_name: 0.0,
            rating_tiers: Vec::new(),
            review_tiers: Vec::new(),
            ..ScoringWeights::default()
        };
        let profile = UserPreferenceProfile::new().with_interest("food");
        let tower = candidate("Tokyo Tower", "Tower", 4.9);
        assert_eq!(PersonalizationRanker::new(weights).score(&tower, &profile), 0.0);
    }
}
