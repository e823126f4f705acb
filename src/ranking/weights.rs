use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A bonus awarded once a value reaches `threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Tier {
    pub threshold: f64,
    pub bonus: f64,
}

impl Tier {
    pub const fn new(threshold: f64, bonus: f64) -> Self {
        Self { threshold, bonus }
    }
}

/// Tunable contributions to the personalization score.
///
/// Any field left out of a JSON document keeps its default, so a config only
/// needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ScoringWeights {
    /// Per interest whose keywords appear in category or description
    pub interest_match: f64,
    /// Per interest named verbatim in the description
    pub description_interest: f64,
    pub style_affinity: f64,
    pub accommodation_match: f64,
    /// Checked highest threshold first; only one tier applies
    pub rating_tiers: Vec<Tier>,
    pub review_tiers: Vec<Tier>,
    pub iconic_name: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            interest_match: 0.3,
            description_interest: 0.2,
            style_affinity: 0.2,
            accommodation_match: 0.4,
            rating_tiers: vec![Tier::new(4.5, 0.3), Tier::new(4.0, 0.2), Tier::new(3.5, 0.1)],
            review_tiers: vec![
                Tier::new(10_000.0, 0.3),
                Tier::new(1_000.0, 0.2),
                Tier::new(100.0, 0.1),
            ],
            iconic_name: 0.4,
        }
    }
}

impl ScoringWeights {
    pub fn from_json(payload: &serde_json::Value) -> crate::Result<Self> {
        serde_path_to_error::deserialize(payload).map_err(|err| {
            crate::ExtractError::Config(format!(
                "Invalid scoring weights at {}: {}",
                err.path(),
                err.inner()
            ))
        })
    }

    pub(crate) fn tier_bonus(tiers: &[Tier], value: f64) -> f64 {
        tiers
            .iter()
            .filter(|tier| value >= tier.threshold)
            .map(|tier| tier.bonus)
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let weights = ScoringWeights::from_json(&json!({ "iconicName": 0.1 })).unwrap();
        assert_eq!(weights.iconic_name, 0.1);
        assert_eq!(weights.interest_match, 0.3);
        assert_eq!(weights.rating_tiers.len(), 3);
    }

    #[test]
    fn test_bad_json_is_config_error() {
        let err = ScoringWeights::from_json(&json!({ "styleAffinity": "high" })).unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
        assert!(err.to_string().contains("styleAffinity"));
    }

    #[test]
    fn test_only_highest_tier_applies() {
        let tiers = ScoringWeights::default().rating_tiers;
        assert_eq!(ScoringWeights::tier_bonus(&tiers, 4.7), 0.3);
        assert_eq!(ScoringWeights::tier_bonus(&tiers, 4.2), 0.2);
        assert_eq!(ScoringWeights::tier_bonus(&tiers, 3.5), 0.1);
        assert_eq!(ScoringWeights::tier_bonus(&tiers, 2.0), 0.0);
    }
}
