use crate::{error::Result, schemas::validation::validate_profile_payload};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum TravelStyle {
    #[serde(rename = "budget")]
    Budget,
    #[serde(rename = "mid-range")]
    MidRange,
    #[serde(rename = "luxury")]
    Luxury,
}

/// Caller-owned preference profile used for ranking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferenceProfile {
    /// Free-form interests such as "history" or "food"; repeats collapse
    #[serde(default)]
    #[schemars(with = "Vec<String>")]
    pub interests: BTreeSet<String>,
    /// Preferred travel style
    #[serde(default)]
    pub travel_style: Option<TravelStyle>,
    /// Total budget in the user's currency
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub budget: Option<Decimal>,
    /// Preferred accommodation type, e.g. "hostel" or "resort"
    #[serde(default)]
    pub accommodation_type: Option<String>,
}

impl UserPreferenceProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_interest(mut self, interest: impl Into<String>) -> Self {
        let interest = interest.into();
        let interest = interest.trim();
        if !interest.is_empty() {
            self.interests.insert(interest.to_lowercase());
        }
        self
    }

    pub fn with_travel_style(mut self, style: TravelStyle) -> Self {
        self.travel_style = Some(style);
        self
    }

    pub fn with_budget(mut self, budget: Decimal) -> Self {
        self.budget = Some(budget);
        self
    }

    pub fn with_accommodation_type(mut self, accommodation: impl Into<String>) -> Self {
        self.accommodation_type = Some(accommodation.into());
        self
    }

    /// A profile with nothing set carries no preferences to rank by.
    pub fn is_empty(&self) -> bool {
        self.interests.iter().all(|interest| interest.trim().is_empty())
            && self.travel_style.is_none()
            && self.budget.is_none()
            && self
                .accommodation_type
                .as_deref()
                .map_or(true, |value| value.trim().is_empty())
    }

    /// Validate raw JSON against the profile schema, then decode it.
    pub fn from_json(payload: &Value) -> Result<Self> {
        validate_profile_payload(payload)?;
        let profile: Self = serde_path_to_error::deserialize(payload).map_err(|err| {
            crate::ExtractError::Validation(format!(
                "Profile decoding failed at {}: {}",
                err.path(),
                err
            ))
        })?;
        Ok(profile.normalized())
    }

    fn normalized(mut self) -> Self {
        self.interests = self
            .interests
            .iter()
            .map(|interest| interest.trim().to_lowercase())
            .filter(|interest| !interest.is_empty())
            .collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_profile() {
        assert!(UserPreferenceProfile::new().is_empty());
        assert!(!UserPreferenceProfile::new().with_interest("History").is_empty());
        assert!(UserPreferenceProfile::new()
            .with_accommodation_type("   ")
            .is_empty());
    }

    #[test]
    fn test_from_json_normalizes_interests() {
        let profile = UserPreferenceProfile::from_json(&json!({
            "interests": [" History ", "food"],
            "travelStyle": "mid-range",
            "budget": 1500
        }))
        .unwrap();

        assert!(profile.interests.contains("history"));
        assert!(profile.interests.contains("food"));
        assert_eq!(profile.travel_style, Some(TravelStyle::MidRange));
        assert_eq!(profile.budget, Some(Decimal::new(1500, 0)));
    }

    #[test]
    fn test_repeated_interests_collapse() {
        let profile =
            UserPreferenceProfile::from_json(&json!({ "interests": ["art", "Art", "art"] }))
                .unwrap();
        assert_eq!(profile.interests.len(), 1);
        assert!(profile.interests.contains("art"));
    }

    #[test]
    fn test_from_json_rejects_unknown_style() {
        let err = UserPreferenceProfile::from_json(&json!({ "travelStyle": "backpacker" }))
            .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }
}
