use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Caption used when no per-destination label could be recovered for a link.
pub const DEFAULT_LINK_LABEL: &str = "Book Now";

/// A "go book this" link recovered from assistant text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ActionLink {
    /// Button caption, usually the destination name
    pub label: String,
    /// Absolute http(s) URL
    pub url: String,
}

impl ActionLink {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        let label = label.into();
        let label = label.trim();
        Self {
            label: if label.is_empty() {
                DEFAULT_LINK_LABEL.to_string()
            } else {
                label.to_string()
            },
            url: url.into(),
        }
    }
}

/// Qualitative badge attached to one price comparison entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Badge {
    Cheapest,
    MostExpensive,
}

impl Badge {
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = label.trim().to_ascii_uppercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "CHEAPEST" => Some(Badge::Cheapest),
            "MOST EXPENSIVE" => Some(Badge::MostExpensive),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceEntry {
    pub destination_name: String,
    #[schemars(with = "String")]
    pub price: Decimal,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<Badge>,
}

/// Multi-destination price table. `entries` is never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceComparison {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    pub currency: String,
    pub entries: Vec<PriceEntry>,
}

impl PriceComparison {
    pub fn cheapest(&self) -> Option<&PriceEntry> {
        self.entries
            .iter()
            .find(|entry| entry.badge == Some(Badge::Cheapest))
    }

    pub fn most_expensive(&self) -> Option<&PriceEntry> {
        self.entries
            .iter()
            .find(|entry| entry.badge == Some(Badge::MostExpensive))
    }
}

/// One flight option block. `index` is 1-based and follows text order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlightOption {
    pub index: u32,
    pub airline: String,
    #[schemars(with = "String")]
    pub price_amount: Decimal,
    pub currency: String,
    pub departure: String,
    pub arrival: String,
    pub duration_label: String,
    pub stops_label: String,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "morning" => Some(TimeOfDay::Morning),
            "afternoon" => Some(TimeOfDay::Afternoon),
            "evening" => Some(TimeOfDay::Evening),
            "night" => Some(TimeOfDay::Night),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<TimeOfDay>,
    pub text: String,
}

/// A single itinerary day; never emitted without activities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryDay {
    pub day_number: u32,
    pub title: String,
    pub activities: Vec<Activity>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_badge_labels() {
        assert_eq!(Badge::from_label("CHEAPEST"), Some(Badge::Cheapest));
        assert_eq!(Badge::from_label("most expensive"), Some(Badge::MostExpensive));
        assert_eq!(Badge::from_label("MOST_EXPENSIVE"), Some(Badge::MostExpensive));
        assert_eq!(Badge::from_label("best value"), None);
    }

    #[test]
    fn test_badge_serializes_screaming_case() {
        let entry = PriceEntry {
            destination_name: "Bali".to_string(),
            price: Decimal::new(293, 0),
            currency: "₹".to_string(),
            badge: Some(Badge::MostExpensive),
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["badge"], json!("MOST_EXPENSIVE"));
        assert_eq!(value["destinationName"], json!("Bali"));
    }

    #[test]
    fn test_link_label_defaults() {
        let link = ActionLink::new("  ", "https://example.com");
        assert_eq!(link.label, DEFAULT_LINK_LABEL);
    }
}
