use super::{
    candidate::RankedRecommendation,
    records::{ActionLink, FlightOption, ItineraryDay, PriceComparison},
};
use crate::error::ExtractError;
use serde::{Deserialize, Serialize};

/// Structured data recovered from one assistant response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedResponse {
    /// Assistant text with booking link markers removed
    pub display_text: String,
    pub links: Vec<ActionLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_comparison: Option<PriceComparison>,
    pub flights: Vec<FlightOption>,
    pub itinerary: Vec<ItineraryDay>,
}

impl ExtractedResponse {
    /// True when nothing structured was recovered
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
            && self.price_comparison.is_none()
            && self.flights.is_empty()
            && self.itinerary.is_empty()
    }

    pub fn activity_count(&self) -> usize {
        self.itinerary.iter().map(|day| day.activities.len()).sum()
    }

    /// Human-readable overview of what was extracted
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();

        lines.push("=== Extracted Response ===".to_string());
        lines.push(format!("Links: {}", self.links.len()));
        for link in &self.links {
            lines.push(format!("  - {} -> {}", link.label, link.url));
        }

        if let Some(comparison) = &self.price_comparison {
            lines.push(format!(
                "Price comparison: {} ({} entries)",
                comparison.title,
                comparison.entries.len()
            ));
            for entry in &comparison.entries {
                let badge = match entry.badge {
                    Some(badge) => format!(" [{:?}]", badge),
                    None => String::new(),
                };
                lines.push(format!(
                    "  - {}: {}{}{}",
                    entry.destination_name, entry.currency, entry.price, badge
                ));
            }
        }

        lines.push(format!("Flights: {}", self.flights.len()));
        for flight in &self.flights {
            lines.push(format!(
                "  {}. {} {}{} ({}, {})",
                flight.index,
                flight.airline,
                flight.currency,
                flight.price_amount,
                flight.duration_label,
                flight.stops_label
            ));
        }

        lines.push(format!(
            "Itinerary: {} days, {} activities",
            self.itinerary.len(),
            self.activity_count()
        ));
        for day in &self.itinerary {
            lines.push(format!("  Day {}: {}", day.day_number, day.title));
        }

        lines.join("\n")
    }
}

/// Where the recommended candidates came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateOrigin {
    /// Live catalog results that passed the relevance filter
    Live,
    /// Hand-curated table for a well-known destination
    Fallback,
    /// First catalog results, used when neither filter nor table produced anything
    Unfiltered,
}

/// Ranked attractions for one destination query
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    pub destination: String,
    pub items: Vec<RankedRecommendation>,
    pub origin: CandidateOrigin,
    /// Phrasings that timed out or failed and contributed nothing
    pub failed_queries: Vec<String>,
    /// Reported when the catalog could not be reached at all
    #[serde(skip)]
    pub error: Option<ExtractError>,
}

impl Recommendations {
    pub fn names(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.name()).collect()
    }

    pub fn is_degraded(&self) -> bool {
        self.origin != CandidateOrigin::Live || !self.failed_queries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::records::{Activity, TimeOfDay};

    #[test]
    fn test_empty_response() {
        let response = ExtractedResponse {
            display_text: "Hello".to_string(),
            ..Default::default()
        };
        assert!(response.is_empty());
        assert!(response.summary().contains("Links: 0"));
    }

    #[test]
    fn test_summary_lists_days() {
        let response = ExtractedResponse {
            itinerary: vec![ItineraryDay {
                day_number: 1,
                title: "Arrival".to_string(),
                activities: vec![Activity {
                    time_of_day: Some(TimeOfDay::Morning),
                    text: "Check in".to_string(),
                }],
            }],
            ..Default::default()
        };

        assert!(!response.is_empty());
        assert_eq!(response.activity_count(), 1);
        let summary = response.summary();
        assert!(summary.contains("Itinerary: 1 days, 1 activities"));
        assert!(summary.contains("Day 1: Arrival"));
    }
}
