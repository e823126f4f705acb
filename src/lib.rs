//! travel-extract-rs: structured data from travel-assistant responses
//!
//! Two halves share this crate. The extraction half turns free-form assistant
//! text into booking links, price comparisons, flight options and itinerary
//! days using ordered rule chains. The recommendation half merges place
//! candidates from several catalog searches, drops off-destination and
//! non-attraction entries, and ranks the rest against a preference profile.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use travel_extract_rs::{TravelPipeline, UserPreferenceProfile};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pipeline = TravelPipeline::from_env()?;
//!
//!     let response = pipeline.extract("Day 1: Arrival\n- Check in near Shibuya");
//!     println!("{}", response.summary());
//!
//!     let profile = UserPreferenceProfile::new().with_interest("history");
//!     let picks = pipeline.recommend("Tokyo", Some(&profile)).await;
//!     println!("{:?}", picks.names());
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod ranking;
pub mod schemas;
pub mod types;

pub use catalog::{
    CandidateAggregator, CatalogClient, CatalogSource, FilterOutcome, QueryCache, RelevanceFilter,
};
pub use error::{ExtractError, Result};
pub use extract::{
    extract_action_links, parse_flight_options, parse_itinerary, parse_price_comparison, Rule,
    RuleChain,
};
pub use pipeline::{extract_response, TravelPipeline};
pub use ranking::{PersonalizationRanker, ScoringWeights};
pub use types::{
    ActionLink, Activity, Badge, CandidateOrigin, CatalogCandidate, ExtractedResponse,
    FlightOption, ItineraryDay, PriceComparison, PriceEntry, RankedRecommendation,
    Recommendations, TimeOfDay, TravelStyle, UserPreferenceProfile,
};

#[cfg(feature = "cli")]
pub mod cli;
