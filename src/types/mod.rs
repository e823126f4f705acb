pub mod candidate;
pub mod profile;
pub mod records;
pub mod result;

pub use candidate::{CatalogCandidate, RankedRecommendation};
pub use profile::{TravelStyle, UserPreferenceProfile};
pub use records::{
    ActionLink, Activity, Badge, FlightOption, ItineraryDay, PriceComparison, PriceEntry,
    TimeOfDay, DEFAULT_LINK_LABEL,
};
pub use result::{CandidateOrigin, ExtractedResponse, Recommendations};
