use super::{
    fallback::fallback_attractions,
    vocabulary::{
        contains_any, contains_word, country_aliases, ATTRACTION_OVERRIDE_TERMS,
        ATTRACTION_SIGNAL_TERMS, ATTRACTION_TERMS, BUSINESS_TERMS, CONFUSABLE_LOCATIONS,
        GENERIC_CATEGORIES,
    },
};
use crate::types::{candidate::CatalogCandidate, result::CandidateOrigin};
use tracing::{debug, info};

pub const DEFAULT_RESULT_LIMIT: usize = 3;

/// Candidates that survived filtering and where they came from
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome {
    pub candidates: Vec<CatalogCandidate>,
    pub origin: CandidateOrigin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    ConfusableCity,
    WrongDestination,
    Business,
    NotAnAttraction,
}

/// Keeps attractions that are actually in the requested destination.
#[derive(Debug, Clone)]
pub struct RelevanceFilter {
    limit: usize,
}

impl Default for RelevanceFilter {
    fn default() -> Self {
        Self::new(DEFAULT_RESULT_LIMIT)
    }
}

impl RelevanceFilter {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Live matches are capped at the limit. When nothing survives, the
    /// curated table for the destination is returned whole so the ranker can
    /// pick from it; without a table the first unfiltered candidates are used.
    pub fn filter(&self, destination: &str, candidates: &[CatalogCandidate]) -> FilterOutcome {
        let destination = Destination::new(destination);

        let relevant: Vec<CatalogCandidate> = candidates
            .iter()
            .filter(|candidate| match destination.check(candidate) {
                Ok(()) => true,
                Err(reason) => {
                    debug!(
                        target: "travel_extract::filter",
                        candidate = %candidate.name,
                        ?reason,
                        "rejected candidate"
                    );
                    false
                }
            })
            .take(self.limit)
            .cloned()
            .collect();

        if !relevant.is_empty() {
            info!(
                target: "travel_extract::filter",
                destination = %destination.raw,
                kept = relevant.len(),
                "filtered catalog candidates"
            );
            return FilterOutcome {
                candidates: relevant,
                origin: CandidateOrigin::Live,
            };
        }

        if let Some(curated) = fallback_attractions(&destination.raw) {
            info!(
                target: "travel_extract::filter",
                destination = %destination.raw,
                "no relevant candidates, using curated fallback"
            );
            return FilterOutcome {
                candidates: curated,
                origin: CandidateOrigin::Fallback,
            };
        }

        info!(
            target: "travel_extract::filter",
            destination = %destination.raw,
            available = candidates.len(),
            "no relevant candidates and no curated table, returning unfiltered"
        );
        FilterOutcome {
            candidates: candidates.iter().take(self.limit).cloned().collect(),
            origin: CandidateOrigin::Unfiltered,
        }
    }

    /// Why a single candidate would be rejected for `destination`, if at all.
    pub fn check(&self, destination: &str, candidate: &CatalogCandidate) -> Result<(), Rejection> {
        Destination::new(destination).check(candidate)
    }
}

struct Destination {
    raw: String,
    lowered: String,
    primary: String,
}

impl Destination {
    fn new(raw: &str) -> Self {
        let raw = raw.trim().to_string();
        let lowered = raw.to_lowercase();
        let primary = lowered
            .split(',')
            .next()
            .unwrap_or_default()
            .trim()
            .to_string();
        Self {
            raw,
            lowered,
            primary,
        }
    }

    fn check(&self, candidate: &CatalogCandidate) -> Result<(), Rejection> {
        let address = candidate.address.to_lowercase();
        let name = candidate.name.to_lowercase();
        let category = candidate.category.to_lowercase();
        let description = candidate.description_text().to_lowercase();

        if CONFUSABLE_LOCATIONS
            .iter()
            .any(|place| address.contains(place) && !self.lowered.contains(place))
        {
            return Err(Rejection::ConfusableCity);
        }

        if !self.is_in_destination(&[&address, &name, &description]) {
            return Err(Rejection::WrongDestination);
        }

        let is_business = BUSINESS_TERMS
            .iter()
            .any(|term| contains_word(&category, term));
        let overridden = contains_any(&category, ATTRACTION_OVERRIDE_TERMS)
            || contains_any(&name, ATTRACTION_OVERRIDE_TERMS);
        if is_business && !overridden {
            return Err(Rejection::Business);
        }

        let generic_category = category.trim().is_empty()
            || GENERIC_CATEGORIES
                .iter()
                .any(|generic| contains_word(&category, generic));
        let is_attraction = contains_any(&category, ATTRACTION_TERMS)
            || contains_any(&name, ATTRACTION_TERMS)
            || (generic_category && contains_any(&name, ATTRACTION_SIGNAL_TERMS));
        if !is_attraction {
            return Err(Rejection::NotAnAttraction);
        }

        Ok(())
    }

    fn is_in_destination(&self, fields: &[&str]) -> bool {
        if self.primary.is_empty() {
            return true;
        }
        match country_aliases(&self.primary) {
            Some(aliases) => fields
                .iter()
                .any(|field| aliases.iter().any(|alias| contains_word(field, alias))),
            None => fields.iter().any(|field| field.contains(self.primary.as_str())),
        }
    }
}
