use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::{
    catalog::{
        default_queries, gather_candidates, CandidateAggregator, CatalogClient, CatalogSource,
        GatherReport, QueryCache, RelevanceFilter, DEFAULT_MAX_CANDIDATES, DEFAULT_RESULT_LIMIT,
    },
    error::{ExtractError, Result},
    extract::{extract_action_links, parse_flight_options, parse_itinerary, parse_price_comparison},
    ranking::{PersonalizationRanker, ScoringWeights},
    types::{
        candidate::CatalogCandidate, profile::UserPreferenceProfile, result::ExtractedResponse,
        result::Recommendations,
    },
};

const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(8);

/// Turn one assistant response into structured records.
///
/// Booking links are stripped first; the remaining text is then searched for
/// price comparisons, flight options and itinerary days.
pub fn extract_response(text: &str) -> ExtractedResponse {
    let (links, display_text) = extract_action_links(text);
    ExtractedResponse {
        price_comparison: parse_price_comparison(&display_text),
        flights: parse_flight_options(&display_text),
        itinerary: parse_itinerary(&display_text),
        links,
        display_text,
    }
}

/// Extraction plus catalog-backed recommendations
pub struct TravelPipeline {
    source: Option<Arc<dyn CatalogSource>>,
    query_timeout: Duration,
    aggregator: CandidateAggregator,
    filter: RelevanceFilter,
    ranker: PersonalizationRanker,
    weights: ScoringWeights,
    result_limit: usize,
    cache: Option<Arc<QueryCache>>,
}

impl std::fmt::Debug for TravelPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TravelPipeline")
            .field("has_source", &self.source.is_some())
            .field("query_timeout", &self.query_timeout)
            .field("max_candidates", &self.aggregator.max_candidates())
            .field("result_limit", &self.result_limit)
            .field("cached", &self.cache.is_some())
            .finish()
    }
}

impl TravelPipeline {
    pub fn new<S: CatalogSource + 'static>(source: S) -> Self {
        Self::with_source(Some(Arc::new(source)))
    }

    /// A pipeline with no catalog; recommendations come from the curated tables.
    pub fn offline() -> Self {
        Self::with_source(None)
    }

    fn with_source(source: Option<Arc<dyn CatalogSource>>) -> Self {
        let weights = ScoringWeights::default();
        Self {
            source,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            aggregator: CandidateAggregator::new(DEFAULT_MAX_CANDIDATES),
            filter: RelevanceFilter::new(DEFAULT_RESULT_LIMIT),
            ranker: PersonalizationRanker::new(weights.clone()).with_limit(DEFAULT_RESULT_LIMIT),
            weights,
            result_limit: DEFAULT_RESULT_LIMIT,
            cache: None,
        }
    }

    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    pub fn with_max_candidates(mut self, max_candidates: usize) -> Self {
        self.aggregator = CandidateAggregator::new(max_candidates);
        self
    }

    pub fn with_result_limit(mut self, limit: usize) -> Self {
        self.result_limit = limit;
        self.filter = RelevanceFilter::new(limit);
        self.ranker = PersonalizationRanker::new(self.weights.clone()).with_limit(limit);
        self
    }

    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.ranker = PersonalizationRanker::new(weights.clone()).with_limit(self.result_limit);
        self.weights = weights;
        self
    }

    pub fn with_cache(mut self, cache: Arc<QueryCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn query_timeout(&self) -> Duration {
        self.query_timeout
    }

    pub fn max_candidates(&self) -> usize {
        self.aggregator.max_candidates()
    }

    pub fn result_limit(&self) -> usize {
        self.result_limit
    }

    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    pub fn extract(&self, text: &str) -> ExtractedResponse {
        extract_response(text)
    }

    pub async fn recommend(
        &self,
        destination: &str,
        profile: Option<&UserPreferenceProfile>,
    ) -> Recommendations {
        let queries = default_queries(destination);
        self.recommend_with_queries(destination, &queries, profile)
            .await
    }

    /// Fan `queries` out to the catalog and rank what comes back.
    ///
    /// Always returns something: failed phrasings are listed in
    /// `failed_queries`, and an unreachable catalog is reported through
    /// `error` next to the fallback results.
    pub async fn recommend_with_queries(
        &self,
        destination: &str,
        queries: &[String],
        profile: Option<&UserPreferenceProfile>,
    ) -> Recommendations {
        let mut report = match &self.source {
            Some(source) => {
                gather_candidates(
                    source.as_ref(),
                    queries,
                    self.query_timeout,
                    self.cache.as_deref(),
                )
                .await
            }
            None => GatherReport::default(),
        };

        let error = report.unreachable_error();
        if let Some(err) = &error {
            warn!(
                target: "travel_extract::catalog",
                destination,
                error = %err,
                "catalog unreachable, continuing with fallback"
            );
        }

        let mut recommendations = self.select_recommendations(destination, &report.lists, profile);
        recommendations.failed_queries = report.failed_queries;
        recommendations.error = error;

        info!(
            target: "travel_extract::ranking",
            destination,
            origin = ?recommendations.origin,
            count = recommendations.items.len(),
            failed = recommendations.failed_queries.len(),
            "recommendations ready"
        );
        recommendations
    }

    /// Merge, filter and rank already-fetched result lists.
    pub fn select_recommendations(
        &self,
        destination: &str,
        lists: &[Vec<CatalogCandidate>],
        profile: Option<&UserPreferenceProfile>,
    ) -> Recommendations {
        let merged = self.aggregator.aggregate(lists);
        let outcome = self.filter.filter(destination, &merged);
        let items = self.ranker.rank(outcome.candidates, profile);

        Recommendations {
            destination: destination.trim().to_string(),
            items,
            origin: outcome.origin,
            failed_queries: Vec::new(),
            error: None,
        }
    }

    /// Build from `CATALOG_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("CATALOG_BASE_URL")
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| {
                ExtractError::Config(
                    "CATALOG_BASE_URL environment variable must be set before creating a TravelPipeline"
                        .to_string(),
                )
            })?;

        let timeout_secs = parse_var(&lookup, "CATALOG_TIMEOUT_SECS", DEFAULT_QUERY_TIMEOUT.as_secs())?;
        let max_candidates = parse_var(&lookup, "CATALOG_MAX_CANDIDATES", DEFAULT_MAX_CANDIDATES)?;
        let timeout = Duration::from_secs(timeout_secs);

        let mut client = CatalogClient::with_timeout(&base_url, timeout)?;
        if let Some(api_key) = lookup("CATALOG_API_KEY") {
            client = client.with_api_key(api_key);
        }

        Ok(Self::new(client)
            .with_query_timeout(timeout)
            .with_max_candidates(max_candidates))
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ExtractError::Config(format!("{key} must be a non-negative integer, got `{raw}`"))),
    }
}
