use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, warn};

use super::{cache::QueryCache, source::CatalogSource};
use crate::error::ExtractError;
use crate::types::candidate::CatalogCandidate;

/// Per-phrasing results of a catalog fan-out.
#[derive(Debug, Default)]
pub struct GatherReport {
    /// One list per query, in the order the queries were given
    pub lists: Vec<Vec<CatalogCandidate>>,
    pub failed_queries: Vec<String>,
    /// One error per entry of `failed_queries`
    pub errors: Vec<ExtractError>,
}

impl GatherReport {
    pub fn all_failed(&self) -> bool {
        !self.lists.is_empty() && self.failed_queries.len() == self.lists.len()
    }

    pub fn total(&self) -> usize {
        self.lists.iter().map(Vec::len).sum()
    }

    /// The error to surface when the catalog could not be reached at all.
    ///
    /// Timeouts mean the catalog is slow rather than down, so a fan-out that
    /// saw any timeout reports nothing.
    pub fn unreachable_error(&mut self) -> Option<ExtractError> {
        if !self.all_failed()
            || self
                .errors
                .iter()
                .any(|err| matches!(err, ExtractError::Timeout(_)))
        {
            return None;
        }
        self.errors.pop()
    }
}

pub fn default_queries(destination: &str) -> Vec<String> {
    let destination = destination.trim();
    vec![
        format!("top attractions in {destination}"),
        format!("famous landmarks in {destination}"),
        format!("things to do in {destination}"),
        format!("museums in {destination}"),
    ]
}

/// Run every phrasing concurrently, each bounded by `per_query_timeout`.
///
/// A phrasing that fails or times out contributes an empty list; the fan-out
/// as a whole never fails.
pub async fn gather_candidates<S>(
    source: &S,
    queries: &[String],
    per_query_timeout: Duration,
    cache: Option<&QueryCache>,
) -> GatherReport
where
    S: CatalogSource + ?Sized,
{
    let searches = queries.iter().map(|query| async move {
        if let Some(hit) = cache.and_then(|cache| cache.get(query)) {
            debug!(target: "travel_extract::catalog", query = %query, "cache hit");
            return Ok(hit);
        }

        let outcome = match tokio::time::timeout(per_query_timeout, source.search(query)).await {
            Ok(result) => result,
            Err(_) => Err(ExtractError::Timeout(format!(
                "Catalog query `{}` exceeded {}ms",
                query,
                per_query_timeout.as_millis()
            ))),
        };

        if let (Ok(candidates), Some(cache)) = (&outcome, cache) {
            cache.insert(query, candidates.clone());
        }
        outcome
    });

    let outcomes = join_all(searches).await;

    let mut report = GatherReport::default();
    for (query, outcome) in queries.iter().zip(outcomes) {
        match outcome {
            Ok(candidates) => report.lists.push(candidates),
            Err(err) => {
                warn!(
                    target: "travel_extract::catalog",
                    query = %query,
                    error = %err,
                    "catalog query contributed no candidates"
                );
                report.lists.push(Vec::new());
                report.failed_queries.push(query.clone());
                report.errors.push(err);
            }
        }
    }

    debug!(
        target: "travel_extract::catalog",
        queries = queries.len(),
        failed = report.failed_queries.len(),
        total = report.total(),
        "catalog fan-out complete"
    );
    report
}
