use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::error::{ExtractError, Result};
use crate::types::candidate::CatalogCandidate;

const MAX_RETRIES: usize = 3;
const DEFAULT_RESULT_LIMIT: usize = 10;
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(8);
const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_millis(250);

/// Anything that can answer a free-text place search.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<CatalogCandidate>>;
}

/// HTTP client for a places catalog exposing `GET {base}/search`.
#[derive(Clone, Debug)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: Option<String>,
    result_limit: usize,
    initial_backoff: Duration,
}

impl CatalogClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url.trim())
            .map_err(|err| ExtractError::Config(format!("Invalid catalog base URL: {err}")))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ExtractError::Config(format!(
                "Catalog base URL must be http(s): {base_url}"
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ExtractError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            base_url,
            api_key: None,
            result_limit: DEFAULT_RESULT_LIMIT,
            initial_backoff: DEFAULT_INITIAL_BACKOFF,
        })
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        self.api_key = (!api_key.trim().is_empty()).then_some(api_key);
        self
    }

    pub fn with_result_limit(mut self, limit: usize) -> Self {
        self.result_limit = limit.max(1);
        self
    }

    /// First retry delay; doubled on every further retry.
    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn search_url(&self, query: &str) -> Result<Url> {
        let trimmed = self.base_url.as_str().trim_end_matches('/');
        let endpoint = if trimmed.ends_with("/search") {
            trimmed.to_string()
        } else {
            format!("{trimmed}/search")
        };
        let mut url = Url::parse(&endpoint)
            .map_err(|err| ExtractError::Config(format!("Invalid catalog search URL: {err}")))?;
        url.query_pairs_mut()
            .append_pair("query", query)
            .append_pair("limit", &self.result_limit.to_string());
        Ok(url)
    }
}

#[async_trait]
impl CatalogSource for CatalogClient {
    async fn search(&self, query: &str) -> Result<Vec<CatalogCandidate>> {
        let url = self.search_url(query)?;
        let mut attempt = 0;
        let mut backoff = self.initial_backoff;

        loop {
            let mut request = self.http.get(url.clone()).header("Accept", "application/json");
            if let Some(api_key) = &self.api_key {
                request = request.bearer_auth(api_key);
            }

            let response = request.send().await.map_err(transport_error)?;
            let status = response.status();
            let headers = response.headers().clone();
            let body = response.text().await.map_err(transport_error)?;

            if status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after = headers
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|value| value.to_str().ok())
                    .and_then(|value| value.trim().parse::<u64>().ok())
                    .map(Duration::from_secs)
                    .unwrap_or(backoff);

                if attempt < MAX_RETRIES {
                    warn!(target: "travel_extract::catalog", query, attempt, "rate limited, retrying");
                    tokio::time::sleep(retry_after).await;
                    attempt += 1;
                    backoff *= 2;
                    continue;
                }

                return Err(ExtractError::RateLimit {
                    retry_after: retry_after.as_secs().max(1),
                });
            }

            if status.is_server_error() && attempt < MAX_RETRIES {
                warn!(
                    target: "travel_extract::catalog",
                    query,
                    attempt,
                    status = status.as_u16(),
                    "catalog server error, retrying"
                );
                tokio::time::sleep(backoff).await;
                attempt += 1;
                backoff *= 2;
                continue;
            }

            if !status.is_success() {
                return Err(ExtractError::Catalog(format!(
                    "HTTP {} error: {}",
                    status,
                    error_message(&body)
                )));
            }

            let candidates = parse_candidates(&body)?;
            debug!(
                target: "travel_extract::catalog",
                query,
                count = candidates.len(),
                "catalog search returned"
            );
            return Ok(candidates);
        }
    }
}

fn transport_error(err: reqwest::Error) -> ExtractError {
    if err.is_timeout() {
        ExtractError::Timeout(format!("Catalog request timed out: {err}"))
    } else {
        ExtractError::CatalogUnreachable(format!("HTTP request failed: {err}"))
    }
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            let error = json.get("error")?;
            Some(
                error
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| error.to_string()),
            )
        })
        .unwrap_or_else(|| body.to_string())
}

/// Decode a catalog payload: either a bare array or `{ "data": [...] }`.
pub fn parse_candidates(body: &str) -> Result<Vec<CatalogCandidate>> {
    let payload: Value = serde_json::from_str(body)?;
    let records = match payload {
        Value::Array(records) => records,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(records)) => records,
            Some(Value::Null) | None if map.contains_key("error") => {
                return Err(ExtractError::Catalog(format!(
                    "API error: {}",
                    error_message(body)
                )));
            }
            _ => {
                return Err(ExtractError::Catalog(
                    "Catalog payload has no `data` array".to_string(),
                ))
            }
        },
        other => {
            return Err(ExtractError::Catalog(format!(
                "Unexpected catalog payload: {other}"
            )))
        }
    };

    // A malformed record is dropped on its own; the rest of the page survives.
    let mut candidates = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        let decoded: std::result::Result<CatalogCandidate, _> =
            serde_path_to_error::deserialize(record);
        match decoded {
            Ok(candidate) => candidates.push(candidate),
            Err(err) => warn!(
                target: "travel_extract::catalog",
                index,
                path = %err.path(),
                error = %err.inner(),
                "skipping invalid catalog record"
            ),
        }
    }
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url_appends_endpoint_and_query() {
        let client = CatalogClient::new("https://catalog.example.com/api/").unwrap();
        let url = client.search_url("museums in Paris").unwrap();
        assert_eq!(url.path(), "/api/search");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs[0], ("query".to_string(), "museums in Paris".to_string()));
        assert_eq!(pairs[1], ("limit".to_string(), "10".to_string()));
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let err = CatalogClient::new("not a url").unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
        let err = CatalogClient::new("ftp://catalog.example.com").unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_parse_bare_array_and_data_envelope() {
        let bare = r#"[{"location_id": 123, "name": "Louvre", "category": {"name": "Museum"}, "address_string": "Paris, France", "rating": "4.7", "num_reviews": "12,345"}]"#;
        let parsed = parse_candidates(bare).unwrap();
        assert_eq!(parsed[0].id, "123");
        assert_eq!(parsed[0].category, "Museum");
        assert_eq!(parsed[0].rating, Some(4.7));
        assert_eq!(parsed[0].review_count, Some(12_345));

        let wrapped = r#"{"data": [{"name": "Louvre", "web_url": "https://example.com/louvre"}]}"#;
        let parsed = parse_candidates(wrapped).unwrap();
        assert_eq!(parsed[0].detail_url.as_deref(), Some("https://example.com/louvre"));
    }

    #[test]
    fn test_parse_error_payloads() {
        let err = parse_candidates(r#"{"error": {"message": "bad key"}}"#).unwrap_err();
        assert!(err.to_string().contains("bad key"));

        assert!(parse_candidates(r#"{"data": {"name": "Louvre"}}"#).is_err());
        assert!(parse_candidates("\"nope\"").is_err());
    }

    #[test]
    fn test_bad_record_is_skipped() {
        let body = r#"[
            {"location_id": "1", "name": "Louvre Museum", "category": "Museum"},
            {"location_id": "2", "name": "Musee d'Orsay", "photos": {"url": "x"}},
            {"location_id": "3", "name": "Musee d'Orsay", "photos": null, "rating": 4.8}
        ]"#;
        let parsed = parse_candidates(body).unwrap();
        let ids: Vec<&str> = parsed.iter().map(|candidate| candidate.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert!(parsed[1].photos.is_empty());
    }
}
